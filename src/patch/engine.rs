//! Steps shared by the mapping and typed merges.

use super::error::PatchError;
use super::options::MergeOptions;
use crate::schema::{owner_mut, AssignError, Entry, FieldRef, Kind, Record, Scalar};
use tracing::trace;

/// Resolves the record that owns `entry` inside `target`.
pub(crate) fn entry_owner<'a>(
    target: &'a mut dyn Record,
    entry: &Entry,
) -> Result<&'a mut dyn Record, PatchError> {
    owner_mut(target, entry.owner_path())
        .ok_or_else(|| PatchError::write_failure(entry.name(), AssignError::NotWritable))
}

/// Writes `next` into a scalar field and reports whether it differed from the
/// value it replaces. The write happens even when the values are equal.
pub(crate) fn write_scalar(
    owner: &mut dyn Record,
    slot: usize,
    field: &str,
    next: Scalar,
) -> Result<bool, PatchError> {
    let changed = match owner.field(slot) {
        FieldRef::Scalar(current) => current != next,
        FieldRef::Optional(current) => current.as_ref() != Some(&next),
        _ => true,
    };
    owner
        .set(slot, next)
        .map_err(|source| PatchError::write_failure(field, source))?;
    Ok(changed)
}

/// Resets an optional field and reports whether it held a value.
pub(crate) fn clear_optional(
    owner: &mut dyn Record,
    slot: usize,
    field: &str,
) -> Result<bool, PatchError> {
    let changed = match owner.field(slot) {
        FieldRef::Optional(current) => current.is_some(),
        FieldRef::OptionalRecord(current) => current.is_some(),
        _ => true,
    };
    owner
        .clear(slot)
        .map_err(|source| PatchError::write_failure(field, source))?;
    Ok(changed)
}

/// Runs `merge` against the nested record at `slot`.
///
/// An absent optional record is created from its default first and removed
/// again unless the nested merge succeeds with a change.
pub(crate) fn with_nested<F>(
    owner: &mut dyn Record,
    slot: usize,
    field: &str,
    opts: &MergeOptions,
    merge: F,
) -> Result<bool, PatchError>
where
    F: FnOnce(&mut dyn Record) -> Result<bool, PatchError>,
{
    if let Some(nested) = owner.record_mut(slot) {
        return merge(nested);
    }
    if !opts.materialize_missing {
        return Err(PatchError::type_mismatch(field, "none", Kind::Record, "none"));
    }

    trace!(field, "materializing absent nested record");
    let nested = owner
        .insert_record(slot)
        .ok_or_else(|| PatchError::write_failure(field, AssignError::NotWritable))?;
    let result = merge(nested);
    if !matches!(result, Ok(true)) {
        owner
            .clear(slot)
            .map_err(|source| PatchError::write_failure(field, source))?;
    }
    result
}
