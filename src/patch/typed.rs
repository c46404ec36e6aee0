//! Merging one record into another.

use super::coerce::ensure_same_kind;
use super::engine::{entry_owner, with_nested, write_scalar};
use super::error::PatchError;
use super::options::MergeOptions;
use crate::schema::{is_absent, owner, resolve, FieldRef, Kind, Record, Shape};
use tracing::{debug, trace};

/// Merges the present fields of `patch` into `target`.
///
/// Patch fields are matched to target fields by declared name. A plain field
/// holding its zero value is absent; an optional field is present whenever it
/// is `Some`. Kinds must match exactly.
pub(crate) fn merge_record(
    target: &mut dyn Record,
    patch: &dyn Record,
    opts: &MergeOptions,
) -> Result<bool, PatchError> {
    let source = patch.catalog();
    let dest = target.catalog();
    let mut changed = false;

    for entry in source.entries() {
        if !entry.exported() {
            trace!(record = source.type_name(), field = entry.name(), "skipping unexported field");
            continue;
        }
        let Some(value) = owner(patch, entry.owner_path()).map(|o| o.field(entry.slot())) else {
            continue;
        };
        if is_absent(&value) {
            continue;
        }
        let name = entry.name();
        let Some(dst) = resolve::find_by_name(dest, name) else {
            trace!(record = dest.type_name(), field = name, "skipping unknown field");
            continue;
        };
        let dst_owner = entry_owner(&mut *target, dst)?;
        changed |= merge_field(dst_owner, dst.slot(), dst.shape(), name, value, opts)?;
    }

    Ok(changed)
}

fn merge_field(
    owner: &mut dyn Record,
    slot: usize,
    shape: Shape,
    name: &str,
    value: FieldRef<'_>,
    opts: &MergeOptions,
) -> Result<bool, PatchError> {
    match (shape, value) {
        (
            Shape::Record | Shape::OptionalRecord,
            FieldRef::Record(inner) | FieldRef::OptionalRecord(Some(inner)),
        ) => with_nested(owner, slot, name, opts, |nested| merge_record(nested, inner, opts)),
        (
            Shape::Scalar(kind) | Shape::Optional(kind),
            FieldRef::Scalar(next) | FieldRef::Optional(Some(next)),
        ) => {
            ensure_same_kind(name, &next, kind).inspect_err(|err| debug!(%err, "kind mismatch"))?;
            write_scalar(owner, slot, name, next)
        }
        (Shape::Flatten | Shape::Opaque, _) => Ok(false),
        (shape, value) => {
            let expected = shape.kind().unwrap_or(Kind::Record);
            debug!(field = name, %expected, actual = value.kind_name(), "shape mismatch");
            Err(PatchError::type_mismatch(
                name,
                value.kind_name(),
                expected,
                value.kind_name(),
            ))
        }
    }
}
