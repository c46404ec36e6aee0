//! Merging a decoded key/value mapping into a record.

use super::coerce::coerce;
use super::engine::{clear_optional, entry_owner, with_nested, write_scalar};
use super::error::PatchError;
use super::options::MergeOptions;
use crate::schema::{resolve, Kind, Record, Shape};
use crate::value::{Map, Value};
use tracing::{debug, trace};

/// Merges every key of `patch` into `target`.
///
/// A key selects the exported field whose identifier (alias, else declared
/// name) equals it. Unknown keys are skipped. Any supplied value, including
/// zero, `false` and `""`, overwrites the field.
pub(crate) fn merge_map(
    target: &mut dyn Record,
    patch: &Map,
    opts: &MergeOptions,
) -> Result<bool, PatchError> {
    let catalog = target.catalog();
    let mut changed = false;

    for (key, value) in patch.iter() {
        let Some(entry) = resolve::find_by_identifier(catalog, key) else {
            trace!(record = catalog.type_name(), key = %key, "skipping unknown key");
            continue;
        };
        let owner = entry_owner(&mut *target, entry)?;
        changed |= merge_value(owner, entry.slot(), entry.shape(), key, value, opts)?;
    }

    Ok(changed)
}

fn merge_value(
    owner: &mut dyn Record,
    slot: usize,
    shape: Shape,
    key: &str,
    value: &Value,
    opts: &MergeOptions,
) -> Result<bool, PatchError> {
    if value.is_null() && shape.is_optional() && opts.null_clears_optional {
        return clear_optional(owner, slot, key);
    }

    match shape {
        Shape::Record | Shape::OptionalRecord => {
            let Some(inner) = value.as_map() else {
                debug!(key, actual = value.kind_name(), "nested patch is not a map");
                return Err(PatchError::type_mismatch(
                    key,
                    value,
                    Kind::Record,
                    value.kind_name(),
                ));
            };
            with_nested(owner, slot, key, opts, |nested| merge_map(nested, inner, opts))
        }
        Shape::Scalar(kind) | Shape::Optional(kind) => {
            let next = coerce(key, value, kind).inspect_err(|err| debug!(%err, "coercion failed"))?;
            write_scalar(owner, slot, key, next)
        }
        Shape::Flatten | Shape::Opaque => Ok(false),
    }
}
