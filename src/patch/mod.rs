//! Patch module - Partial-update merging into records.
//!
//! Two entry points share one algorithm:
//!
//! - [`apply`] merges a decoded key/value [`Map`]. Key presence decides what
//!   is supplied, and loosely-typed numbers are coerced into signed integer
//!   fields.
//! - [`apply_record`] merges another [`Record`]. Plain fields at their zero
//!   value are absent, `Option` fields are present when `Some`, and kinds
//!   must match exactly.
//!
//! Both recurse into nested records and return whether anything changed.
//! The first error aborts the merge; fields written before it stay written,
//! so callers needing atomicity should patch a copy and swap it in.

mod coerce;
mod engine;
mod error;
mod mapping;
mod options;
mod typed;



pub use coerce::{coerce, ensure_same_kind};
pub use error::PatchError;
pub use options::MergeOptions;

use crate::schema::Record;
use crate::value::{self, Map, Value};
use tracing::debug;

/// Patcher applies patches with a fixed set of [`MergeOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Patcher {
    opts: MergeOptions,
}

impl Patcher {
    pub fn new(opts: MergeOptions) -> Self {
        Patcher { opts }
    }

    /// Merges a key/value mapping into `target`. Returns true if any field
    /// changed.
    pub fn apply(&self, target: &mut dyn Record, patch: &Map) -> Result<bool, PatchError> {
        let result = mapping::merge_map(target, patch, &self.opts);
        log_outcome(target, "map", &result);
        result
    }

    /// Merges the present fields of `patch` into `target`. Returns true if any
    /// field changed.
    pub fn apply_record(
        &self,
        target: &mut dyn Record,
        patch: &dyn Record,
    ) -> Result<bool, PatchError> {
        let result = typed::merge_record(target, patch, &self.opts);
        log_outcome(target, "record", &result);
        result
    }

    /// Decodes a JSON object and merges it as a mapping.
    pub fn apply_json(&self, target: &mut dyn Record, json: &str) -> Result<bool, PatchError> {
        let decoded = value::from_json(json)?;
        self.apply_value(target, &decoded)
    }

    /// Decodes a YAML mapping and merges it as a mapping.
    pub fn apply_yaml(&self, target: &mut dyn Record, yaml: &str) -> Result<bool, PatchError> {
        let decoded = value::from_yaml(yaml)?;
        self.apply_value(target, &decoded)
    }

    /// Merges an already decoded value, which must be a map.
    pub fn apply_value(&self, target: &mut dyn Record, patch: &Value) -> Result<bool, PatchError> {
        match patch {
            Value::Map(map) => self.apply(target, map),
            other => Err(PatchError::NotAMap {
                actual: other.kind_name(),
            }),
        }
    }
}

fn log_outcome(target: &dyn Record, form: &str, result: &Result<bool, PatchError>) {
    let record = target.catalog().type_name();
    match result {
        Ok(changed) => debug!(record, form, changed, "patch applied"),
        Err(err) => debug!(record, form, %err, "patch aborted"),
    }
}

/// Merges a key/value mapping into `target` with default options.
pub fn apply(target: &mut dyn Record, patch: &Map) -> Result<bool, PatchError> {
    Patcher::default().apply(target, patch)
}

/// Merges a typed patch record into `target` with default options.
pub fn apply_record(target: &mut dyn Record, patch: &dyn Record) -> Result<bool, PatchError> {
    Patcher::default().apply_record(target, patch)
}

/// Decodes `json` and merges it into `target` with default options.
pub fn apply_json(target: &mut dyn Record, json: &str) -> Result<bool, PatchError> {
    Patcher::default().apply_json(target, json)
}

/// Decodes `yaml` and merges it into `target` with default options.
pub fn apply_yaml(target: &mut dyn Record, yaml: &str) -> Result<bool, PatchError> {
    Patcher::default().apply_yaml(target, yaml)
}
