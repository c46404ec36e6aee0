//! Patch errors.

use crate::schema::{AssignError, Kind};
use thiserror::Error;

/// PatchError aborts a merge. Fields written before it stay written.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("field `{field}` types mismatch while patching: {expected} vs {actual} ({value})")]
    TypeMismatch {
        field: String,
        value: String,
        expected: Kind,
        actual: String,
    },

    #[error("field `{field}` could not be written: {source}")]
    WriteFailure {
        field: String,
        #[source]
        source: AssignError,
    },

    #[error("patch must be a map, got {actual}")]
    NotAMap { actual: &'static str },

    #[error("invalid JSON patch: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML patch: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PatchError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        value: impl ToString,
        expected: Kind,
        actual: impl Into<String>,
    ) -> Self {
        PatchError::TypeMismatch {
            field: field.into(),
            value: value.to_string(),
            expected,
            actual: actual.into(),
        }
    }

    /// Creates a write failure error.
    pub fn write_failure(field: impl Into<String>, source: AssignError) -> Self {
        PatchError::WriteFailure {
            field: field.into(),
            source,
        }
    }

    /// Returns true for [`PatchError::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, PatchError::TypeMismatch { .. })
    }

    /// The field the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            PatchError::TypeMismatch { field, .. } | PatchError::WriteFailure { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = PatchError::type_mismatch("salary", "\"euros\"", Kind::I32, "string");
        assert_eq!(
            err.to_string(),
            "field `salary` types mismatch while patching: i32 vs string (\"euros\")"
        );
        assert!(err.is_type_mismatch());
        assert_eq!(err.field(), Some("salary"));
    }

    #[test]
    fn test_write_failure_keeps_source() {
        let err = PatchError::write_failure("name", AssignError::NotWritable);
        assert!(err.to_string().contains("not writable"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
