//! Merge options.

use serde::{Deserialize, Serialize};

/// MergeOptions tunes the optional-field behavior of a merge.
///
/// Both switches default to on. Hosts can load them from their own
/// configuration; missing keys keep the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    /// A mapping `null` resets an optional target field to `None`.
    /// When off, `null` is a type mismatch like any other non-coercible value.
    pub null_clears_optional: bool,

    /// An absent optional nested record is created from its default before
    /// a nested patch is merged into it. When off, that is a type mismatch.
    pub materialize_missing: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            null_clears_optional: true,
            materialize_missing: true,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        MergeOptions::default()
    }

    pub fn with_null_clears_optional(mut self, enabled: bool) -> Self {
        self.null_clears_optional = enabled;
        self
    }

    pub fn with_materialize_missing(mut self, enabled: bool) -> Self {
        self.materialize_missing = enabled;
        self
    }
}
