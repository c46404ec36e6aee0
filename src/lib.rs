//! # Record Patch
//!
//! Partial-update merging for typed records.
//!
//! A target record is mutated in place from a sparsely-populated patch: either
//! a decoded key/value mapping (JSON, YAML) or another record. Only the fields
//! the patch actually supplies are copied, nested records are merged
//! recursively, and every call reports whether anything changed.
//!
//! ```ignore
//! use record_patch::{patch, Record};
//!
//! #[derive(Default, Record)]
//! pub struct Employee {
//!     #[patch(alias = "name")]
//!     pub name: String,
//!     #[patch(alias = "salary,omitempty")]
//!     pub salary: i64,
//! }
//!
//! let mut e = Employee { name: "Han Solo".into(), salary: 15 };
//! let changed = patch::apply_json(&mut e, r#"{"salary": 0}"#)?;
//! assert!(changed && e.salary == 0);
//! ```
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of decoded JSON/YAML payloads
//! - [`schema`] - Field descriptor tables, catalogs and field resolution
//! - [`patch`] - The mapping and typed merge operations

extern crate self as record_patch;

pub mod patch;
pub mod schema;
pub mod value;

pub use patch::{apply, apply_json, apply_record, apply_yaml, MergeOptions, PatchError, Patcher};
pub use record_patch_derive::Record;
pub use schema::{Catalog, FieldDef, Kind, Record, Scalar, ScalarField, Shape};
pub use value::{Map, Value};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}
