//! Schema module - Field descriptors of patchable records.
//!
//! Each record type carries a static field table (name, alias, visibility,
//! shape) built once into a [`Catalog`]. The merge engine only ever talks to
//! records through this table and the [`Record`] accessors.

mod catalog;
mod kind;
mod record;
pub mod resolve;

pub use catalog::*;
pub use kind::*;
pub use record::*;
