//! Value module - In-memory representation of decoded JSON/YAML payloads.
//!
//! A patch mapping is a [`Map`] of these values.

mod value;

pub use value::*;
