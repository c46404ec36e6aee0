//! Derive macro for `record_patch::Record`.
//!
//! ```ignore
//! #[derive(Default, Record)]
//! pub struct Target {
//!     #[patch(alias = "first_name,omitempty")]
//!     pub first_name: String,
//!     #[patch(nested)]
//!     pub contact: Option<Box<Contact>>,
//!     #[patch(flatten)]
//!     pub name: Name,
//!     #[patch(skip)]
//!     pub cache: Vec<u8>,
//!     private: String,
//! }
//! ```
//!
//! Only `pub` fields are exported. Private and `skip` fields are listed in the
//! field table as opaque and never touched.

use proc_macro::TokenStream;

mod record;

#[proc_macro_derive(Record, attributes(patch))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
