//! Structured decoding for kvlayer.
//!
//! Maps a JSON object payload onto a record type, resolving each field
//! against several spellings of its name:
//!
//! 1. An explicit tag (`#[kv = "user_name"]`) is the only name tried.
//! 2. Untagged fields try the field name, then its lowercase, snake_case,
//!    PascalCase and camelCase forms, in that order.
//!
//! Record types register their fields with the [`scannable!`] macro. The
//! resolved field list for each type is built once and cached in a
//! [`Registry`].
//!
//! # Example
//!
//! ```rust
//! use kvlayer_scan::{decode, scannable};
//!
//! scannable! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Profile {
//!         #[kv = "name"]
//!         pub name: String,
//!         pub user_name: String,
//!         pub age: u32,
//!     }
//! }
//!
//! let mut profile = Profile::default();
//! decode(br#"{"name":"Jane","userName":"jane_doe","age":28}"#, &mut profile).unwrap();
//! assert_eq!(profile.user_name, "jane_doe");
//! assert_eq!(profile.age, 28);
//! ```

pub use kvlayer_core::{Error, Result};
pub use serde_json;

mod decode;
mod macros;
mod naming;
mod registry;
mod resolver;

pub use decode::{decode, decode_with, json_kind, nested, FieldValue, Scan};
pub use naming::{to_camel_case, to_pascal_case, to_snake_case};
pub use registry::Registry;
pub use resolver::{resolve_fields, FieldDescriptor, FieldSpec};
