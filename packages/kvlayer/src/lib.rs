//! kvlayer: one interface over many key-value backends.
//!
//! Writes take any [`Input`] and store its byte encoding. Reads return a
//! [`TypedValue`] that holds the raw payload until you ask for a type:
//!
//! ```rust
//! use kvlayer::{InMemoryStore, KvStore, KvStoreExt};
//!
//! let store = InMemoryStore::new();
//! store.put("user:1", "Alice").unwrap();
//! store.put("user:2", "Bob").unwrap();
//! store.put("admin:1", "Root").unwrap();
//!
//! assert_eq!(store.list_keys_by_pattern("user:*").unwrap(), ["user:1", "user:2"]);
//! assert_eq!(store.get("user:1").as_string().unwrap(), "Alice");
//! assert!(store.get("missing").is_not_found());
//! ```
//!
//! JSON object payloads decode into record types declared with
//! [`scannable!`]:
//!
//! ```rust
//! use kvlayer::{scannable, InMemoryStore, KvStoreExt};
//!
//! scannable! {
//!     #[derive(Debug, Default)]
//!     pub struct User {
//!         #[kv = "name"]
//!         pub name: String,
//!         pub age: u32,
//!     }
//! }
//!
//! let store = InMemoryStore::new();
//! store.put("user:1", r#"{"name":"John","age":30}"#).unwrap();
//! let user: User = store.get_as("user:1").unwrap();
//! assert_eq!(user.age, 30);
//! ```
//!
//! # Crates
//!
//! - `kvlayer-core`: errors, `Input` encoding, key patterns
//! - `kvlayer-scan`: field resolution and structured decoding
//! - `kvlayer-store`: the `KvStore` contract and `TypedValue`
//! - `kvlayer-memory`: the in-process backend

pub use kvlayer_core::{pattern, Bytes, Error, Input, Result, SetOptions};
pub use kvlayer_memory::{CapacityExceeded, InMemoryStore, InMemoryStoreConfig};
pub use kvlayer_scan::{
    decode, decode_with, scannable, FieldDescriptor, FieldSpec, FieldValue, Registry, Scan,
};
pub use kvlayer_store::{KvStore, KvStoreExt, SetMany, TypedValue};

#[cfg(feature = "async")]
pub use kvlayer_store::{AsyncKvStore, SyncToAsync};
