//! The kvlayer store contract.
//!
//! - `KvStore`: the operation set every backend adapter implements
//! - `TypedValue`: a read result that converts its payload on demand
//! - `KvStoreExt`: typed conveniences for every `KvStore`
//!
//! Adapters translate their own "not found" signal into a `TypedValue`
//! carrying `Error::KeyNotFound`, and fail pattern listing with
//! `Error::Unsupported` when the backend cannot enumerate keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use kvlayer_store::{KvStore, KvStoreExt};
//!
//! fn greet(store: &dyn KvStore) -> kvlayer_store::Result<String> {
//!     store.put("greeting", "hello")?;
//!     store.get("greeting").as_string()
//! }
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for `AsyncKvStore` and the `SyncToAsync`
//! adapter:
//!
//! ```toml
//! [dependencies]
//! kvlayer-store = { version = "0.1", features = ["async"] }
//! ```

pub use bytes::Bytes;

mod ext;
mod traits;
mod typed_value;

pub use ext::KvStoreExt;
pub use traits::{KvStore, SetMany};
pub use typed_value::TypedValue;

pub use kvlayer_core::{pattern, Error, Input, Result, SetOptions};
pub use kvlayer_scan::{Registry, Scan};

#[cfg(feature = "async")]
mod async_traits;

#[cfg(feature = "async")]
pub use async_traits::{AsyncKvStore, SyncToAsync};
