//! In-process backend for the kvlayer store contract.
//!
//! `InMemoryStore` keeps payloads in a locked hash map, honours per-write
//! expiry, and can be bounded with [`InMemoryStoreConfig::max_entries`].
//! It answers pattern listing natively, so it is a complete reference for
//! the `KvStore` contract and the usual test double for code written
//! against it.

mod config;
mod in_memory;

pub use config::InMemoryStoreConfig;
pub use in_memory::{CapacityExceeded, InMemoryStore};
