//! Typed conveniences over any `KvStore`.

use serde::Serialize;

use kvlayer_core::{Input, Result, SetOptions};
use kvlayer_scan::Scan;

use crate::KvStore;

/// Extension trait for typed writes and reads.
///
/// This trait is automatically implemented for every `KvStore`, trait objects
/// included.
///
/// # Example
///
/// ```rust,ignore
/// use kvlayer_store::{KvStore, KvStoreExt};
///
/// fn remember(store: &dyn KvStore) -> kvlayer_store::Result<()> {
///     store.put("visits", "1")?;
///     store.put_json("user:1", &serde_json::json!({"name": "Alice"}))?;
///     Ok(())
/// }
/// ```
pub trait KvStoreExt: KvStore {
    /// Store any value convertible to an [`Input`], without options.
    fn put(&self, key: &str, value: impl Into<Input>) -> Result<()> {
        self.set(key, value.into(), SetOptions::default())
    }

    /// Store a value with write options.
    fn put_with(&self, key: &str, value: impl Into<Input>, options: SetOptions) -> Result<()> {
        self.set(key, value.into(), options)
    }

    /// Serialize `value` as a JSON object or array and store it.
    fn put_json<T: Serialize + Send + Sync + Clone + 'static>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<()> {
        self.set(key, Input::structured(value.clone()), SetOptions::default())
    }

    /// Read `key` and decode its JSON object payload into a fresh `T`.
    fn get_as<T: Scan + Default>(&self, key: &str) -> Result<T> {
        self.get(key).scan()
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
