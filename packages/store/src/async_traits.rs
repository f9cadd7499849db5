//! Async variant of the store contract.
//!
//! Enable the `async` feature to use these traits:
//!
//! ```toml
//! [dependencies]
//! kvlayer-store = { version = "0.1", features = ["async"] }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use kvlayer_core::{Input, Result, SetOptions};

use crate::{KvStore, SetMany, TypedValue};

/// Async version of [`KvStore`], operation for operation.
///
/// Semantics are identical: misses are carried in the returned `TypedValue`,
/// `exists_many` answers in input order, and a backend without key
/// enumeration fails `list_keys_by_pattern` with `Error::Unsupported`.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn AsyncKvStore>`.
///
/// # Example
///
/// ```rust,ignore
/// use kvlayer_store::{AsyncKvStore, Result};
///
/// async fn user_keys(store: &dyn AsyncKvStore) -> Result<Vec<String>> {
///     store.list_keys_by_pattern("user:*").await
/// }
/// ```
#[async_trait]
pub trait AsyncKvStore: Send + Sync {
    async fn get(&self, key: &str) -> TypedValue;

    async fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()>;

    async fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        for entry in entries {
            self.set(&entry.key, entry.value, entry.options).await?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()>;

    async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool>;

    async fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            found.push(self.exists(key).await?);
        }
        Ok(found)
    }

    async fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: AsyncKvStore + ?Sized> AsyncKvStore for Box<T> {
    async fn get(&self, key: &str) -> TypedValue {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()> {
        self.as_ref().set(key, value, options).await
    }

    async fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        self.as_ref().set_many(entries).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.as_ref().delete(key).await
    }

    async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        self.as_ref().delete_many(keys).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.as_ref().exists(key).await
    }

    async fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        self.as_ref().exists_many(keys).await
    }

    async fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        self.as_ref().list_keys_by_pattern(pattern).await
    }
}

/// Adapter exposing a sync [`KvStore`] as an [`AsyncKvStore`].
///
/// Calls run inline on the polling task. Wrap stores that block on I/O in
/// your runtime's blocking facility instead.
///
/// # Example
///
/// ```rust,ignore
/// use kvlayer_store::SyncToAsync;
///
/// let async_store = SyncToAsync::new(MySyncStore::new());
/// let shared = async_store.clone();
/// ```
pub struct SyncToAsync<S: ?Sized> {
    inner: Arc<S>,
}

impl<S> SyncToAsync<S> {
    /// Create a new adapter wrapping a sync store.
    pub fn new(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<S: ?Sized> SyncToAsync<S> {
    /// Wrap a store that is already shared.
    pub fn from_arc(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ?Sized> Clone for SyncToAsync<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[async_trait]
impl<S: KvStore + ?Sized + 'static> AsyncKvStore for SyncToAsync<S> {
    async fn get(&self, key: &str) -> TypedValue {
        self.inner.get(key)
    }

    async fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()> {
        self.inner.set(key, value, options)
    }

    async fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        self.inner.set_many(entries)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key)
    }

    async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        self.inner.delete_many(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key)
    }

    async fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        self.inner.exists_many(keys)
    }

    async fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        self.inner.list_keys_by_pattern(pattern)
    }
}
