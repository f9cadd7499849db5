//! The operation set every backend adapter implements.

use std::sync::Arc;

use kvlayer_core::{Input, Result, SetOptions};

use crate::TypedValue;

/// One entry of a bulk write.
#[derive(Debug)]
pub struct SetMany {
    pub key: String,
    pub value: Input,
    pub options: SetOptions,
}

impl SetMany {
    /// An entry written without options.
    pub fn new(key: impl Into<String>, value: impl Into<Input>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            options: SetOptions::default(),
        }
    }

    /// Replace the entry's write options.
    pub fn with_options(mut self, options: SetOptions) -> Self {
        self.options = options;
        self
    }
}

/// A key-value backend.
///
/// Keys are strings, segmented by `:` for pattern listing. Values are opaque
/// byte payloads: writes encode an [`Input`] with [`Input::to_bytes`] and
/// reads hand the stored bytes back inside a [`TypedValue`].
///
/// # Reads
///
/// `get` never fails directly. A miss is a `TypedValue` carrying
/// `Error::KeyNotFound`; adapters must translate their native "not found"
/// signal into exactly that, and report transport failures as any other
/// error.
///
/// # Pattern listing
///
/// `list_keys_by_pattern` follows the rules in [`kvlayer_core::pattern`]. A
/// backend that cannot enumerate keys returns `Error::Unsupported`. It must
/// never answer with an empty list, since "no matches" and "cannot tell" are
/// different answers.
///
/// # Bulk operations
///
/// The `*_many` methods have default implementations that loop over the
/// single-key operations and stop at the first error. Adapters with native
/// batch commands should override them. `exists_many` answers in input
/// order, whatever order the backend completes in.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn KvStore>` or
/// `Arc<dyn KvStore>`.
pub trait KvStore: Send + Sync {
    /// Read the payload stored under `key`.
    fn get(&self, key: &str) -> TypedValue;

    /// Encode `value` and store it under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()>;

    /// Write several entries.
    fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        for entry in entries {
            self.set(&entry.key, entry.value, entry.options)?;
        }
        Ok(())
    }

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Remove several keys.
    fn delete_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key)?;
        }
        Ok(())
    }

    /// Whether `key` currently holds a value.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Existence of each key, in input order.
    fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        keys.iter().map(|key| self.exists(key)).collect()
    }

    /// Every stored key matching `pattern`, in no particular order.
    fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>>;
}

// Blanket implementations for references and smart pointers

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> TypedValue {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()> {
        (**self).set(key, value, options)
    }

    fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        (**self).set_many(entries)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn delete_many(&self, keys: &[&str]) -> Result<()> {
        (**self).delete_many(keys)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        (**self).exists_many(keys)
    }

    fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        (**self).list_keys_by_pattern(pattern)
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> TypedValue {
        self.as_ref().get(key)
    }

    fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()> {
        self.as_ref().set(key, value, options)
    }

    fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        self.as_ref().set_many(entries)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.as_ref().delete(key)
    }

    fn delete_many(&self, keys: &[&str]) -> Result<()> {
        self.as_ref().delete_many(keys)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.as_ref().exists(key)
    }

    fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        self.as_ref().exists_many(keys)
    }

    fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        self.as_ref().list_keys_by_pattern(pattern)
    }
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get(&self, key: &str) -> TypedValue {
        self.as_ref().get(key)
    }

    fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()> {
        self.as_ref().set(key, value, options)
    }

    fn set_many(&self, entries: Vec<SetMany>) -> Result<()> {
        self.as_ref().set_many(entries)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.as_ref().delete(key)
    }

    fn delete_many(&self, keys: &[&str]) -> Result<()> {
        self.as_ref().delete_many(keys)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.as_ref().exists(key)
    }

    fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        self.as_ref().exists_many(keys)
    }

    fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        self.as_ref().list_keys_by_pattern(pattern)
    }
}
