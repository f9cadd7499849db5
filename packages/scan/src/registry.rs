//! Per-type cache of resolved field descriptors.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use kvlayer_core::Result;
use lazy_static::lazy_static;

use crate::decode::Scan;
use crate::resolver::{resolve_fields, FieldDescriptor};

type Resolution = Result<Arc<[FieldDescriptor]>>;

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

/// Cache of resolved field descriptors, keyed by destination type.
///
/// Each type is resolved at most once per registry. A failed resolution
/// (`DuplicateField`) is cached too: the type definition is broken and
/// every later decode into it reports the same error.
///
/// Entries are never evicted. Lookups and inserts are safe from any thread;
/// two threads racing on the same type agree on one descriptor list.
///
/// Most callers use [`Registry::global`]. Tests that need isolation build
/// their own with [`Registry::new`].
#[derive(Default)]
pub struct Registry {
    types: DashMap<TypeId, Resolution>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Descriptors for `T`, resolving them on first use.
    pub fn fields<T: Scan>(&self) -> Resolution {
        let id = TypeId::of::<T>();

        if let Some(cached) = self.types.get(&id) {
            return cached.value().clone();
        }

        self.types
            .entry(id)
            .or_insert_with(|| {
                let type_name = T::type_name();
                match resolve_fields(type_name, T::fields()) {
                    Ok(fields) => {
                        log::trace!("resolved {} fields for {}", fields.len(), type_name);
                        Ok(Arc::from(fields))
                    }
                    Err(e) => {
                        log::error!("rejecting destination type {}: {}", type_name, e);
                        Err(e)
                    }
                }
            })
            .value()
            .clone()
    }

    /// Whether `T` has been resolved (successfully or not).
    pub fn contains<T: Scan>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Number of resolved types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scannable, Error};
    use std::thread;

    scannable! {
        #[derive(Debug, Default)]
        struct Account {
            #[kv = "id"]
            id: u64,
            display_name: String,
        }
    }

    scannable! {
        #[derive(Debug, Default)]
        #[allow(non_snake_case)]
        struct Ambiguous {
            Name: String,
            NaMe: String,
        }
    }

    #[test]
    fn resolves_once_and_caches() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let first = registry.fields::<Account>().unwrap();
        let second = registry.fields::<Account>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<Account>());
        assert_eq!(first[1].camel_name, "displayName");
    }

    #[test]
    fn duplicate_fields_are_cached_as_failures() {
        let registry = Registry::new();

        let first = registry.fields::<Ambiguous>();
        assert!(matches!(first, Err(Error::DuplicateField { .. })));

        let second = registry.fields::<Ambiguous>();
        assert!(matches!(second, Err(Error::DuplicateField { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registries_are_isolated() {
        let a = Registry::new();
        let b = Registry::new();
        a.fields::<Account>().unwrap();
        assert!(a.contains::<Account>());
        assert!(!b.contains::<Account>());
    }

    #[test]
    fn concurrent_resolution_agrees() {
        let registry = Arc::new(Registry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.fields::<Account>().unwrap())
            })
            .collect();

        let results: Vec<Arc<[FieldDescriptor]>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        for pair in results.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1]));
        }
        assert_eq!(registry.len(), 1);
    }
}
