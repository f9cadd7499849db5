//! Process-local store backed by a locked hash map.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::RwLock;

use kvlayer_core::pattern::Pattern;
use kvlayer_core::{Error, Input, Result, SetOptions};
use kvlayer_store::{KvStore, SetMany, TypedValue};

use crate::InMemoryStoreConfig;

/// Returned (wrapped in `Error::Backend`) when a write would exceed
/// `max_entries`.
#[derive(Debug, thiserror::Error)]
#[error("capacity exceeded: store holds at most {max_entries} entries")]
pub struct CapacityExceeded {
    pub max_entries: usize,
}

#[derive(Clone, Debug)]
struct Entry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// An in-memory [`KvStore`].
///
/// Entries written with an expiry read as absent once it passes: `get`
/// misses, `exists` is false, and pattern listing skips them. Expired
/// entries are dropped lazily, on the read that notices them or when a
/// bounded store needs room.
///
/// All operations take `&self`; share the store across threads behind an
/// `Arc`.
///
/// # Example
///
/// ```rust
/// use kvlayer_memory::InMemoryStore;
/// use kvlayer_store::{KvStore, KvStoreExt};
///
/// let store = InMemoryStore::new();
/// store.put("user:1", "Alice").unwrap();
/// store.put("user:2", "Bob").unwrap();
///
/// assert_eq!(store.get("user:1").as_string().unwrap(), "Alice");
/// assert_eq!(store.list_keys_by_pattern("user:*").unwrap().len(), 2);
/// assert!(store.get("user:3").is_not_found());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    config: InMemoryStoreConfig,
}

impl InMemoryStore {
    /// Create a new empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given settings.
    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &InMemoryStoreConfig {
        &self.config
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge_expired(&mut self.entries.write(), Instant::now())
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn expires_at(&self, options: SetOptions, now: Instant) -> Option<Instant> {
        let after: Option<Duration> = options.expire_after().or(self.config.default_expire);
        after.map(|d| now + d)
    }

    /// Make room for `incoming` new keys, evicting expired entries if needed.
    fn reserve(
        &self,
        entries: &mut HashMap<String, Entry>,
        incoming: usize,
        now: Instant,
    ) -> Result<()> {
        let Some(max_entries) = self.config.max_entries else {
            return Ok(());
        };

        if entries.len() + incoming <= max_entries {
            return Ok(());
        }

        let evicted = purge_expired(entries, now);
        if evicted > 0 {
            log::debug!("evicted {} expired entries to make room", evicted);
        }

        if entries.len() + incoming > max_entries {
            log::debug!(
                "rejecting write of {} new keys: {} of {} slots used",
                incoming,
                entries.len(),
                max_entries
            );
            return Err(Error::backend(CapacityExceeded { max_entries }));
        }
        Ok(())
    }
}

fn purge_expired(entries: &mut HashMap<String, Entry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before - entries.len()
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &str) -> TypedValue {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return TypedValue::new(entry.value.clone()),
                Some(_) => {}
                None => return TypedValue::not_found(key),
            }
        }

        // Expired: drop it unless a writer replaced it in the meantime.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
            log::debug!("dropped expired key {}", key);
        }
        TypedValue::not_found(key)
    }

    fn set(&self, key: &str, value: Input, options: SetOptions) -> Result<()> {
        let bytes = value.to_bytes()?;
        let now = Instant::now();
        let expires_at = self.expires_at(options, now);

        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            self.reserve(&mut entries, 1, now)?;
        }

        log::debug!("set {} ({}, {} bytes)", key, value.kind(), bytes.len());
        entries.insert(
            key.to_string(),
            Entry {
                value: bytes,
                expires_at,
            },
        );
        Ok(())
    }

    /// Encodes every entry before touching the map, then writes them all
    /// under one lock. An encoding or capacity failure writes nothing.
    fn set_many(&self, batch: Vec<SetMany>) -> Result<()> {
        let now = Instant::now();
        let encoded = batch
            .into_iter()
            .map(|entry| {
                let value = entry.value.to_bytes()?;
                let expires_at = self.expires_at(entry.options, now);
                Ok((entry.key, Entry { value, expires_at }))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut entries = self.entries.write();
        let incoming = encoded
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| !entries.contains_key(*key))
            .collect::<HashSet<_>>()
            .len();
        self.reserve(&mut entries, incoming, now)?;

        log::debug!("set_many: {} entries", encoded.len());
        entries.extend(encoded);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        if self.entries.write().remove(key).is_some() {
            log::debug!("deleted {}", key);
        }
        Ok(())
    }

    fn delete_many(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries.write();
        let mut removed = 0;
        for key in keys {
            if entries.remove(*key).is_some() {
                removed += 1;
            }
        }
        log::debug!("delete_many: removed {} of {} keys", removed, keys.len());
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .get(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    fn exists_many(&self, keys: &[&str]) -> Result<Vec<bool>> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(keys
            .iter()
            .map(|key| entries.get(*key).is_some_and(|entry| entry.is_live(now)))
            .collect())
    }

    fn list_keys_by_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = Pattern::parse(pattern);
        let now = Instant::now();

        let mut keys: Vec<String> = self
            .entries
            .read()
            .iter()
            .filter(|(key, entry)| entry.is_live(now) && pattern.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();

        log::debug!("pattern {} matched {} keys", pattern, keys.len());
        Ok(keys)
    }
}
