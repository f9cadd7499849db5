use std::time::Duration;

/// Settings for an [`InMemoryStore`](crate::InMemoryStore).
///
/// The default is unbounded with no expiry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InMemoryStoreConfig {
    /// Expiry applied to writes that do not request one.
    pub default_expire: Option<Duration>,
    /// Upper bound on stored entries. Expired entries are evicted to make
    /// room; a write that still does not fit fails.
    pub max_entries: Option<usize>,
}

impl InMemoryStoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire entries this long after writing unless the write says otherwise.
    /// A zero duration clears the default.
    pub fn default_expire(mut self, after: Duration) -> Self {
        self.default_expire = if after.is_zero() { None } else { Some(after) };
        self
    }

    /// Cap the number of stored entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }
}
