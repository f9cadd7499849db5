//! Per-write options.

use std::time::Duration;

/// Options for a single write.
///
/// The default writes without expiry. Expiry is passed through to the
/// backend untouched; how and when an expired entry disappears is the
/// backend's business.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use kvlayer_core::SetOptions;
///
/// let options = SetOptions::new().expire(Duration::from_secs(30));
/// assert_eq!(options.expire_after(), Some(Duration::from_secs(30)));
/// assert_eq!(SetOptions::default().expire_after(), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetOptions {
    expire: Option<Duration>,
}

impl SetOptions {
    /// Options with no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the entry this long after it is written.
    ///
    /// A zero duration means "no expiry", matching backends that treat a
    /// zero TTL as unset.
    pub fn expire(mut self, after: Duration) -> Self {
        self.expire = if after.is_zero() { None } else { Some(after) };
        self
    }

    /// The requested expiry, if any.
    pub fn expire_after(&self) -> Option<Duration> {
        self.expire
    }
}
