use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};

/// External expiring cache contract consumed by [`CachedStorage`](super::CachedStorage).
///
/// Values are opaque bytes; key namespacing and serialization are the
/// storage strategy's concern. A `load` or `test` after the backend expired
/// an entry behaves exactly as if the entry was never saved.
pub trait CacheBackend {
    /// Saves `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: Vec<u8>);

    /// Loads the value for `key`, or `None` when absent or expired.
    fn load(&self, key: &str) -> Option<Vec<u8>>;

    /// Whether a live (non-expired) value exists for `key`.
    fn test(&self, key: &str) -> bool {
        self.load(key).is_some()
    }

    /// Drops the value for `key`. Succeeds even if the key is absent.
    fn remove(&mut self, key: &str);
}

/// In-process [`CacheBackend`] with per-entry time-to-live.
///
/// Each saved entry carries a deadline computed from the configured TTL at
/// save time. Entries past their deadline behave as absent; they are dropped
/// lazily on the next `save` of the same key or via [`TtlCache::purge_expired`].
///
/// Deadlines are read through a [`Clock`], so tests can drive expiry with a
/// manually advanced clock instead of sleeping.
#[derive(Debug)]
pub struct TtlCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug)]
struct CacheEntry {
    value: Vec<u8>,
    /// Milliseconds since epoch after which the entry is dead. `None` = no expiry.
    deadline: Option<u64>,
}

impl TtlCache {
    /// Creates a cache whose entries expire `ttl` after being saved.
    ///
    /// A `ttl` of `None` disables expiry entirely.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a cache reading deadlines from the supplied clock.
    pub fn with_clock(ttl: Option<Duration>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    /// Drops every entry whose deadline has passed.
    pub fn purge_expired(&mut self) {
        let now = self.clock.now_millis();
        self.entries
            .retain(|_, entry| entry.deadline.is_none_or(|deadline| now < deadline));
    }

    fn is_live(&self, entry: &CacheEntry) -> bool {
        entry
            .deadline
            .is_none_or(|deadline| self.clock.now_millis() < deadline)
    }
}

impl CacheBackend for TtlCache {
    fn save(&mut self, key: &str, value: Vec<u8>) {
        let deadline = self
            .ttl
            .map(|ttl| self.clock.now_millis() + ttl.as_millis() as u64);
        self.entries
            .insert(key.to_string(), CacheEntry { value, deadline });
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.entries.get(key)?;
        self.is_live(entry).then(|| entry.value.clone())
    }

    fn test(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| self.is_live(entry))
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
