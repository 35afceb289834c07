//! Storage strategies backing a `Collection`
//!
//! This module provides the [`Storage`] trait and its implementations. The
//! trait defines the key-value contract a collection writes items through,
//! which keeps the ordering and pagination logic independent of where the
//! items actually live.
//!
//! Two strategies ship with the crate: [`InMemoryStorage`] holds items in a
//! plain map and never loses one, while [`CachedStorage`] serializes items
//! into an expiring [`CacheBackend`], where a value can vanish independently
//! of the collection that still lists its key.

use crate::Result;

mod errors;
pub use errors::StorageError;

mod in_memory;
pub use in_memory::InMemoryStorage;

mod ttl_cache;
pub use ttl_cache::{CacheBackend, TtlCache};

mod cached;
pub use cached::CachedStorage;

/// Key-value persistence contract used by a `Collection`.
///
/// Implementations handle the specifics of how items are persisted. Each
/// operation is an independent, idempotent round trip; the trait makes no
/// ordering guarantee relative to other stores sharing the same backend.
///
/// `fetch` on a key the caller believes present may still fail with
/// [`StorageError::KeyNotFound`] when the backing store expired the value.
/// Callers that want a soft miss instead of an error should go through the
/// collection's keyed read helpers.
pub trait Storage<T> {
    /// Stores an item under `key`, overwriting any previous value.
    fn store(&mut self, key: &str, item: &T) -> Result<()>;

    /// Retrieves the item stored under `key`.
    ///
    /// # Returns
    /// A `Result` containing the item, or `StorageError::KeyNotFound` when
    /// the key was never stored or its value has expired.
    fn fetch(&self, key: &str) -> Result<T>;

    /// Whether a value for `key` is currently materialized.
    fn contains(&self, key: &str) -> bool;

    /// Removes the value stored under `key`. Succeeds even if the key is absent.
    fn remove(&mut self, key: &str) -> Result<()>;
}
