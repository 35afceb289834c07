use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::Result;
use crate::storage::{CacheBackend, Storage, StorageError};

/// Storage strategy that keeps items in an expiring [`CacheBackend`].
///
/// Items are serialized to JSON and saved under a namespaced, hashed cache
/// key. The namespace is a UUIDv4 generated at construction, so independent
/// collections sharing one backend cannot collide. It avoids collisions only;
/// it provides no isolation against concurrent external writers.
///
/// Because the backend expires entries on its own schedule, `fetch` may
/// return [`StorageError::KeyNotFound`] for a key the owning collection still
/// lists. The index of known keys can outlive the materialized values; the
/// collection's keyed read helpers turn such misses into absent results.
pub struct CachedStorage<T> {
    backend: Box<dyn CacheBackend>,
    namespace: String,
    phantom: PhantomData<fn() -> T>,
}

impl<T> CachedStorage<T> {
    /// Wraps `backend` with a fresh random namespace.
    pub fn new(backend: Box<dyn CacheBackend>) -> Self {
        Self::with_namespace(backend, Uuid::new_v4().to_string())
    }

    /// Wraps `backend` under an explicit namespace.
    ///
    /// Callers supplying their own namespace are responsible for keeping it
    /// unique among the stores sharing the backend.
    pub fn with_namespace(backend: Box<dyn CacheBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            phantom: PhantomData,
        }
    }

    /// The namespace prefixing every cache key written by this store.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn cache_key(&self, key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        format!("{}:{}", self.namespace, hex::encode(digest))
    }
}

impl<T> Storage<T> for CachedStorage<T>
where
    T: Serialize + DeserializeOwned,
{
    fn store(&mut self, key: &str, item: &T) -> Result<()> {
        let bytes = serde_json::to_vec(item).map_err(|e| StorageError::SerializationFailed {
            key: key.into(),
            reason: e.to_string(),
        })?;
        self.backend.save(&self.cache_key(key), bytes);
        Ok(())
    }

    fn fetch(&self, key: &str) -> Result<T> {
        match self.backend.load(&self.cache_key(key)) {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::DeserializationFailed {
                    key: key.into(),
                    reason: e.to_string(),
                }
                .into()
            }),
            None => Err(StorageError::KeyNotFound { key: key.into() }.into()),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.backend.test(&self.cache_key(key))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.backend.remove(&self.cache_key(key));
        Ok(())
    }
}
