use std::collections::HashMap;

use crate::Result;
use crate::storage::{Storage, StorageError};

/// A simple in-memory storage strategy using a `HashMap`.
///
/// This is the default strategy for collections whose items comfortably fit
/// in process memory. `fetch` on a present key always succeeds.
#[derive(Debug, Default)]
pub struct InMemoryStorage<T> {
    items: HashMap<String, T>,
}

impl<T> InMemoryStorage<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> Storage<T> for InMemoryStorage<T> {
    fn store(&mut self, key: &str, item: &T) -> Result<()> {
        self.items.insert(key.to_string(), item.clone());
        Ok(())
    }

    fn fetch(&self, key: &str) -> Result<T> {
        self.items
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::KeyNotFound { key: key.into() }.into())
    }

    fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}
