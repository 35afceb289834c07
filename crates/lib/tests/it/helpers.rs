//! Shared helpers for the integration test suite.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use shelf::{CacheBackend, Clock, Collection, TtlCache};

// ===== TEST DATA STRUCTURES =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub price: i64,
    pub name: String,
}

pub fn product(price: i64, name: &str) -> Product {
    Product {
        price,
        name: name.to_string(),
    }
}

/// An empty collection ordering by `price` and `name`.
pub fn product_collection() -> Collection<Product> {
    Collection::new(["price", "name"])
}

/// A collection preloaded with `n` products under keys `item0..item{n-1}`,
/// priced by insertion index.
pub fn seeded(n: usize) -> Collection<Product> {
    let mut collection = product_collection();
    for i in 0..n {
        collection
            .insert(format!("item{i}"), product(i as i64, &format!("product {i}")))
            .unwrap();
    }
    collection
}

/// Names of the items on the current page, in order, skipping expired ones.
pub fn page_names(collection: &mut Collection<Product>) -> Vec<String> {
    collection
        .iter_page()
        .filter_map(|(_, item)| item.map(|p| p.name))
        .collect()
}

// ===== CLOCK CONTROL =====

/// Manually advanced clock for exercising cache expiry without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

// ===== SHARED CACHE BACKEND =====

/// A `CacheBackend` handle that several storage strategies can share,
/// for exercising cross-instance namespacing.
#[derive(Clone)]
pub struct SharedCache(pub Rc<RefCell<TtlCache>>);

impl SharedCache {
    pub fn new(cache: TtlCache) -> Self {
        Self(Rc::new(RefCell::new(cache)))
    }
}

impl CacheBackend for SharedCache {
    fn save(&mut self, key: &str, value: Vec<u8>) {
        self.0.borrow_mut().save(key, value);
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.0.borrow().load(key)
    }

    fn test(&self, key: &str) -> bool {
        self.0.borrow().test(key)
    }

    fn remove(&mut self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}
