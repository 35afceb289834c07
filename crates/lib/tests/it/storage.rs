//! Storage strategy tests: in-memory, cache-backed, and expiry behavior.

use std::sync::Arc;
use std::time::Duration;

use shelf::{CachedStorage, Collection, InMemoryStorage, Storage, TtlCache};

use crate::helpers::*;

fn cached_collection(ttl: Option<Duration>, clock: Arc<ManualClock>) -> Collection<Product> {
    let cache = TtlCache::with_clock(ttl, clock);
    let storage = CachedStorage::new(Box::new(cache));
    Collection::with_storage(Box::new(storage), ["price", "name"])
}

#[test]
fn in_memory_fetch_roundtrip() {
    let mut storage = InMemoryStorage::new();
    storage.store("k", &product(1, "one")).unwrap();

    assert!(storage.contains("k"));
    assert_eq!(storage.fetch("k").unwrap().name, "one");

    let err = storage.fetch("missing").unwrap_err();
    assert!(err.is_not_found());

    // removal is idempotent
    storage.remove("k").unwrap();
    storage.remove("k").unwrap();
    assert!(!storage.contains("k"));
}

#[test]
fn cached_storage_roundtrip_without_ttl() {
    let clock = Arc::new(ManualClock::default());
    let mut collection = cached_collection(None, clock);
    collection.insert("a", product(1, "alpha")).unwrap();
    collection.insert("b", product(2, "beta")).unwrap();

    assert_eq!(collection.get("a").unwrap().name, "alpha");
    assert_eq!(page_names(&mut collection), vec!["alpha", "beta"]);
}

#[test]
fn expired_entries_read_as_absent_while_still_listed() {
    let clock = Arc::new(ManualClock::default());
    let mut collection = cached_collection(Some(Duration::from_secs(1)), clock.clone());
    collection.insert("a", product(1, "alpha")).unwrap();
    collection.insert("b", product(2, "beta")).unwrap();

    clock.advance(1_001);

    // the index of known keys outlives the materialized values
    assert_eq!(collection.true_count(), 2);
    assert!(!collection.contains("a"));
    assert_eq!(collection.get("a"), None);
    let err = collection.try_get("a").unwrap_err();
    assert!(err.is_not_found());

    // iteration preserves the window's shape, with absent values
    let window: Vec<(usize, Option<Product>)> = collection.iter_page().collect();
    assert_eq!(window.len(), 2);
    assert!(window.iter().all(|(_, item)| item.is_none()));

    // an all-expired collection yields an empty sentinel, not an error
    assert!(collection.top().is_none());
}

#[test]
fn expiry_is_per_entry() {
    let clock = Arc::new(ManualClock::default());
    let mut collection = cached_collection(Some(Duration::from_secs(1)), clock.clone());

    collection.insert("old", product(1, "old")).unwrap();
    clock.advance(600);
    collection.insert("new", product(2, "new")).unwrap();
    clock.advance(500);

    assert!(!collection.contains("old"));
    assert!(collection.contains("new"));
    assert_eq!(page_names(&mut collection), vec!["new"]);
}

#[test]
fn reinserting_refreshes_the_deadline() {
    let clock = Arc::new(ManualClock::default());
    let mut collection = cached_collection(Some(Duration::from_secs(1)), clock.clone());

    collection.insert("a", product(1, "alpha")).unwrap();
    clock.advance(900);
    collection.insert("a", product(1, "alpha")).unwrap();
    clock.advance(900);

    assert!(collection.contains("a"));
}

#[test]
fn namespaces_isolate_collections_sharing_a_backend() {
    let shared = SharedCache::new(TtlCache::new(None));

    let mut left: Collection<Product> = Collection::with_storage(
        Box::new(CachedStorage::new(Box::new(shared.clone()))),
        ["price", "name"],
    );
    let mut right: Collection<Product> = Collection::with_storage(
        Box::new(CachedStorage::new(Box::new(shared.clone()))),
        ["price", "name"],
    );

    left.insert("k", product(1, "left")).unwrap();
    right.insert("k", product(2, "right")).unwrap();

    assert_eq!(left.get("k").unwrap().name, "left");
    assert_eq!(right.get("k").unwrap().name, "right");

    left.remove("k").unwrap();
    assert_eq!(left.get("k"), None);
    assert_eq!(right.get("k").unwrap().name, "right");
}

#[test]
fn explicit_namespaces_are_stable() {
    let shared = SharedCache::new(TtlCache::new(None));

    let mut writer: Collection<Product> = Collection::with_storage(
        Box::new(CachedStorage::with_namespace(
            Box::new(shared.clone()),
            "results",
        )),
        ["price", "name"],
    );
    writer.insert("k", product(7, "seven")).unwrap();

    let reader: CachedStorage<Product> =
        CachedStorage::with_namespace(Box::new(shared.clone()), "results");
    assert_eq!(reader.fetch("k").unwrap().name, "seven");
    assert_eq!(reader.namespace(), "results");
}

#[test]
fn purge_expired_drops_dead_entries() {
    let clock = Arc::new(ManualClock::default());
    let mut cache = TtlCache::with_clock(Some(Duration::from_millis(10)), clock.clone());

    use shelf::CacheBackend;
    cache.save("a", vec![1]);
    clock.advance(11);
    cache.save("b", vec![2]);

    cache.purge_expired();
    assert!(!cache.test("a"));
    assert!(cache.test("b"));
}
