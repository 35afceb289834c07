//! Ordered, keyed, page-windowed collections
//!
//! [`Collection`] combines a storage strategy, per-item ordering snapshots,
//! a lazily rebuilt order index and pagination state behind a single keyed,
//! iterable, countable contract. An item's key and its position are
//! independent: keys never move when the order index is rebuilt, and a key
//! can stay listed even after its cached value has expired.
//!
//! Sorting is deferred. `sort_by` records a [`SortSpec`] and applies it, but
//! the cursor protocol (`valid`, `key`, `current`) re-applies a stale spec on
//! access, so re-iterating after changing the sort always reflects the new
//! order without an explicit rebuild call.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::page::{self, NavEntry, NavLabels};
use crate::sort::{
    OrderRecord, SortDirection, SortDispatcher, SortError, SortKind, SortSpec,
};
use crate::storage::{InMemoryStorage, Storage};
use crate::Result;

mod composite;
pub use composite::Composite;

/// An ordered, keyed container with deferred sorting and page-windowed
/// iteration.
///
/// Items are written through an injected [`Storage`] strategy. The set of
/// members usable for sorting is fixed at construction; their values are
/// snapshotted from each item as it is inserted.
pub struct Collection<T> {
    /// Members of the stored items whose values are snapshotted for ordering
    order_members: Vec<String>,
    storage: Box<dyn Storage<T>>,
    /// Per-key ordering snapshots, the authoritative key set
    attributes: HashMap<String, OrderRecord>,
    /// Keys in first-insertion order; the unsorted baseline
    insertion: Vec<String>,
    /// Current order index; empty until first computed
    order: Vec<String>,
    /// Forces a full index rebuild on next access regardless of spec
    order_dirty: bool,
    /// Zero-based cursor into the order index
    cursor: usize,
    page: usize,
    page_size: Option<usize>,
    count_override: Option<usize>,
    /// Requested sort specification; `None` means insertion order
    spec: Option<SortSpec>,
    /// Spec in effect when the index was last built; outer `None` = never built
    applied: Option<Option<SortSpec>>,
    dispatcher: SortDispatcher,
}

impl<T: Serialize + Clone + 'static> Collection<T> {
    /// Creates an empty in-memory collection ordering by `order_members`.
    pub fn new<I, S>(order_members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_storage(Box::new(InMemoryStorage::new()), order_members)
    }
}

impl<T: Serialize> Collection<T> {
    /// Creates an empty collection writing items through `storage`.
    pub fn with_storage<I, S>(storage: Box<dyn Storage<T>>, order_members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order_members: order_members.into_iter().map(Into::into).collect(),
            storage,
            attributes: HashMap::new(),
            insertion: Vec::new(),
            order: Vec::new(),
            order_dirty: false,
            cursor: 0,
            page: 1,
            page_size: None,
            count_override: None,
            spec: None,
            applied: None,
            dispatcher: SortDispatcher::new(),
        }
    }

    /// The members configured for ordering at construction.
    pub fn order_members(&self) -> &[String] {
        &self.order_members
    }

    // === Insertion ===

    /// Inserts `item` under `key`, appending the key to the order index if
    /// it is not already placed.
    ///
    /// Re-inserting an existing key updates the stored item and its ordering
    /// snapshot without disturbing its position.
    pub fn insert(&mut self, key: impl Into<String>, item: T) -> Result<()> {
        self.add(key.into(), item, None)
    }

    /// Inserts `item` under `key` at the 1-based `position` in the order
    /// index, overwriting whatever key previously occupied that slot.
    ///
    /// The displaced key stays in storage and in the ordering snapshots; it
    /// only becomes unreachable through iteration until the next full
    /// resort. Positions past the end of the index append instead.
    pub fn insert_at(&mut self, key: impl Into<String>, item: T, position: usize) -> Result<()> {
        self.add(key.into(), item, Some(position))
    }

    /// Inserts `item` under an auto-assigned key equal to the current count,
    /// returning the key.
    pub fn push(&mut self, item: T) -> Result<String> {
        let key = self.count().to_string();
        self.add(key.clone(), item, None)?;
        Ok(key)
    }

    /// Inserts every `(key, item)` pair in order.
    pub fn extend<I, S>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        for (key, item) in items {
            self.insert(key, item)?;
        }
        Ok(())
    }

    fn add(&mut self, key: String, item: T, position: Option<usize>) -> Result<()> {
        let snapshot = serde_json::to_value(&item)?;
        let mut record = OrderRecord::new();
        for member in &self.order_members {
            record.insert(
                member.clone(),
                snapshot.get(member).cloned().unwrap_or(Value::Null),
            );
        }

        if !self.attributes.contains_key(&key) {
            self.insertion.push(key.clone());
        }
        self.attributes.insert(key.clone(), record);

        match position {
            Some(position) => {
                let slot = position.saturating_sub(1);
                if slot < self.order.len() {
                    self.order[slot] = key.clone();
                } else {
                    self.order.push(key.clone());
                }
            }
            None => {
                if !self.order.contains(&key) {
                    self.order.push(key.clone());
                }
            }
        }

        self.storage.store(&key, &item)
    }

    // === Removal ===

    /// Removes `key` from storage and the ordering snapshots.
    ///
    /// The order index is invalidated, forcing a full rebuild on next
    /// access, and the cursor rewinds to the start of the current page.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove(key)?;
        if self.attributes.remove(key).is_some() {
            self.insertion.retain(|k| k != key);
        }
        self.order.clear();
        self.order_dirty = true;
        self.rewind();
        Ok(())
    }

    /// Removes `key` and compacts the order index, shifting every later
    /// position down by one.
    ///
    /// Unlike [`remove`](Self::remove) this preserves the relative order of
    /// the remaining keys without a resort.
    pub fn shift_remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove(key)?;
        if self.attributes.remove(key).is_some() {
            self.insertion.retain(|k| k != key);
        }
        self.order.retain(|k| k != key);
        Ok(())
    }

    // === Keyed access ===

    /// Retrieves the item for `key`, treating any storage failure as a soft
    /// miss: the failure is logged and `None` returned.
    ///
    /// Downstream display code degrades gracefully on an expired cache entry
    /// instead of aborting. Use [`try_get`](Self::try_get) to see the
    /// underlying error.
    pub fn get(&self, key: &str) -> Option<T> {
        match self.storage.fetch(key) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(key, error = %e, "collection item unavailable");
                None
            }
        }
    }

    /// Retrieves the item for `key` directly from storage.
    ///
    /// # Returns
    /// The item, or `StorageError::KeyNotFound` when the key was never
    /// inserted or its cached value has expired.
    pub fn try_get(&self, key: &str) -> Result<T> {
        self.storage.fetch(key)
    }

    /// Equivalent to [`insert`](Self::insert).
    pub fn set(&mut self, key: impl Into<String>, item: T) -> Result<()> {
        self.insert(key, item)
    }

    /// Whether `key` is listed and its value currently materialized.
    ///
    /// With cache-backed storage this turns false as soon as the entry
    /// expires, even while the key remains listed internally.
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key) && self.storage.contains(key)
    }

    // === Counting ===

    /// Number of items, honoring the count override when one is set.
    pub fn count(&self) -> usize {
        self.count_override.unwrap_or_else(|| self.true_count())
    }

    /// Number of distinct keys physically present, ignoring any override.
    pub fn true_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The declared eventual size of an incrementally loaded collection, if set.
    pub fn count_override(&self) -> Option<usize> {
        self.count_override
    }

    /// Declares (or clears) the eventual size of the collection.
    ///
    /// Pagination math uses the override even while fewer items are
    /// physically present, and sorting is deferred until the collection is
    /// fully loaded.
    pub fn set_count_override(&mut self, count: Option<usize>) {
        self.count_override = count;
    }

    // === Sorting ===

    /// Sorts the collection by `member` in `direction`, comparing per `kind`.
    ///
    /// `member` must be one of the configured order members and the
    /// comparator must resolve, else an invalid-argument error is returned
    /// immediately. Repeating the sort in effect over an intact non-empty
    /// index is a no-op, and the actual reorder may still be deferred for an
    /// incrementally loaded collection.
    pub fn sort_by(&mut self, member: &str, direction: SortDirection, kind: SortKind) -> Result<()> {
        if !self.order_members.iter().any(|m| m == member) {
            return Err(SortError::MemberNotOrderable {
                member: member.into(),
            }
            .into());
        }
        let spec = SortSpec::new(member, direction, kind);
        // surface comparator resolution failures now, not at first access
        self.dispatcher.validate(&spec)?;
        self.spec = Some(spec);
        self.apply_sort()
    }

    /// Applies the current sort specification (or initializes insertion
    /// order when none is set) without changing it.
    pub fn resort(&mut self) -> Result<()> {
        self.apply_sort()
    }

    /// The requested sort specification, `None` meaning insertion order.
    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.spec.as_ref()
    }

    /// Assigns the sort specification directly, validating it first.
    ///
    /// `None` is always valid. The new spec takes effect lazily, on the next
    /// access through the cursor protocol.
    pub fn set_sort_spec(&mut self, spec: Option<SortSpec>) -> Result<()> {
        if let Some(spec) = &spec {
            if !self.order_members.iter().any(|m| m == &spec.member) {
                return Err(SortError::MemberNotOrderable {
                    member: spec.member.clone(),
                }
                .into());
            }
            self.dispatcher.validate(spec)?;
        }
        self.spec = spec;
        Ok(())
    }

    /// Registers a comparator consulted ahead of the built-ins whenever the
    /// collection sorts by exactly `spec`.
    pub fn register_comparator(
        &mut self,
        spec: SortSpec,
        comparator: impl Fn(&OrderRecord, &OrderRecord) -> std::cmp::Ordering + 'static,
    ) {
        self.dispatcher.register(spec, comparator);
    }

    fn is_stale(&self) -> bool {
        self.applied.as_ref() != Some(&self.spec)
    }

    /// The lazy-sort core: rebuilds the order index when the spec changed,
    /// the index is empty, or a removal invalidated it. Incremental
    /// collections (count override above the materialized count) defer the
    /// reorder until fully loaded.
    fn apply_sort(&mut self) -> Result<()> {
        let fully_loaded = self.count_override.is_none() || self.count() == self.true_count();
        if fully_loaded {
            if let Some(spec) = self.spec.clone() {
                if self.is_stale() || self.order_dirty || self.order.is_empty() {
                    debug!(member = %spec.member, "rebuilding collection order index");
                    let mut order = self.insertion.clone();
                    {
                        let comparator = self.dispatcher.resolve(&spec)?;
                        let attributes = &self.attributes;
                        order.sort_by(|a, b| comparator(&attributes[a], &attributes[b]));
                    }
                    self.order = order;
                }
            } else if self.order_dirty || self.order.is_empty() {
                self.order = self.insertion.clone();
            }
            self.order_dirty = false;
        } else if self.is_stale() {
            // spec changed mid-load; drop the stale index and rebuild in
            // full once the collection finishes loading
            self.order.clear();
            self.order_dirty = true;
        }
        self.applied = Some(self.spec.clone());
        Ok(())
    }

    /// Infallible wrapper for the cursor protocol. Resolution failures are
    /// precluded by the validating setters, so a failure here only means an
    /// inconsistent registry; fall back to insertion order and log it.
    fn ensure_sorted(&mut self) {
        if let Err(e) = self.apply_sort() {
            warn!(error = %e, "deferred sort failed; using insertion order");
            self.order = self.insertion.clone();
            self.order_dirty = false;
        }
    }

    // === Cursor protocol ===

    /// Resets the cursor to the first slot of the current page.
    pub fn rewind(&mut self) {
        self.cursor = (self.page - 1) * self.page_size.unwrap_or(0);
    }

    /// Whether the cursor points at a position inside the current page
    /// window, resorting first if the index is empty or the spec is stale.
    pub fn valid(&mut self) -> bool {
        if self.order.is_empty() || self.order_dirty || self.is_stale() {
            self.ensure_sorted();
        }
        if let Some(page_size) = self.page_size
            && self.key() > page_size * self.page
        {
            return false;
        }
        self.cursor < self.order.len()
    }

    /// The cursor's 1-based position.
    ///
    /// A stale sort specification triggers a resort and rewind first, so the
    /// position always refers to the current order.
    pub fn key(&mut self) -> usize {
        if self.is_stale() {
            self.ensure_sorted();
            self.rewind();
        }
        self.cursor + 1
    }

    /// The item at the cursor, as a soft miss.
    pub fn current(&mut self) -> Option<T> {
        if self.order.is_empty() || self.order_dirty {
            self.ensure_sorted();
        }
        let key = self.order.get(self.cursor)?.clone();
        self.get(&key)
    }

    /// Advances the cursor one position.
    pub fn next(&mut self) {
        self.cursor += 1;
    }

    /// Iterates the current page window, yielding the 1-based position and
    /// the (possibly expired) item at each slot.
    pub fn iter_page(&mut self) -> PageIter<'_, T> {
        self.rewind();
        PageIter { collection: self }
    }

    /// Collects the current page into `(key, item)` pairs in order, skipping
    /// expired items.
    pub fn to_vec(&mut self) -> Vec<(String, T)> {
        self.rewind();
        let mut items = Vec::new();
        while self.valid() {
            if let Some(key) = self.order.get(self.cursor).cloned()
                && let Some(item) = self.get(&key)
            {
                items.push((key, item));
            }
            self.next();
        }
        items
    }

    /// The first item in the current order, or `None` when the collection is
    /// empty, unordered, or the top entry has expired.
    ///
    /// Never raises; an all-expired collection yields `None`.
    pub fn top(&self) -> Option<T> {
        let key = self.order.first()?;
        self.storage.fetch(key).ok()
    }

    /// The ordering snapshot for the key at the 1-based `position`.
    pub fn ordering_at(&self, position: usize) -> Option<&OrderRecord> {
        let key = self.order.get(position.checked_sub(1)?)?;
        self.attributes.get(key)
    }

    // === Pagination state ===

    /// Current page, always at least 1.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the current page, clamping to at least 1.
    ///
    /// When the requested page's start position exceeds the count, the page
    /// resets to the last valid page instead.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        if self.start().is_none() {
            self.page = self.pages();
        }
    }

    /// Page size in effect; defaults to the full count when unset.
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or_else(|| self.count())
    }

    /// Sets or clears the page size. `None` means unbounded pages.
    pub fn set_page_size(&mut self, page_size: Option<usize>) {
        self.page_size = page_size;
    }

    /// Total number of pages; at least 1, and exactly 1 when the collection
    /// is empty.
    pub fn pages(&self) -> usize {
        match self.page_size {
            Some(page_size) => page::page_count(page_size, self.count()),
            None => 1,
        }
    }

    /// 1-based position of the first item on the current page, or `None`
    /// when the page is past the last valid one.
    pub fn start(&self) -> Option<usize> {
        page::window(self.page, self.page_size(), self.count()).map(|(start, _)| start)
    }

    /// 1-based position of the last item on the current page, or `None`
    /// when the page is past the last valid one.
    pub fn end(&self) -> Option<usize> {
        page::window(self.page, self.page_size(), self.count()).map(|(_, end)| end)
    }

    /// Page numbers around the current page, `buffer` on each side.
    pub fn page_number_list(&self, buffer: usize) -> Vec<usize> {
        page::page_numbers(buffer, self.page, self.pages())
    }

    /// Navigation strip for the current page.
    pub fn nav(&self, buffer: usize, labels: &NavLabels) -> Vec<NavEntry> {
        page::nav_entries(buffer, self.page, self.pages(), labels)
    }
}

/// Iterator over a collection's current page window.
///
/// Yields `(position, item)` with 1-based positions; an expired item yields
/// `None` in place of the value so the window's shape is preserved.
pub struct PageIter<'a, T> {
    collection: &'a mut Collection<T>,
}

impl<T: Serialize> Iterator for PageIter<'_, T> {
    type Item = (usize, Option<T>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.collection.valid() {
            return None;
        }
        let position = self.collection.key();
        let item = self.collection.current();
        self.collection.next();
        Some((position, item))
    }
}
