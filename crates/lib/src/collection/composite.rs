use serde::Serialize;

use crate::Result;
use crate::collection::{Collection, PageIter};
use crate::page::{NavEntry, NavLabels};
use crate::sort::{SortDirection, SortKind, SortSpec};

/// Collection semantics by delegation.
///
/// Types that own a [`Collection`] but are not collections themselves
/// implement the two accessors and inherit the full keyed, iterable,
/// countable contract as provided methods, each forwarding unchanged to the
/// inner collection. Nothing is re-derived: sorting, paging and soft-miss
/// behavior are exactly the inner collection's.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use shelf::{Collection, Composite};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Hit {
///     score: u32,
/// }
///
/// struct SearchResults {
///     hits: Collection<Hit>,
/// }
///
/// impl Composite<Hit> for SearchResults {
///     fn collection(&self) -> &Collection<Hit> {
///         &self.hits
///     }
///     fn collection_mut(&mut self) -> &mut Collection<Hit> {
///         &mut self.hits
///     }
/// }
///
/// let mut results = SearchResults {
///     hits: Collection::new(["score"]),
/// };
/// results.insert("a", Hit { score: 7 }).unwrap();
/// assert_eq!(results.count(), 1);
/// ```
pub trait Composite<T: Serialize> {
    /// The collection every contract operation forwards to.
    fn collection(&self) -> &Collection<T>;

    /// Mutable access to the forwarded collection.
    fn collection_mut(&mut self) -> &mut Collection<T>;

    // === Forwarded contract ===

    fn insert(&mut self, key: impl Into<String>, item: T) -> Result<()> {
        self.collection_mut().insert(key, item)
    }

    fn insert_at(&mut self, key: impl Into<String>, item: T, position: usize) -> Result<()> {
        self.collection_mut().insert_at(key, item, position)
    }

    fn push(&mut self, item: T) -> Result<String> {
        self.collection_mut().push(item)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.collection_mut().remove(key)
    }

    fn shift_remove(&mut self, key: &str) -> Result<()> {
        self.collection_mut().shift_remove(key)
    }

    fn get(&self, key: &str) -> Option<T> {
        self.collection().get(key)
    }

    fn try_get(&self, key: &str) -> Result<T> {
        self.collection().try_get(key)
    }

    fn set(&mut self, key: impl Into<String>, item: T) -> Result<()> {
        self.collection_mut().set(key, item)
    }

    fn contains(&self, key: &str) -> bool {
        self.collection().contains(key)
    }

    fn count(&self) -> usize {
        self.collection().count()
    }

    fn true_count(&self) -> usize {
        self.collection().true_count()
    }

    fn is_empty(&self) -> bool {
        self.collection().is_empty()
    }

    fn sort_by(&mut self, member: &str, direction: SortDirection, kind: SortKind) -> Result<()> {
        self.collection_mut().sort_by(member, direction, kind)
    }

    // `T` must outlive the borrow of the inner collection
    fn sort_spec<'a>(&'a self) -> Option<&'a SortSpec>
    where
        T: 'a,
    {
        self.collection().sort_spec()
    }

    fn set_sort_spec(&mut self, spec: Option<SortSpec>) -> Result<()> {
        self.collection_mut().set_sort_spec(spec)
    }

    fn current(&mut self) -> Option<T> {
        self.collection_mut().current()
    }

    fn next(&mut self) {
        self.collection_mut().next()
    }

    fn key(&mut self) -> usize {
        self.collection_mut().key()
    }

    fn valid(&mut self) -> bool {
        self.collection_mut().valid()
    }

    fn rewind(&mut self) {
        self.collection_mut().rewind()
    }

    fn iter_page(&mut self) -> PageIter<'_, T> {
        self.collection_mut().iter_page()
    }

    fn top(&self) -> Option<T> {
        self.collection().top()
    }

    fn page(&self) -> usize {
        self.collection().page()
    }

    fn set_page(&mut self, page: usize) {
        self.collection_mut().set_page(page)
    }

    fn page_size(&self) -> usize {
        self.collection().page_size()
    }

    fn set_page_size(&mut self, page_size: Option<usize>) {
        self.collection_mut().set_page_size(page_size)
    }

    fn pages(&self) -> usize {
        self.collection().pages()
    }

    fn start(&self) -> Option<usize> {
        self.collection().start()
    }

    fn end(&self) -> Option<usize> {
        self.collection().end()
    }

    fn count_override(&self) -> Option<usize> {
        self.collection().count_override()
    }

    fn set_count_override(&mut self, count: Option<usize>) {
        self.collection_mut().set_count_override(count)
    }

    fn nav(&self, buffer: usize, labels: &NavLabels) -> Vec<NavEntry> {
        self.collection().nav(buffer, labels)
    }

    fn page_number_list(&self, buffer: usize) -> Vec<usize> {
        self.collection().page_number_list(buffer)
    }
}
