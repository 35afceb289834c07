//!
//! Shelf: lazily sorted, page-windowed keyed collections with pluggable storage.
//!
//! ## Core Concepts
//!
//! A [`Collection`] is an ordered, keyed container in which an item's identity
//! (its key) and its position (its slot in the order index) are independent:
//!
//! * **Keys**: Caller-supplied or auto-assigned identifiers, unique within a collection.
//! * **Ordering snapshots (`sort::OrderRecord`)**: The attribute values used for
//!   comparisons are captured when an item is inserted, so sorting stays correct
//!   no matter what happens to the stored item afterwards.
//! * **Order index**: The sequence of keys defining iteration order. It is rebuilt
//!   lazily, on first access or whenever the active [`sort::SortSpec`] changes.
//! * **Pagination (`page`)**: Iteration is clipped to the current page window;
//!   window bounds and navigable page lists are pure arithmetic over
//!   (count, page size, page).
//! * **Storage strategies (`storage::Storage`)**: Items live behind a pluggable
//!   key-value store. [`storage::InMemoryStorage`] never loses a value;
//!   [`storage::CachedStorage`] serializes items into an expiring cache, so a
//!   fetch can miss for a key the collection still lists. Keyed read helpers
//!   treat that as "temporarily unavailable" rather than an error.
//! * **Composites (`collection::Composite`)**: Unrelated types can present the
//!   full collection contract by delegating to an owned [`Collection`].

pub mod clock;
pub mod collection;
pub mod page;
pub mod sort;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use collection::{Collection, Composite};
pub use sort::{SortDirection, SortKind, SortSpec};
pub use storage::{CacheBackend, CachedStorage, InMemoryStorage, Storage, TtlCache};

/// Result type used throughout the shelf library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the shelf library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured storage errors from the storage module
    #[error(transparent)]
    Storage(storage::StorageError),

    /// Structured sort errors from the sort module
    #[error(transparent)]
    Sort(sort::SortError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Storage(_) => "storage",
            Error::Sort(_) => "sort",
        }
    }

    /// Check if this error indicates a key was not found or its value expired.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Storage(storage_err) => storage_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is an invalid-argument failure from the sort layer.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::Sort(_))
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Storage(storage_err) => storage_err.is_serialization_error(),
            _ => false,
        }
    }
}
