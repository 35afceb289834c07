//! Error types for storage strategies.

use thiserror::Error;

/// Errors raised by [`Storage`](super::Storage) implementations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key was never stored, or its cached value has expired
    #[error("Key not found in storage: {key}")]
    KeyNotFound { key: String },

    /// Serialization failed while writing an item
    #[error("Serialization failed for key '{key}': {reason}")]
    SerializationFailed { key: String, reason: String },

    /// Deserialization failed while reading an item back
    #[error("Deserialization failed for key '{key}': {reason}")]
    DeserializationFailed { key: String, reason: String },
}

impl StorageError {
    /// Check if this error indicates a missing or expired value.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::KeyNotFound { .. })
    }

    /// Check if this error is related to serialization.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            StorageError::SerializationFailed { .. } | StorageError::DeserializationFailed { .. }
        )
    }

    /// Get the key associated with this error.
    pub fn key(&self) -> &str {
        match self {
            StorageError::KeyNotFound { key }
            | StorageError::SerializationFailed { key, .. }
            | StorageError::DeserializationFailed { key, .. } => key,
        }
    }
}

impl From<StorageError> for crate::Error {
    fn from(err: StorageError) -> Self {
        crate::Error::Storage(err)
    }
}
