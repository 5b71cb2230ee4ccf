//! Error types for storage operations.

/// Errors from storage backends.
///
/// The in-memory backend is infallible in practice; these variants exist so
/// the [`crate::storage::StorageProvider`] contract covers backends with
/// real failure modes (connection loss, serialization limits).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// The backend could not be reached or failed internally
    #[error("Storage backend failure: {message}")]
    Backend { message: String },

    /// Stored data could not be interpreted as a resource
    #[error("Invalid stored data for key '{key}': {details}")]
    InvalidData { key: String, details: String },
}

impl StorageError {
    /// Create a backend failure error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidData {
            key: key.into(),
            details: details.into(),
        }
    }
}
