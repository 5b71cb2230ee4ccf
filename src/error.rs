//! Error types for SCIM query operations.
//!
//! Two layers of errors exist: [`FilterError`] covers everything that can go
//! wrong while lexing or parsing an RFC 7644 filter expression, and
//! [`QueryError`] covers the full query pipeline (filter plus storage plus
//! serialization). Evaluation and projection are total functions and have no
//! error type of their own: a missing attribute is a non-match, not a failure.

/// Syntax errors produced by the filter tokenizer and parser.
///
/// Every variant corresponds to an HTTP 400 response with
/// `scimType: invalidFilter` at the protocol boundary. Positions are byte
/// offsets into the original filter string and appear only in messages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// Filter string was empty or contained only whitespace
    #[error("Empty filter expression")]
    EmptyFilter,

    /// A double-quoted string literal was never closed
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    /// A character outside the filter grammar's alphabet was encountered
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// A token appeared where the grammar does not allow it
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    /// The input ended while the parser still expected more
    #[error("Unexpected end of filter, expected {expected}")]
    UnexpectedEnd { expected: String },

    /// A complete expression was parsed but input remained
    #[error("Trailing input after filter expression: '{token}' at position {position}")]
    TrailingInput { token: String, position: usize },

    /// A comparison operator was not followed by a literal value
    #[error("Missing comparison value after '{operator}' at position {position}")]
    MissingValue { operator: String, position: usize },
}

impl FilterError {
    /// The SCIM `scimType` detail keyword for this error class.
    ///
    /// All filter syntax errors map to `invalidFilter` per RFC 7644 §3.12.
    pub fn scim_type(&self) -> &'static str {
        "invalidFilter"
    }
}

/// Errors from the full query pipeline (filter, storage, serialization).
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Malformed filter expression in the request
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors from the storage backend
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid request parameters outside the filter itself
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl QueryError {
    /// Wrap a storage backend error.
    pub fn storage<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(error))
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type FilterResult<T> = Result<T, FilterError>;
pub type QueryResult<T> = Result<T, QueryError>;
