//! Storage abstraction for SCIM resources.
//!
//! The [`StorageProvider`] trait is the repository collaborator of the query
//! engine: pure data operations over JSON resources, scoped by tenant and
//! resource type, with no SCIM protocol knowledge.
//!
//! Two retrieval paths serve the filter push-down bridge:
//!
//! * [`StorageProvider::find_by_predicate`] answers the simple equality
//!   predicate an eligible filter compiles to;
//! * [`StorageProvider::list_all`] feeds the fetch-all fallback, where the
//!   caller evaluates the full filter in memory against every row.
//!
//! # Example
//!
//! ```rust
//! use scim_query::storage::{InMemoryStorage, StorageKey, StorageProvider};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//! let key = StorageKey::new("tenant1", "User", "123");
//! storage.put(key.clone(), json!({"id": "123", "userName": "john"})).await?;
//! assert!(storage.get(key).await?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::InMemoryStorage;

use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;

/// A hierarchical key identifying one resource in storage.
///
/// Resources are organized as `tenant_id` → `resource_type` →
/// `resource_id`, which gives natural tenant isolation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    tenant_id: String,
    resource_type: String,
    resource_id: String,
}

impl StorageKey {
    /// Create a new storage key.
    pub fn new(
        tenant_id: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.tenant_id, self.resource_type, self.resource_id
        )
    }
}

/// A tenant + resource-type scope for queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePrefix {
    tenant_id: String,
    resource_type: String,
}

impl StoragePrefix {
    /// Create a new query scope.
    pub fn new(tenant_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            resource_type: resource_type.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

impl fmt::Display for StoragePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.resource_type)
    }
}

/// Core trait for storage backends.
///
/// Implementations handle persistence only: no filter semantics, no SCIM
/// validation. `put` covers both create and update; the distinction is
/// business logic that lives above this layer.
pub trait StorageProvider: Send + Sync {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store data at the given key, replacing any existing resource, and
    /// return the stored data.
    fn put(
        &self,
        key: StorageKey,
        data: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;

    /// Retrieve a resource, or `None` if it does not exist.
    fn get(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Delete a resource. Returns whether it existed, for HTTP 204 vs 404
    /// handling at the boundary.
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Return every resource in the scope, consistently ordered by resource
    /// ID. This is the fetch-all path: the caller applies the in-memory
    /// filter to each row.
    fn list_all(
        &self,
        prefix: StoragePrefix,
    ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send;

    /// Return every resource in the scope matching all entries of a simple
    /// equality predicate, as produced by filter push-down.
    ///
    /// Predicate keys are column identifiers matched against top-level
    /// fields of the stored row. String values compare case-insensitively,
    /// modeling a case-insensitive (CITEXT-backed) column; other scalar
    /// types compare exactly.
    fn find_by_predicate(
        &self,
        prefix: StoragePrefix,
        predicate: &Map<String, Value>,
    ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send;

    /// Count the resources in the scope.
    fn count(
        &self,
        prefix: StoragePrefix,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}
