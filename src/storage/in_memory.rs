//! In-memory storage backend.
//!
//! Thread-safe implementation of [`StorageProvider`] over nested HashMaps
//! behind a tokio `RwLock`, intended for testing, development, and
//! deployments that do not need persistence. Tenant isolation falls out of
//! the hierarchical key structure.
//!
//! Predicate matching on string values is case-insensitive, mirroring the
//! case-insensitive (CITEXT-backed) columns the push-down bridge targets in
//! a relational deployment.

use crate::storage::{StorageError, StorageKey, StoragePrefix, StorageProvider};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory storage.
///
/// Structure: `tenant_id` → `resource_type` → `resource_id` → data.
/// Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, HashMap<String, HashMap<String, Value>>>>>,
}

impl InMemoryStorage {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all data, for test setup.
    pub async fn clear(&self) {
        self.data.write().await.clear();
    }

    fn row_matches(row: &Value, predicate: &Map<String, Value>) -> bool {
        predicate.iter().all(|(column, wanted)| {
            match row.get(column) {
                Some(actual) => match (actual, wanted) {
                    // CITEXT-style comparison for strings
                    (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
                    (a, b) => a == b,
                },
                None => false,
            }
        })
    }
}

impl StorageProvider for InMemoryStorage {
    type Error = StorageError;

    async fn put(&self, key: StorageKey, data: Value) -> Result<Value, Self::Error> {
        let mut guard = self.data.write().await;
        guard
            .entry(key.tenant_id().to_string())
            .or_default()
            .entry(key.resource_type().to_string())
            .or_default()
            .insert(key.resource_id().to_string(), data.clone());
        Ok(data)
    }

    async fn get(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        let guard = self.data.read().await;
        Ok(guard
            .get(key.tenant_id())
            .and_then(|tenant| tenant.get(key.resource_type()))
            .and_then(|resources| resources.get(key.resource_id()))
            .cloned())
    }

    async fn delete(&self, key: StorageKey) -> Result<bool, Self::Error> {
        let mut guard = self.data.write().await;
        let existed = guard
            .get_mut(key.tenant_id())
            .and_then(|tenant| tenant.get_mut(key.resource_type()))
            .is_some_and(|resources| resources.remove(key.resource_id()).is_some());
        Ok(existed)
    }

    async fn list_all(&self, prefix: StoragePrefix) -> Result<Vec<Value>, Self::Error> {
        let guard = self.data.read().await;
        let Some(resources) = guard
            .get(prefix.tenant_id())
            .and_then(|tenant| tenant.get(prefix.resource_type()))
        else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<(&String, &Value)> = resources.iter().collect();
        // consistent ordering by resource id
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Ok(entries.into_iter().map(|(_, value)| value.clone()).collect())
    }

    async fn find_by_predicate(
        &self,
        prefix: StoragePrefix,
        predicate: &Map<String, Value>,
    ) -> Result<Vec<Value>, Self::Error> {
        let rows = self.list_all(prefix).await?;
        Ok(rows
            .into_iter()
            .filter(|row| Self::row_matches(row, predicate))
            .collect())
    }

    async fn count(&self, prefix: StoragePrefix) -> Result<usize, Self::Error> {
        let guard = self.data.read().await;
        Ok(guard
            .get(prefix.tenant_id())
            .and_then(|tenant| tenant.get(prefix.resource_type()))
            .map_or(0, HashMap::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(id: &str) -> StorageKey {
        StorageKey::new("tenant1", "User", id)
    }

    fn prefix() -> StoragePrefix {
        StoragePrefix::new("tenant1", "User")
    }

    #[tokio::test]
    async fn test_put_get_delete_roundtrip() {
        let storage = InMemoryStorage::new();
        let data = json!({"id": "1", "userName": "john"});

        let stored = storage.put(key("1"), data.clone()).await.unwrap();
        assert_eq!(stored, data);
        assert_eq!(storage.get(key("1")).await.unwrap(), Some(data));

        assert!(storage.delete(key("1")).await.unwrap());
        assert!(!storage.delete(key("1")).await.unwrap());
        assert_eq!(storage.get(key("1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_and_tenant_scoped() {
        let storage = InMemoryStorage::new();
        storage.put(key("b"), json!({"id": "b"})).await.unwrap();
        storage.put(key("a"), json!({"id": "a"})).await.unwrap();
        storage
            .put(
                StorageKey::new("other", "User", "c"),
                json!({"id": "c"}),
            )
            .await
            .unwrap();

        let rows = storage.list_all(prefix()).await.unwrap();
        assert_eq!(rows, vec![json!({"id": "a"}), json!({"id": "b"})]);
        assert_eq!(storage.count(prefix()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_by_predicate_exact_and_citext() {
        let storage = InMemoryStorage::new();
        storage
            .put(key("1"), json!({"id": "1", "userName": "John.Doe@example.com", "active": true}))
            .await
            .unwrap();
        storage
            .put(key("2"), json!({"id": "2", "userName": "jane", "active": false}))
            .await
            .unwrap();

        let mut predicate = Map::new();
        predicate.insert("userName".to_string(), json!("john.doe@EXAMPLE.com"));
        let rows = storage.find_by_predicate(prefix(), &predicate).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&json!("1")));

        let mut predicate = Map::new();
        predicate.insert("active".to_string(), json!(false));
        let rows = storage.find_by_predicate(prefix(), &predicate).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&json!("2")));
    }

    #[tokio::test]
    async fn test_find_by_predicate_requires_all_entries() {
        let storage = InMemoryStorage::new();
        storage
            .put(key("1"), json!({"id": "1", "userName": "john", "active": true}))
            .await
            .unwrap();

        let mut predicate = Map::new();
        predicate.insert("userName".to_string(), json!("john"));
        predicate.insert("active".to_string(), json!(false));
        let rows = storage.find_by_predicate(prefix(), &predicate).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let storage = InMemoryStorage::new();
        storage.put(key("1"), json!({"id": "1"})).await.unwrap();
        storage.clear().await;
        assert_eq!(storage.count(prefix()).await.unwrap(), 0);
    }
}
