//! End-to-end tests for the SCIM query pipeline.
//!
//! Exercises filter parsing, push-down planning, in-memory evaluation, and
//! attribute projection together against an InMemoryStorage backend, the way
//! a list/search endpoint drives them.

use scim_query::storage::{InMemoryStorage, StorageKey, StorageProvider};
use scim_query::{
    QueryEngine, RequestContext, SearchQuery, apply_attribute_projection, build_user_filter,
    evaluate_filter, parse_filter,
};
use serde_json::json;

fn sample_user(id: &str, username: &str, active: bool) -> serde_json::Value {
    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
        "id": id,
        "meta": {"resourceType": "User", "created": "2024-01-15T09:00:00Z"},
        "userName": username,
        "displayName": format!("User {}", username),
        "active": active,
        "emails": [
            {"value": format!("{}@example.com", id), "type": "work", "primary": true}
        ],
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User": {
            "department": "Engineering"
        }
    })
}

async fn seeded_engine() -> QueryEngine<InMemoryStorage> {
    let _ = env_logger::builder().is_test(true).try_init();
    let storage = InMemoryStorage::new();
    for (id, username, active) in [
        ("1", "John.Doe@example.com", true),
        ("2", "jane.roe@example.com", true),
        ("3", "bob@other.org", false),
    ] {
        storage
            .put(
                StorageKey::new("default", "User", id),
                sample_user(id, username, active),
            )
            .await
            .unwrap();
    }
    QueryEngine::new(storage)
}

#[tokio::test]
async fn pushdown_hit_returns_exact_row() {
    let engine = seeded_engine().await;
    let query = SearchQuery::new().with_filter("userName eq \"John.Doe@example.com\"");
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    assert_eq!(result.total_results, 1);
    assert_eq!(result.resources[0]["id"], json!("1"));
}

#[tokio::test]
async fn pushdown_agrees_with_full_evaluation() {
    // A row returned by the pushed predicate must also satisfy the full
    // filter when evaluated in memory.
    let engine = seeded_engine().await;
    let filter = "userName eq \"jane.roe@example.com\"";

    let plan = build_user_filter(Some(filter)).unwrap();
    assert!(!plan.fetch_all);

    let query = SearchQuery::new().with_filter(filter);
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    let expr = parse_filter(filter).unwrap();
    for resource in &result.resources {
        assert!(evaluate_filter(&expr, resource));
    }
}

#[tokio::test]
async fn complex_filter_falls_back_to_scan() {
    let engine = seeded_engine().await;
    let query = SearchQuery::new()
        .with_filter("emails[type eq \"work\" and primary eq true] and active eq true");
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    assert_eq!(result.total_results, 2);
    for resource in &result.resources {
        assert_eq!(resource["active"], json!(true));
    }
}

#[tokio::test]
async fn extension_attribute_filter() {
    let engine = seeded_engine().await;
    let query = SearchQuery::new().with_filter(
        "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department eq \"engineering\"",
    );
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    assert_eq!(result.total_results, 3);
}

#[tokio::test]
async fn precedence_in_live_filter() {
    // a or b and c groups as a or (b and c)
    let engine = seeded_engine().await;
    let query = SearchQuery::new()
        .with_filter("userName sw \"bob\" or userName co \"example\" and active eq true");
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    assert_eq!(result.total_results, 3);
}

#[tokio::test]
async fn filtered_page_is_projected() {
    let engine = seeded_engine().await;
    let query = SearchQuery::new()
        .with_filter("active eq true")
        .with_attributes(vec!["userName".to_string(), "name.givenName".to_string()])
        .with_count(1);
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    assert_eq!(result.total_results, 2);
    assert_eq!(result.resources.len(), 1);

    let resource = result.resources[0].as_object().unwrap();
    assert!(resource.contains_key("userName"));
    assert!(resource.contains_key("schemas"));
    assert!(resource.contains_key("id"));
    assert!(resource.contains_key("meta"));
    assert!(!resource.contains_key("displayName"));
    assert!(!resource.contains_key("emails"));
}

#[tokio::test]
async fn excluded_attributes_on_list() {
    let engine = seeded_engine().await;
    let query = SearchQuery::new()
        .with_excluded_attributes(vec!["emails".to_string(), "meta.created".to_string()]);
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();
    for resource in &result.resources {
        assert!(resource.get("emails").is_none());
        assert!(resource.get("userName").is_some());
        assert!(resource["meta"].get("created").is_none());
        assert!(resource["meta"].get("resourceType").is_some());
    }
}

#[tokio::test]
async fn projection_standalone_matches_pipeline() {
    let engine = seeded_engine().await;
    let attrs = vec!["userName".to_string()];
    let query = SearchQuery::new().with_attributes(attrs.clone());
    let result = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap();

    let raw = engine
        .storage()
        .get(StorageKey::new("default", "User", "1"))
        .await
        .unwrap()
        .unwrap();
    let direct = apply_attribute_projection(&raw, Some(&attrs), None);
    assert!(result.resources.contains(&direct));
}

#[tokio::test]
async fn malformed_filter_rejected_before_storage_access() {
    let engine = QueryEngine::new(InMemoryStorage::new());
    let query = SearchQuery::new().with_filter("userName eq \"unterminated");
    let error = engine
        .search_users(&query, &RequestContext::default())
        .await
        .unwrap_err();
    assert!(error.to_string().contains("Unterminated"));
}
