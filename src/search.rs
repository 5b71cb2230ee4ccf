//! The query pipeline: filter planning, retrieval, pagination, projection.
//!
//! [`QueryEngine`] is the orchestration layer a SCIM list/search endpoint
//! delegates to. Per request it:
//!
//! 1. builds a [`FilterPlan`](crate::filter::FilterPlan) from the query's
//!    filter string (parsed exactly once),
//! 2. either issues the plan's equality predicate against storage or fetches
//!    every row for the tenant and evaluates the filter in memory,
//! 3. applies 1-based pagination,
//! 4. projects each surviving resource through the attribute projector.
//!
//! A filter that cannot be pushed down implies a full scan of the tenant's
//! resources of that type; bounding that scan (e.g. via pagination limits
//! enforced at the boundary) is the caller's responsibility.

use crate::context::{RequestContext, SearchQuery};
use crate::error::{QueryError, QueryResult};
use crate::filter::pushdown::{ColumnMap, build_filter};
use crate::projection::apply_attribute_projection_to_list;
use crate::storage::{StorageProvider, StoragePrefix};
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

/// Tenant used when the request context carries no tenant id.
const DEFAULT_TENANT: &str = "default";

/// Result of a search: the projected page plus the total match count
/// (before pagination). Serializes with the field names of a SCIM
/// ListResponse (RFC 7644 §3.4.2).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "Resources")]
    pub resources: Vec<Value>,
    pub total_results: usize,
}

/// Query engine over a storage backend.
pub struct QueryEngine<S: StorageProvider> {
    storage: S,
}

impl<S: StorageProvider> QueryEngine<S> {
    /// Create an engine over the given storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Search User resources.
    pub async fn search_users(
        &self,
        query: &SearchQuery,
        context: &RequestContext,
    ) -> QueryResult<SearchResult> {
        self.search("User", &ColumnMap::user_columns(), query, context)
            .await
    }

    /// Search Group resources.
    pub async fn search_groups(
        &self,
        query: &SearchQuery,
        context: &RequestContext,
    ) -> QueryResult<SearchResult> {
        self.search("Group", &ColumnMap::group_columns(), query, context)
            .await
    }

    async fn search(
        &self,
        resource_type: &str,
        columns: &ColumnMap,
        query: &SearchQuery,
        context: &RequestContext,
    ) -> QueryResult<SearchResult> {
        let tenant = context.tenant_id().unwrap_or(DEFAULT_TENANT);
        let prefix = StoragePrefix::new(tenant, resource_type);

        let plan = build_filter(query.filter.as_deref(), columns)?;

        let matched = if plan.fetch_all {
            debug!(
                "request {}: full scan of {} with in-memory filter",
                context.request_id, prefix
            );
            let rows = self
                .storage
                .list_all(prefix)
                .await
                .map_err(QueryError::storage)?;
            rows.into_iter().filter(|row| plan.matches(row)).collect()
        } else if plan.db_predicate.is_empty() {
            self.storage
                .list_all(prefix)
                .await
                .map_err(QueryError::storage)?
        } else {
            debug!(
                "request {}: predicate query on {} ({} column(s))",
                context.request_id,
                prefix,
                plan.db_predicate.len()
            );
            self.storage
                .find_by_predicate(prefix, &plan.db_predicate)
                .await
                .map_err(QueryError::storage)?
        };

        let total_results = matched.len();

        // SCIM pagination is 1-based; an out-of-range start yields an
        // empty page, not an error.
        let skip = query.start_index.unwrap_or(1).max(1) - 1;
        let page: Vec<Value> = matched
            .into_iter()
            .skip(skip)
            .take(query.count.unwrap_or(usize::MAX))
            .collect();

        let attributes =
            (!query.attributes.is_empty()).then_some(query.attributes.as_slice());
        let excluded =
            (!query.excluded_attributes.is_empty()).then_some(query.excluded_attributes.as_slice());
        let resources = apply_attribute_projection_to_list(&page, attributes, excluded);

        info!(
            "request {}: {} search returned {} of {} matches",
            context.request_id,
            resource_type,
            resources.len(),
            total_results
        );
        Ok(SearchResult {
            resources,
            total_results,
        })
    }
}
