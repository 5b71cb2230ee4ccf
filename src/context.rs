//! Request context and query parameters for SCIM search operations.
//!
//! Provides request tracking for logging and auditing, plus the query
//! parameters of a SCIM list/search request (filter, projection,
//! pagination) with builder-style construction.

use serde::Deserialize;
use uuid::Uuid;

/// Request context for SCIM query operations.
///
/// Carries a request id for log correlation and an optional tenant id for
/// multi-tenant deployments. Tenant-less requests operate on the default
/// tenant.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
    /// Optional tenant scope for multi-tenant deployments
    pub tenant_id: Option<String>,
}

impl RequestContext {
    /// Create a context with a specific request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            tenant_id: None,
        }
    }

    /// Create a context with a generated request ID.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Scope this context to a tenant.
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// The tenant ID, or `None` for single-tenant requests.
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}

/// Query parameters for listing and searching resources.
///
/// Mirrors the query string of a SCIM GET/list request: an optional filter
/// expression, `attributes`/`excludedAttributes` projection lists, and
/// 1-based pagination per RFC 7644 §3.4.2.4. Deserializes from the SCIM
/// wire parameter names (`startIndex`, `excludedAttributes`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    /// Filter expression, unparsed
    pub filter: Option<String>,
    /// Attributes to include in results
    pub attributes: Vec<String>,
    /// Attributes to exclude from results
    pub excluded_attributes: Vec<String>,
    /// 1-based starting index for pagination
    pub start_index: Option<usize>,
    /// Maximum number of results to return
    pub count: Option<usize>,
}

impl SearchQuery {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Add attributes to include in results.
    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Add attributes to exclude from results.
    pub fn with_excluded_attributes(mut self, attributes: Vec<String>) -> Self {
        self.excluded_attributes.extend(attributes);
        self
    }

    /// Set the 1-based starting index.
    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = Some(start_index);
        self
    }

    /// Set the maximum result count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
