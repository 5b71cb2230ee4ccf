//! SCIM 2.0 query engine for identity-provisioning servers.
//!
//! Implements the query core of an RFC 7643/7644 SCIM server: the filter
//! language (tokenizer, parser, evaluator), attribute path resolution, the
//! storage push-down bridge, and attribute projection: everything between
//! an inbound list/search request and the rows it returns.
//!
//! # Core Components
//!
//! - [`filter::parse_filter`] - parse an RFC 7644 §3.4.2.2 filter string
//! - [`filter::evaluate_filter`] - evaluate a parsed filter against a resource
//! - [`filter::build_user_filter`] / [`filter::build_group_filter`] - decide
//!   between an indexed equality predicate and in-memory evaluation
//! - [`projection::apply_attribute_projection`] - `attributes` /
//!   `excludedAttributes` handling per RFC 7644 §3.4.2.5
//! - [`QueryEngine`] - the full pipeline over a pluggable
//!   [`StorageProvider`] backend
//!
//! # Quick Start
//!
//! ```rust
//! use scim_query::{QueryEngine, RequestContext, SearchQuery};
//! use scim_query::storage::InMemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = QueryEngine::new(InMemoryStorage::new());
//! let query = SearchQuery::new()
//!     .with_filter("userName sw \"john\" and active eq true")
//!     .with_attributes(vec!["userName".to_string()]);
//! let result = engine.search_users(&query, &RequestContext::default()).await?;
//! println!("{} matches", result.total_results);
//! # Ok(())
//! # }
//! ```
//!
//! The filter engine itself has no I/O and no shared state; parsing,
//! evaluation, and projection are pure functions safe to call from any
//! number of request-handling tasks.

pub mod context;
pub mod error;
pub mod filter;
pub mod projection;
pub mod search;
pub mod storage;

// Re-export commonly used types for convenience
pub use context::{RequestContext, SearchQuery};
pub use error::{FilterError, FilterResult, QueryError, QueryResult};
pub use filter::{
    ColumnMap, CompareOp, FilterExpr, FilterPlan, build_filter, build_group_filter,
    build_user_filter, evaluate_filter, parse_filter, resolve_attr_path,
};
pub use projection::{apply_attribute_projection, apply_attribute_projection_to_list};
pub use search::{QueryEngine, SearchResult};
pub use storage::{InMemoryStorage, StorageError, StorageKey, StoragePrefix, StorageProvider};
