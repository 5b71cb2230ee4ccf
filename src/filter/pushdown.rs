//! Storage push-down planning for parsed filters.
//!
//! A filter whose root is a single `eq` comparison on a mapped attribute
//! with a scalar value can be answered by an indexed equality predicate at
//! the storage layer. Everything else falls back to fetching all rows for
//! the tenant and resource type and evaluating the filter in memory.
//!
//! The bridge is purely structural: it never normalizes values. Whether the
//! backing column compares case-insensitively (a CITEXT column, or
//! lower-casing at the call site) is the repository's concern.

use crate::error::FilterResult;
use crate::filter::ast::{CompareOp, FilterExpr};
use crate::filter::eval::evaluate_filter;
use crate::filter::parser::parse_filter;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Mapping from lowercased SCIM attribute names to storage column
/// identifiers for one resource type.
///
/// Column maps are static configuration supplied by the repository layer;
/// the bridge holds no other persistence knowledge.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: HashMap<String, String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping; the attribute name is lowercased on insertion.
    pub fn with_column(mut self, attribute: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(attribute.into().to_lowercase(), column.into());
        self
    }

    /// Look up the column for an attribute path, case-insensitively.
    pub fn column_for(&self, attr_path: &str) -> Option<&str> {
        self.columns
            .get(&attr_path.to_lowercase())
            .map(String::as_str)
    }

    /// Indexable attributes of the User resource type.
    pub fn user_columns() -> Self {
        Self::new()
            .with_column("username", "userName")
            .with_column("externalid", "externalId")
            .with_column("id", "scimId")
    }

    /// Indexable attributes of the Group resource type.
    pub fn group_columns() -> Self {
        Self::new()
            .with_column("displayname", "displayName")
            .with_column("externalid", "externalId")
            .with_column("id", "scimId")
    }
}

/// The outcome of planning a filter against a column map.
///
/// Invariant: `fetch_all` is false iff `db_predicate` fully determines the
/// match set. When `fetch_all` is true the predicate is empty and
/// [`FilterPlan::matches`] applies the full filter; callers fetch every row
/// for the tenant and resource type and test each one.
#[derive(Debug, Clone)]
pub struct FilterPlan {
    /// Equality predicate for the storage layer, keyed by column identifier
    pub db_predicate: Map<String, Value>,
    /// Whether all rows must be fetched and filtered in memory
    pub fetch_all: bool,
    filter: Option<FilterExpr>,
}

impl FilterPlan {
    fn unfiltered() -> Self {
        Self {
            db_predicate: Map::new(),
            fetch_all: false,
            filter: None,
        }
    }

    /// The parsed filter retained for in-memory evaluation, if any.
    pub fn filter(&self) -> Option<&FilterExpr> {
        self.filter.as_ref()
    }

    /// Test a resource against the retained filter.
    ///
    /// Always true for plans without one (no filter was given, or the whole
    /// filter was pushed down to the predicate).
    pub fn matches(&self, resource: &Value) -> bool {
        match &self.filter {
            Some(expr) => evaluate_filter(expr, resource),
            None => true,
        }
    }

    /// Consume the plan and return its in-memory filter as a boxed closure,
    /// for callers that hand the predicate to another layer.
    pub fn into_matcher(self) -> Option<Box<dyn Fn(&Value) -> bool + Send + Sync>> {
        self.filter
            .map(|expr| -> Box<dyn Fn(&Value) -> bool + Send + Sync> {
                Box::new(move |resource| evaluate_filter(&expr, resource))
            })
    }
}

fn is_pushable_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Plan a filter string against a resource type's column map.
///
/// `None` means no filter was given: the caller lists all rows for the
/// tenant unfiltered. A present filter is parsed once; parse failures
/// propagate as [`crate::FilterError`] for the boundary layer to map to a
/// SCIM 400 `invalidFilter` response.
pub fn build_filter(filter: Option<&str>, columns: &ColumnMap) -> FilterResult<FilterPlan> {
    let Some(raw) = filter else {
        return Ok(FilterPlan::unfiltered());
    };
    let expr = parse_filter(raw)?;

    if let FilterExpr::Compare {
        attr_path,
        op: CompareOp::Eq,
        value: Some(value),
    } = &expr
    {
        if is_pushable_scalar(value) {
            if let Some(column) = columns.column_for(attr_path) {
                debug!("filter '{}' pushed down to column '{}'", raw, column);
                let mut predicate = Map::new();
                predicate.insert(column.to_string(), value.clone());
                return Ok(FilterPlan {
                    db_predicate: predicate,
                    fetch_all: false,
                    filter: None,
                });
            }
        }
    }

    debug!("filter '{}' not push-down eligible, using in-memory evaluation", raw);
    Ok(FilterPlan {
        db_predicate: Map::new(),
        fetch_all: true,
        filter: Some(expr),
    })
}

/// Plan a filter for the User resource type.
pub fn build_user_filter(filter: Option<&str>) -> FilterResult<FilterPlan> {
    build_filter(filter, &ColumnMap::user_columns())
}

/// Plan a filter for the Group resource type.
pub fn build_group_filter(filter: Option<&str>) -> FilterResult<FilterPlan> {
    build_filter(filter, &ColumnMap::group_columns())
}
