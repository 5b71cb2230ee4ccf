//! SCIM filter language engine (RFC 7644 §3.4.2.2).
//!
//! This module implements the full pipeline for SCIM filter expressions:
//!
//! * [`tokenizer`] - lexes a filter string into a flat token stream
//! * [`parser`] - recursive descent over the tokens, producing a
//!   [`FilterExpr`] tree with `and` binding tighter than `or`
//! * [`path`] - case-insensitive dotted and URN-qualified attribute path
//!   resolution, shared with the attribute projector
//! * [`eval`] - evaluates a parsed filter against an in-memory resource
//! * [`pushdown`] - decides whether a filter reduces to a single equality
//!   predicate the storage layer can answer, or requires a full scan with
//!   in-memory evaluation
//!
//! All operations are pure, synchronous computations with no shared state;
//! they are safe to call concurrently from any number of request handlers.
//!
//! # Example
//!
//! ```rust
//! use scim_query::filter::{evaluate_filter, parse_filter};
//! use serde_json::json;
//!
//! let expr = parse_filter("emails[type eq \"work\"] and active eq true").unwrap();
//! let user = json!({
//!     "active": true,
//!     "emails": [{"value": "j@example.com", "type": "work"}]
//! });
//! assert!(evaluate_filter(&expr, &user));
//! ```

pub mod ast;
pub mod eval;
pub mod parser;
pub mod path;
pub mod pushdown;
pub mod tokenizer;

pub use ast::{CompareOp, FilterExpr};
pub use eval::evaluate_filter;
pub use parser::parse_filter;
pub use path::resolve_attr_path;
pub use pushdown::{
    ColumnMap, FilterPlan, build_filter, build_group_filter, build_user_filter,
};
pub use tokenizer::{Token, TokenKind, tokenize};
