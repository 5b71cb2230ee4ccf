//! Filter evaluation against in-memory resources.
//!
//! The evaluator walks a parsed [`FilterExpr`] against a `serde_json::Value`
//! resource and produces a boolean. It is pure and total: a missing
//! attribute or a type-mismatched comparison is a non-match, never an error.
//!
//! SCIM comparison semantics implemented here:
//!
//! * String comparisons (`eq`, `ne`, `co`, `sw`, `ew`) are case-insensitive.
//! * A comparison against a multi-valued attribute matches when any element
//!   individually matches.
//! * `pr` treats `null`, the empty string, and the empty array as absent;
//!   `0` and `false` count as present.
//! * `gt`/`ge`/`lt`/`le` order case-folded strings (lexicographic order is
//!   sound for ISO-8601 timestamps) or numbers; any other type pairing is
//!   false.

use crate::filter::ast::{CompareOp, FilterExpr};
use crate::filter::path::resolve_attr_path;
use serde_json::Value;
use std::cmp::Ordering;

/// Evaluate a filter expression against a resource.
///
/// # Examples
///
/// ```rust
/// use scim_query::filter::{evaluate_filter, parse_filter};
/// use serde_json::json;
///
/// let expr = parse_filter("displayName co \"OHN\"").unwrap();
/// assert!(evaluate_filter(&expr, &json!({"displayName": "John Doe"})));
/// ```
pub fn evaluate_filter(expr: &FilterExpr, resource: &Value) -> bool {
    match expr {
        FilterExpr::And(left, right) => {
            evaluate_filter(left, resource) && evaluate_filter(right, resource)
        }
        FilterExpr::Or(left, right) => {
            evaluate_filter(left, resource) || evaluate_filter(right, resource)
        }
        FilterExpr::Not(inner) => !evaluate_filter(inner, resource),
        FilterExpr::Compare {
            attr_path,
            op,
            value,
        } => compare(resolve_attr_path(resource, attr_path), *op, value.as_ref()),
        FilterExpr::ValuePath { attr_path, filter } => {
            // Sub-filters apply to object elements only; primitives in a
            // multi-valued attribute are skipped.
            match resolve_attr_path(resource, attr_path) {
                Some(Value::Array(elements)) => elements
                    .iter()
                    .filter(|element| element.is_object())
                    .any(|element| evaluate_filter(filter, element)),
                _ => false,
            }
        }
    }
}

fn compare(resolved: Option<&Value>, op: CompareOp, expected: Option<&Value>) -> bool {
    if op == CompareOp::Pr {
        return is_present(resolved);
    }
    // Multi-valued attributes match when any element matches.
    match resolved {
        Some(Value::Array(elements)) => elements
            .iter()
            .any(|element| compare_single(Some(element), op, expected)),
        other => compare_single(other, op, expected),
    }
}

fn compare_single(resolved: Option<&Value>, op: CompareOp, expected: Option<&Value>) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    match op {
        CompareOp::Eq => match resolved {
            None | Some(Value::Null) => expected.is_null(),
            Some(actual) => values_equal(actual, expected),
        },
        CompareOp::Ne => match resolved {
            None | Some(Value::Null) => !expected.is_null(),
            Some(actual) => !values_equal(actual, expected),
        },
        CompareOp::Co => string_pair(resolved, expected)
            .is_some_and(|(actual, wanted)| actual.contains(&wanted)),
        CompareOp::Sw => string_pair(resolved, expected)
            .is_some_and(|(actual, wanted)| actual.starts_with(&wanted)),
        CompareOp::Ew => string_pair(resolved, expected)
            .is_some_and(|(actual, wanted)| actual.ends_with(&wanted)),
        CompareOp::Gt => matches!(order(resolved, expected), Some(Ordering::Greater)),
        CompareOp::Ge => matches!(
            order(resolved, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Lt => matches!(order(resolved, expected), Some(Ordering::Less)),
        CompareOp::Le => matches!(
            order(resolved, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Pr => is_present(resolved),
    }
}

/// Presence per RFC 7644: null, empty string, and empty array are absent.
fn is_present(resolved: Option<&Value>) -> bool {
    match resolved {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(elements)) => !elements.is_empty(),
        Some(_) => true,
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => actual == expected,
    }
}

/// Case-folded string pair, or `None` when either side is not a string.
fn string_pair(resolved: Option<&Value>, expected: &Value) -> Option<(String, String)> {
    match (resolved, expected) {
        (Some(Value::String(a)), Value::String(b)) => {
            Some((a.to_lowercase(), b.to_lowercase()))
        }
        _ => None,
    }
}

/// Ordering for `gt`/`ge`/`lt`/`le`: case-folded strings or numbers only.
fn order(resolved: Option<&Value>, expected: &Value) -> Option<Ordering> {
    match (resolved?, expected) {
        (Value::String(a), Value::String(b)) => Some(a.to_lowercase().cmp(&b.to_lowercase())),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}
