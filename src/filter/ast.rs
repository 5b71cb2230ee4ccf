//! Abstract syntax tree for SCIM filter expressions.
//!
//! The AST is a tagged union built once per parse and owned by the caller.
//! Nothing in this crate caches parsed filters; callers that want caching
//! can key on the original filter string.

use serde_json::Value;
use std::fmt;

/// Comparison operators defined by RFC 7644 §3.4.2.2.
///
/// `Pr` (presence) is the only operator that takes no comparison value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Co,
    Sw,
    Ew,
    Gt,
    Ge,
    Lt,
    Le,
    Pr,
}

impl CompareOp {
    /// Look up an operator by its RFC keyword, case-insensitively.
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "co" => Some(Self::Co),
            "sw" => Some(Self::Sw),
            "ew" => Some(Self::Ew),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "pr" => Some(Self::Pr),
            _ => None,
        }
    }

    /// The lowercase RFC keyword for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Co => "co",
            Self::Sw => "sw",
            Self::Ew => "ew",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Pr => "pr",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed SCIM filter expression.
///
/// `Compare` covers both ordinary comparisons (`userName eq "john"`) and
/// presence tests (`title pr`, with `value` of `None`). `ValuePath` is the
/// `attr[subfilter]` form, whose sub-filter is evaluated against each
/// element of a multi-valued attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `attrPath op value`, or `attrPath pr` when `value` is `None`
    Compare {
        attr_path: String,
        op: CompareOp,
        value: Option<Value>,
    },
    /// `left and right`, binding tighter than `or`
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// `left or right`
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// `not (filter)`
    Not(Box<FilterExpr>),
    /// `attrPath[subfilter]` over a multi-valued attribute
    ValuePath {
        attr_path: String,
        filter: Box<FilterExpr>,
    },
}
