//! Recursive-descent parser for SCIM filter expressions.
//!
//! Implements the RFC 7644 §3.4.2.2 grammar with `and` binding tighter than
//! `or`, both left-associative:
//!
//! ```text
//! filter    := orExpr
//! orExpr    := andExpr ("or" andExpr)*
//! andExpr   := primary ("and" primary)*
//! primary   := "not" "(" filter ")" | "(" filter ")" | attrExpr
//! attrExpr  := ATTR "[" filter "]" | ATTR "pr" | ATTR OP compValue
//! compValue := STRING | NUMBER | BOOLEAN | NULL
//! ```

use crate::error::{FilterError, FilterResult};
use crate::filter::ast::{CompareOp, FilterExpr};
use crate::filter::tokenizer::{Token, TokenKind, tokenize};
use serde_json::Value;

/// Parse a SCIM filter string into an expression tree.
///
/// Rejects empty or whitespace-only input, malformed syntax, and trailing
/// tokens after a complete expression.
///
/// # Examples
///
/// ```rust
/// use scim_query::filter::{CompareOp, FilterExpr, parse_filter};
///
/// let expr = parse_filter("userName eq \"john\"").unwrap();
/// assert_eq!(
///     expr,
///     FilterExpr::Compare {
///         attr_path: "userName".to_string(),
///         op: CompareOp::Eq,
///         value: Some("john".into()),
///     }
/// );
/// ```
pub fn parse_filter(input: &str) -> FilterResult<FilterExpr> {
    if input.trim().is_empty() {
        return Err(FilterError::EmptyFilter);
    }
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    let trailing = parser.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(FilterError::TrailingInput {
            token: trailing.value.clone(),
            position: trailing.position,
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    // The token stream always ends with Eof and pos never advances past it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> FilterResult<Token> {
        let token = self.peek().clone();
        if token.kind == kind {
            self.pos += 1;
            Ok(token)
        } else if token.kind == TokenKind::Eof {
            Err(FilterError::UnexpectedEnd {
                expected: expected.to_string(),
            })
        } else {
            Err(FilterError::UnexpectedToken {
                token: token.value,
                position: token.position,
            })
        }
    }

    fn parse_or(&mut self) -> FilterResult<FilterExpr> {
        let mut left = self.parse_and()?;
        while self.peek().kind == TokenKind::Or {
            self.pos += 1;
            let right = self.parse_and()?;
            left = FilterExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> FilterResult<FilterExpr> {
        let mut left = self.parse_primary()?;
        while self.peek().kind == TokenKind::And {
            self.pos += 1;
            let right = self.parse_primary()?;
            left = FilterExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> FilterResult<FilterExpr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Not => {
                self.pos += 1;
                self.expect(TokenKind::LParen, "'(' after 'not'")?;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(FilterExpr::Not(Box::new(inner)))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Attr => {
                self.pos += 1;
                self.parse_attr_expr(token)
            }
            TokenKind::Eof => Err(FilterError::UnexpectedEnd {
                expected: "an attribute expression".to_string(),
            }),
            _ => Err(FilterError::UnexpectedToken {
                token: token.value,
                position: token.position,
            }),
        }
    }

    fn parse_attr_expr(&mut self, attr: Token) -> FilterResult<FilterExpr> {
        let next = self.peek().clone();
        match next.kind {
            TokenKind::LBracket => {
                self.pos += 1;
                let sub = self.parse_or()?;
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(FilterExpr::ValuePath {
                    attr_path: attr.value,
                    filter: Box::new(sub),
                })
            }
            TokenKind::Presence => {
                self.pos += 1;
                Ok(FilterExpr::Compare {
                    attr_path: attr.value,
                    op: CompareOp::Pr,
                    value: None,
                })
            }
            TokenKind::CompareOp(op) => {
                self.pos += 1;
                let value = self.parse_comp_value(&next)?;
                Ok(FilterExpr::Compare {
                    attr_path: attr.value,
                    op,
                    value: Some(value),
                })
            }
            TokenKind::Eof => Err(FilterError::UnexpectedEnd {
                expected: format!("an operator after '{}'", attr.value),
            }),
            _ => Err(FilterError::UnexpectedToken {
                token: next.value,
                position: next.position,
            }),
        }
    }

    fn parse_comp_value(&mut self, op_token: &Token) -> FilterResult<Value> {
        let token = self.peek().clone();
        let value = match token.kind {
            TokenKind::Str => Value::String(token.value.clone()),
            TokenKind::Number => {
                let number: serde_json::Number =
                    token.value.parse().map_err(|_| FilterError::UnexpectedToken {
                        token: token.value.clone(),
                        position: token.position,
                    })?;
                Value::Number(number)
            }
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Null => Value::Null,
            _ => {
                return Err(FilterError::MissingValue {
                    operator: op_token.value.clone(),
                    position: op_token.position,
                });
            }
        };
        self.pos += 1;
        Ok(value)
    }
}
