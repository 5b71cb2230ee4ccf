//! Tokenizer for SCIM filter expressions.
//!
//! Converts an RFC 7644 §3.4.2.2 filter string into a flat token stream for
//! the recursive-descent parser. The stream always terminates with an
//! [`TokenKind::Eof`] token. Token positions are byte offsets into the input
//! and are used only for error messages.
//!
//! Lexical rules worth calling out:
//!
//! * Keywords (`and`, `or`, `not`, `pr`, `true`, `false`, `null`) and the
//!   nine comparison operators are matched case-insensitively.
//! * Quoted strings are double-quote delimited; a backslash escapes exactly
//!   the following character, with no other escape semantics.
//! * A run starting with a digit or `-` is only a number when it ends at
//!   whitespace, a paren, a bracket, or end of input. URN-qualified
//!   attribute paths such as `urn:ietf:params:scim:schemas:extension:
//!   enterprise:2.0:User:department` begin with a letter and consume `:`,
//!   `-`, `.`, and digits as identifier characters, so they are never
//!   mis-lexed as numbers.

use crate::error::{FilterError, FilterResult};
use crate::filter::ast::CompareOp;

/// Kinds of token the filter grammar distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    LBracket,
    RBracket,
    And,
    Or,
    Not,
    /// The `pr` presence keyword
    Presence,
    /// One of the nine comparison operator keywords
    CompareOp(CompareOp),
    /// Attribute path, including dotted and URN-qualified forms
    Attr,
    /// Quoted string literal, already unescaped
    Str,
    /// Numeric literal, verbatim text
    Number,
    True,
    False,
    Null,
    Eof,
}

/// One lexed token with its byte offset in the original input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
}

fn is_literal_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']')
}

/// Tokenize a filter string.
///
/// Fails on unterminated string literals and on characters outside the
/// grammar's alphabet; all other validation is the parser's job.
pub fn tokenize(input: &str) -> FilterResult<Vec<Token>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, "(", pos));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, ")", pos));
                i += 1;
            }
            '[' => {
                tokens.push(Token::new(TokenKind::LBracket, "[", pos));
                i += 1;
            }
            ']' => {
                tokens.push(Token::new(TokenKind::RBracket, "]", pos));
                i += 1;
            }
            '"' => {
                i += 1;
                let mut value = String::new();
                let mut closed = false;
                while i < chars.len() {
                    let (_, ch) = chars[i];
                    if ch == '\\' {
                        // backslash escapes exactly the next character
                        if i + 1 < chars.len() {
                            value.push(chars[i + 1].1);
                            i += 2;
                        } else {
                            i += 1;
                        }
                    } else if ch == '"' {
                        closed = true;
                        i += 1;
                        break;
                    } else {
                        value.push(ch);
                        i += 1;
                    }
                }
                if !closed {
                    return Err(FilterError::UnterminatedString { position: pos });
                }
                tokens.push(Token::new(TokenKind::Str, value, pos));
            }
            '-' | '0'..='9' => {
                let start = pos;
                if c == '-' {
                    i += 1;
                }
                let digits_start = i;
                while i < chars.len() && chars[i].1.is_ascii_digit() {
                    i += 1;
                }
                if i == digits_start {
                    // lone minus sign
                    return Err(FilterError::UnexpectedCharacter {
                        character: c,
                        position: start,
                    });
                }
                if i + 1 < chars.len() && chars[i].1 == '.' && chars[i + 1].1.is_ascii_digit() {
                    i += 1;
                    while i < chars.len() && chars[i].1.is_ascii_digit() {
                        i += 1;
                    }
                }
                if let Some(&(next_pos, next)) = chars.get(i) {
                    if !is_literal_boundary(next) {
                        return Err(FilterError::UnexpectedCharacter {
                            character: next,
                            position: next_pos,
                        });
                    }
                }
                let end = chars.get(i).map_or(input.len(), |&(p, _)| p);
                tokens.push(Token::new(TokenKind::Number, &input[start..end], start));
            }
            c if is_ident_start(c) => {
                let start = pos;
                while i < chars.len() && is_ident_char(chars[i].1) {
                    i += 1;
                }
                let end = chars.get(i).map_or(input.len(), |&(p, _)| p);
                let word = &input[start..end];
                let kind = match word.to_ascii_lowercase().as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    "pr" => TokenKind::Presence,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "null" => TokenKind::Null,
                    lower => match CompareOp::parse(lower) {
                        Some(op) => TokenKind::CompareOp(op),
                        None => TokenKind::Attr,
                    },
                };
                // attribute paths keep their original casing
                tokens.push(Token::new(kind, word, start));
            }
            other => {
                return Err(FilterError::UnexpectedCharacter {
                    character: other,
                    position: pos,
                });
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, "", input.len()));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_comparison() {
        let tokens = tokenize("userName eq \"john\"").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Attr);
        assert_eq!(tokens[0].value, "userName");
        assert_eq!(tokens[1].kind, TokenKind::CompareOp(CompareOp::Eq));
        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert_eq!(tokens[2].value, "john");
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_stream_always_ends_with_eof() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].position, 0);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("a EQ true AND b Pr OR NOT (c ne null)"),
            vec![
                TokenKind::Attr,
                TokenKind::CompareOp(CompareOp::Eq),
                TokenKind::True,
                TokenKind::And,
                TokenKind::Attr,
                TokenKind::Presence,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::LParen,
                TokenKind::Attr,
                TokenKind::CompareOp(CompareOp::Ne),
                TokenKind::Null,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifier_starting_with_keyword_prefix() {
        let tokens = tokenize("prefs eq \"x\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Attr);
        assert_eq!(tokens[0].value, "prefs");
    }

    #[test]
    fn test_urn_qualified_attr_is_single_token() {
        let urn = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:department";
        let tokens = tokenize(&format!("{} eq \"Sales\"", urn)).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Attr);
        assert_eq!(tokens[0].value, urn);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("n eq -12.5").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].value, "-12.5");

        let tokens = tokenize("n eq 42").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].value, "42");
    }

    #[test]
    fn test_number_adjacent_to_bracket() {
        assert_eq!(
            kinds("a[b eq 1]"),
            vec![
                TokenKind::Attr,
                TokenKind::LBracket,
                TokenKind::Attr,
                TokenKind::CompareOp(CompareOp::Eq),
                TokenKind::Number,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#"a eq "say \"hi\"""#).unwrap();
        assert_eq!(tokens[2].value, "say \"hi\"");

        // backslash escapes any character literally, no \n semantics
        let tokens = tokenize(r#"a eq "x\ny""#).unwrap();
        assert_eq!(tokens[2].value, "xny");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("userName eq \"john").unwrap_err();
        assert!(matches!(err, FilterError::UnterminatedString { position: 12 }));
        assert!(err.to_string().contains("Unterminated"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a eq %").unwrap_err();
        assert_eq!(
            err,
            FilterError::UnexpectedCharacter {
                character: '%',
                position: 5
            }
        );
    }

    #[test]
    fn test_malformed_number_tail() {
        // digits followed by identifier characters are not a number and
        // cannot start an identifier either
        let err = tokenize("a eq 12abc").unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedCharacter { character: 'a', .. }));
    }

    #[test]
    fn test_whitespace_insensitive() {
        let spaced = tokenize("  userName   eq    \"a\"  ").unwrap();
        let tight = tokenize("userName eq \"a\"").unwrap();
        let kinds_a: Vec<_> = spaced.iter().map(|t| t.kind).collect();
        let kinds_b: Vec<_> = tight.iter().map(|t| t.kind).collect();
        assert_eq!(kinds_a, kinds_b);
    }
}
