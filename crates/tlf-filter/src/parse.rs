//! Tokenizer and parser for the constrained filter grammar.
//!
//! Grammar, informally: one or more atoms of the form `dataset:column OP
//! value`, joined by case-insensitive `and`/`or`. Connectives fold strictly
//! left-to-right in source order; `and` does NOT bind tighter than `or`.
//! That is a deliberate simplification of the grammar, not an oversight.

use crate::ast::{CmpOp, Comparison, FilterExpr, FilterValue};
use crate::error::{FilterError, Result};

/// Parses a filter string into a [`FilterExpr`].
///
/// An empty or all-whitespace string is the "no restriction" predicate and
/// parses to [`FilterExpr::True`].
pub fn parse(text: &str) -> Result<FilterExpr> {
    if text.trim().is_empty() {
        return Ok(FilterExpr::True);
    }

    let tokens = tokenize(text)?;
    let mut parser = Parser {
        text,
        tokens,
        cursor: 0,
    };
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    /// Bare word: identifier, connective keyword, or unquoted literal.
    Word(String),
    Quoted(String),
    Int(i64),
    Float(f64),
    Colon,
    LBracket,
    RBracket,
    Comma,
    Op(CmpOp),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn syntax(text: &str, position: usize, message: impl Into<String>) -> FilterError {
    FilterError::Syntax {
        text: text.to_string(),
        position,
        message: message.into(),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            _ if ch.is_whitespace() => {
                chars.next();
            }
            ':' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Colon,
                    pos,
                });
            }
            '[' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::LBracket,
                    pos,
                });
            }
            ']' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::RBracket,
                    pos,
                });
            }
            ',' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    pos,
                });
            }
            '\'' | '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == ch {
                        closed = true;
                        break;
                    }
                    value.push(inner);
                }
                if !closed {
                    return Err(syntax(text, pos, "unterminated quoted string"));
                }
                tokens.push(Token {
                    kind: TokenKind::Quoted(value),
                    pos,
                });
            }
            '=' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push(Token {
                        kind: TokenKind::Op(CmpOp::Eq),
                        pos,
                    });
                } else {
                    return Err(syntax(text, pos, "unknown operator '='; expected '=='"));
                }
            }
            '!' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push(Token {
                        kind: TokenKind::Op(CmpOp::Ne),
                        pos,
                    });
                } else {
                    return Err(syntax(text, pos, "unknown operator '!'; expected '!='"));
                }
            }
            '>' => {
                chars.next();
                let op = if chars.next_if(|&(_, c)| c == '=').is_some() {
                    CmpOp::Ge
                } else {
                    CmpOp::Gt
                };
                tokens.push(Token {
                    kind: TokenKind::Op(op),
                    pos,
                });
            }
            '<' => {
                chars.next();
                let op = if chars.next_if(|&(_, c)| c == '=').is_some() {
                    CmpOp::Le
                } else {
                    CmpOp::Lt
                };
                tokens.push(Token {
                    kind: TokenKind::Op(op),
                    pos,
                });
            }
            _ if ch.is_ascii_digit() || ch == '-' || ch == '+' => {
                tokens.push(number_token(text, &mut chars, pos)?);
            }
            _ if is_word_char(ch) => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Word(word),
                    pos,
                });
            }
            _ => {
                return Err(syntax(text, pos, format!("unexpected character {ch:?}")));
            }
        }
    }

    Ok(tokens)
}

fn number_token(
    text: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    pos: usize,
) -> Result<Token> {
    let mut literal = String::new();
    if let Some((_, sign)) = chars.next_if(|&(_, c)| c == '-' || c == '+') {
        literal.push(sign);
    }
    let mut saw_digit = false;
    let mut saw_dot = false;
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if c == '.' && !saw_dot {
            saw_dot = true;
        } else {
            break;
        }
        literal.push(c);
        chars.next();
    }
    if !saw_digit {
        return Err(syntax(text, pos, format!("unexpected character {literal:?}")));
    }

    let kind = if saw_dot {
        let value = literal
            .parse::<f64>()
            .map_err(|_| syntax(text, pos, format!("invalid number {literal:?}")))?;
        TokenKind::Float(value)
    } else {
        let value = literal
            .parse::<i64>()
            .map_err(|_| syntax(text, pos, format!("invalid number {literal:?}")))?;
        TokenKind::Int(value)
    };
    Ok(Token { kind, pos })
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser<'_> {
    fn expression(&mut self) -> Result<FilterExpr> {
        let mut expr = FilterExpr::Cmp(self.comparison()?);
        loop {
            let Some(word) = self.peek_word() else { break };
            if word.eq_ignore_ascii_case("and") {
                self.cursor += 1;
                let rhs = self.comparison()?;
                expr = FilterExpr::And(Box::new(expr), Box::new(FilterExpr::Cmp(rhs)));
            } else if word.eq_ignore_ascii_case("or") {
                self.cursor += 1;
                let rhs = self.comparison()?;
                expr = FilterExpr::Or(Box::new(expr), Box::new(FilterExpr::Cmp(rhs)));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Comparison> {
        let dataset = self.expect_word("dataset name")?;
        self.expect_colon()?;
        let column = self.expect_word("column name")?;
        let op = self.operator()?;
        let value = self.value(op)?;
        Ok(Comparison {
            dataset,
            column,
            op,
            value,
        })
    }

    fn operator(&mut self) -> Result<CmpOp> {
        let pos = self.current_pos();
        match self.next() {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) => Ok(op),
            Some(Token {
                kind: TokenKind::Word(word),
                ..
            }) if word.eq_ignore_ascii_case("in") => Ok(CmpOp::In),
            Some(Token {
                kind: TokenKind::Word(word),
                pos: not_pos,
            }) if word.eq_ignore_ascii_case("not") => match self.next() {
                Some(Token {
                    kind: TokenKind::Word(next),
                    ..
                }) if next.eq_ignore_ascii_case("in") => Ok(CmpOp::NotIn),
                _ => Err(syntax(self.text, not_pos, "expected 'in' after 'not'")),
            },
            _ => Err(syntax(self.text, pos, "expected comparison operator")),
        }
    }

    fn value(&mut self, op: CmpOp) -> Result<FilterValue> {
        let pos = self.current_pos();
        let is_list = matches!(
            self.peek(),
            Some(Token {
                kind: TokenKind::LBracket,
                ..
            })
        );
        match op {
            CmpOp::In | CmpOp::NotIn => {
                if !is_list {
                    return Err(syntax(
                        self.text,
                        pos,
                        format!("'{op}' requires a bracketed list value"),
                    ));
                }
                self.cursor += 1;
                self.list_value(pos)
            }
            _ => {
                if is_list {
                    return Err(syntax(
                        self.text,
                        pos,
                        format!("list value is only valid with 'in'/'not in', not '{op}'"),
                    ));
                }
                self.scalar_value()
            }
        }
    }

    fn list_value(&mut self, open_pos: usize) -> Result<FilterValue> {
        let mut items = Vec::new();
        if matches!(
            self.peek(),
            Some(Token {
                kind: TokenKind::RBracket,
                ..
            })
        ) {
            self.cursor += 1;
            return Ok(FilterValue::List(items));
        }
        loop {
            items.push(self.scalar_value()?);
            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => {}
                Some(Token {
                    kind: TokenKind::RBracket,
                    ..
                }) => return Ok(FilterValue::List(items)),
                _ => return Err(syntax(self.text, open_pos, "unbalanced bracket in list value")),
            }
        }
    }

    fn scalar_value(&mut self) -> Result<FilterValue> {
        let pos = self.current_pos();
        match self.next() {
            Some(Token {
                kind: TokenKind::Quoted(value),
                ..
            }) => Ok(FilterValue::Str(value)),
            Some(Token {
                kind: TokenKind::Int(value),
                ..
            }) => Ok(FilterValue::Int(value)),
            Some(Token {
                kind: TokenKind::Float(value),
                ..
            }) => Ok(FilterValue::Float(value)),
            Some(Token {
                kind: TokenKind::Word(word),
                ..
            }) => {
                if word.eq_ignore_ascii_case("true") {
                    Ok(FilterValue::Bool(true))
                } else if word.eq_ignore_ascii_case("false") {
                    Ok(FilterValue::Bool(false))
                } else if word.eq_ignore_ascii_case("null") || word.eq_ignore_ascii_case("none") {
                    Ok(FilterValue::Null)
                } else {
                    // Unquoted literal string.
                    Ok(FilterValue::Str(word))
                }
            }
            _ => Err(syntax(self.text, pos, "expected a value")),
        }
    }

    fn expect_word(&mut self, what: &str) -> Result<String> {
        let pos = self.current_pos();
        match self.next() {
            Some(Token {
                kind: TokenKind::Word(word),
                ..
            }) => Ok(word),
            _ => Err(syntax(self.text, pos, format!("expected {what}"))),
        }
    }

    fn expect_colon(&mut self) -> Result<()> {
        let pos = self.current_pos();
        match self.next() {
            Some(Token {
                kind: TokenKind::Colon,
                ..
            }) => Ok(()),
            _ => Err(syntax(
                self.text,
                pos,
                "expected ':' between dataset and column",
            )),
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(syntax(
                self.text,
                token.pos,
                "unexpected trailing input after expression",
            )),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn peek_word(&self) -> Option<&str> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Word(word),
                ..
            }) => Some(word),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map_or(self.text.len(), |token| token.pos)
    }
}
