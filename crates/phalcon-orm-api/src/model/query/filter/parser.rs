//! Parser for condition strings such as `estado = 'A' AND ciudad_id >= 20404`.
//!
//! Grammar:
//!
//! ```text
//! expr       := term ( OR term )*
//! term       := factor ( AND factor )*
//! factor     := NOT factor | '(' expr ')' | predicate
//! predicate  := ident ( cmp literal
//!                     | IS [NOT] NULL
//!                     | [NOT] LIKE string
//!                     | [NOT] IN '(' literal ( ',' literal )* ')' )
//! cmp        := '=' | '<>' | '!=' | '<' | '<=' | '>' | '>='
//! literal    := string | number | TRUE | FALSE | NULL
//! ```

use std::str::FromStr as _;

use rust_decimal::Decimal;

use super::Filter;
use crate::model::query::{QueryError, QueryResult};
use crate::model::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    String(String),
    Number(String),
    Op(&'static str),
    LParen,
    RParen,
    Comma,
}

/// Splits a condition string into positioned tokens.
struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn tokenize(mut self) -> QueryResult<Vec<(usize, Token)>> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.skip_whitespace() {
            let start = self.position;
            let token = match ch {
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                ',' => self.single(Token::Comma),
                '\'' | '"' => self.string(ch)?,
                '[' | '`' => self.delimited_ident(ch)?,
                '=' | '<' | '>' | '!' => self.operator()?,
                '-' | '0'..='9' => self.number(),
                c if c.is_alphabetic() || c == '_' => self.ident(),
                c => return Err(error(start, format!("unexpected character '{c}'"))),
            };
            tokens.push((start, token));
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) -> Option<char> {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                return Some(ch);
            }
            self.bump();
        }
        None
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    /// Quoted string; a doubled quote escapes the quote character.
    fn string(&mut self, quote: char) -> QueryResult<Token> {
        let start = self.position;
        self.bump();
        let mut content = String::new();
        while let Some(ch) = self.bump() {
            if ch == quote {
                if self.peek() == Some(quote) {
                    self.bump();
                    content.push(quote);
                } else {
                    return Ok(Token::String(content));
                }
            } else {
                content.push(ch);
            }
        }
        Err(error(start, "unterminated string literal"))
    }

    fn delimited_ident(&mut self, open: char) -> QueryResult<Token> {
        let start = self.position;
        let close = if open == '[' { ']' } else { '`' };
        self.bump();
        let mut name = String::new();
        while let Some(ch) = self.bump() {
            if ch == close {
                return Ok(Token::Ident(name));
            }
            name.push(ch);
        }
        Err(error(start, "unterminated identifier"))
    }

    fn operator(&mut self) -> QueryResult<Token> {
        let start = self.position;
        let rest = &self.input[self.position..];
        let op = ["<>", "!=", "<=", ">=", "=", "<", ">"]
            .into_iter()
            .find(|op| rest.starts_with(op))
            .ok_or_else(|| error(start, "unexpected character '!'"))?;
        self.position += op.len();
        Ok(Token::Op(op))
    }

    fn number(&mut self) -> Token {
        let start = self.position;
        self.bump();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                self.bump();
            } else {
                break;
            }
        }
        Token::Number(self.input[start..self.position].to_string())
    }

    fn ident(&mut self) -> Token {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                self.bump();
            } else {
                break;
            }
        }
        Token::Ident(self.input[start..self.position].to_string())
    }
}

fn error(position: usize, message: impl Into<String>) -> QueryError {
    QueryError::InvalidCondition {
        position,
        message: message.into(),
    }
}

/// Recursive descent parser producing a [`Filter`].
/// Maximum nesting of `NOT` and parentheses accepted in a condition.
const MAX_NESTING_DEPTH: usize = 64;

pub struct Parser {
    tokens: Vec<(usize, Token)>,
    cursor: usize,
    end: usize,
    /// Current nesting of `NOT` and parentheses.
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> QueryResult<Self> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            cursor: 0,
            end: input.len(),
            depth: 0,
        })
    }

    pub fn parse(mut self) -> QueryResult<Filter> {
        if self.tokens.is_empty() {
            return Err(error(0, "empty condition"));
        }
        let filter = self.expr()?;
        match self.tokens.get(self.cursor) {
            None => Ok(filter),
            Some((pos, token)) => Err(error(*pos, format!("unexpected token {token:?}"))),
        }
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map(|(pos, _)| *pos)
            .unwrap_or(self.end)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(_, token)| token)
    }

    fn next(&mut self) -> QueryResult<Token> {
        let position = self.position();
        let token = self
            .tokens
            .get(self.cursor)
            .map(|(_, token)| token.clone())
            .ok_or_else(|| error(position, "unexpected end of input"))?;
        self.cursor += 1;
        Ok(token)
    }

    fn keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword)) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> QueryResult<()> {
        let position = self.position();
        if self.keyword(keyword) {
            Ok(())
        } else {
            Err(error(position, format!("expected {keyword}")))
        }
    }

    fn expect(&mut self, expected: Token) -> QueryResult<()> {
        let position = self.position();
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(error(position, format!("expected {expected:?}, found {token:?}")))
        }
    }

    fn expr(&mut self) -> QueryResult<Filter> {
        let mut filter = self.term()?;
        while self.keyword("OR") {
            filter = filter.or(self.term()?);
        }
        Ok(filter)
    }

    fn term(&mut self) -> QueryResult<Filter> {
        let mut filter = self.factor()?;
        while self.keyword("AND") {
            filter = filter.and(self.factor()?);
        }
        Ok(filter)
    }

    fn factor(&mut self) -> QueryResult<Filter> {
        let position = self.position();
        if self.keyword("NOT") {
            self.nest(position)?;
            let filter = self.factor()?.not();
            self.depth -= 1;
            return Ok(filter);
        }
        if self.peek() == Some(&Token::LParen) {
            self.nest(position)?;
            self.cursor += 1;
            let filter = self.expr()?;
            self.expect(Token::RParen)?;
            self.depth -= 1;
            return Ok(filter);
        }
        self.predicate()
    }

    fn nest(&mut self, position: usize) -> QueryResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(error(
                position,
                format!("condition nested deeper than {MAX_NESTING_DEPTH} levels"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn predicate(&mut self) -> QueryResult<Filter> {
        let position = self.position();
        let column = match self.next()? {
            Token::Ident(name) => name,
            token => return Err(error(position, format!("expected column, found {token:?}"))),
        };

        if self.keyword("IS") {
            let negated = self.keyword("NOT");
            self.expect_keyword("NULL")?;
            return Ok(if negated {
                Filter::not_null(&column)
            } else {
                Filter::is_null(&column)
            });
        }

        let negated = self.keyword("NOT");
        if self.keyword("LIKE") {
            let position = self.position();
            let pattern = match self.next()? {
                Token::String(pattern) => pattern,
                token => {
                    return Err(error(position, format!("expected pattern, found {token:?}")));
                }
            };
            let filter = Filter::like(&column, &pattern);
            return Ok(if negated { filter.not() } else { filter });
        }
        if self.keyword("IN") {
            self.expect(Token::LParen)?;
            let mut list = vec![self.literal()?];
            while self.peek() == Some(&Token::Comma) {
                self.cursor += 1;
                list.push(self.literal()?);
            }
            self.expect(Token::RParen)?;
            let filter = Filter::in_list(&column, list);
            return Ok(if negated { filter.not() } else { filter });
        }
        if negated {
            return Err(error(self.position(), "expected LIKE or IN after NOT"));
        }

        let position = self.position();
        let op = match self.next()? {
            Token::Op(op) => op,
            token => return Err(error(position, format!("expected operator, found {token:?}"))),
        };
        let value = self.literal()?;
        Ok(match op {
            "=" => Filter::Eq(column, value),
            "<>" | "!=" => Filter::Ne(column, value),
            "<" => Filter::Lt(column, value),
            "<=" => Filter::Le(column, value),
            ">" => Filter::Gt(column, value),
            _ => Filter::Ge(column, value),
        })
    }

    fn literal(&mut self) -> QueryResult<Value> {
        let position = self.position();
        match self.next()? {
            Token::String(s) => Ok(Value::Text(s)),
            Token::Number(n) if n.contains('.') => Decimal::from_str(&n)
                .map(Value::Decimal)
                .map_err(|e| error(position, format!("invalid decimal {n}: {e}"))),
            Token::Number(n) => n
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| error(position, format!("invalid integer {n}: {e}"))),
            Token::Ident(word) if word.eq_ignore_ascii_case("true") => Ok(Value::Boolean(true)),
            Token::Ident(word) if word.eq_ignore_ascii_case("false") => Ok(Value::Boolean(false)),
            Token::Ident(word) if word.eq_ignore_ascii_case("null") => Ok(Value::Null),
            token => Err(error(position, format!("expected literal, found {token:?}"))),
        }
    }
}
