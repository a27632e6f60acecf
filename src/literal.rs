// src/literal.rs

//! Reader for the literal text found in cast columns.
//!
//! Source datasets store the cast either as JSON or as the `repr` of a
//! Python list of dicts (single quotes, `None`, `True`/`False`). Both are
//! read into a `serde_json::Value` so the normalizer sees one shape.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest list/dict nesting accepted before giving up
pub const MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at byte {pos}")]
    Unexpected { found: char, pos: usize },
    #[error("invalid escape sequence at byte {0}")]
    BadEscape(usize),
    #[error("invalid number {0:?}")]
    BadNumber(String),
    #[error("trailing characters at byte {0}")]
    Trailing(usize),
    #[error("nesting too deep at byte {0}")]
    TooDeep(usize),
}

pub fn parse(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src: text, pos: 0, depth: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(LiteralError::Trailing(parser.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect_peek(&self) -> Result<char, LiteralError> {
        self.peek().ok_or(LiteralError::UnexpectedEnd)
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::Unexpected { found, pos: self.pos }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.expect_peek()? {
            '[' => self.nested(|p| p.sequence('[', ']')),
            '(' => self.nested(|p| p.sequence('(', ')')),
            '{' => self.nested(Self::mapping),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() => self.keyword(),
            c => Err(self.unexpected(c)),
        }
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<Value, LiteralError>) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep(self.pos));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Value, LiteralError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.expect_peek()? == close {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.expect_peek()? {
                ',' => {
                    self.bump();
                }
                c if c == close => {}
                c => return Err(self.unexpected(c)),
            }
        }
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_ws();
            let c = self.expect_peek()?;
            if c == '}' {
                self.bump();
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(self.unexpected(c)),
            };
            self.skip_ws();
            match self.bump() {
                Some(':') => {}
                Some(other) => return Err(LiteralError::Unexpected { found: other, pos: self.pos - other.len_utf8() }),
                None => return Err(LiteralError::UnexpectedEnd),
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.expect_peek()? {
                ',' => {
                    self.bump();
                }
                '}' => {}
                c => return Err(self.unexpected(c)),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            let start = self.pos;
            match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
                c if c == quote => return Ok(out),
                '\\' => {
                    let esc = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' | '/' => out.push(esc),
                        'x' => out.push(self.hex_char(2, start)?),
                        'u' => out.push(self.hex_char(4, start)?),
                        'U' => out.push(self.hex_char(8, start)?),
                        _ => return Err(LiteralError::BadEscape(start)),
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_char(&mut self, digits: usize, at: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;
        let hex = self.src.get(self.pos..end).ok_or(LiteralError::BadEscape(at))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| LiteralError::BadEscape(at))?;
        self.pos = end;
        char::from_u32(code).ok_or(LiteralError::BadEscape(at))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.src[start..self.pos].chars().filter(|&c| c != '_').collect();
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::BadNumber(text))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "None" | "null" => Ok(Value::Null),
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.unexpected(self.src[start..].chars().next().unwrap_or('?')))
            }
        }
    }
}
