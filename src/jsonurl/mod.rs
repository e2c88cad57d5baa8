//! JSON→URL text encoding for the advanced-builder parameters.
//!
//! Composites are written with parentheses: arrays as `(a,b)`, objects as
//! `(key:value,key:value)` and the empty composite as `()`. Strings are
//! bare and percent-encoded (space as `+`); a string that would otherwise
//! read back as `true`, `false`, `null` or a number is wrapped in
//! apostrophes, and the empty string is `''`. The output needs no further
//! escaping inside a query string.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Number, Value};

/// Everything but alphanumerics and `-._~*/;@` is escaped
const ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'*')
    .remove(b'/')
    .remove(b';')
    .remove(b'@');

/// Error returned when a JSON→URL string cannot be decoded
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub position: usize,
    pub message: String,
}

impl DecodeError {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "jsonurl decode error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Serialize any value into its JSON→URL text
pub fn to_string<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(encode(&value))
}

/// Decode JSON→URL text into a typed value
pub fn from_str<T: DeserializeOwned>(text: &str) -> anyhow::Result<T> {
    let value = decode(text)?;
    Ok(serde_json::from_value(value)?)
}

/// Encode a JSON value
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(')');
        }
        Value::Object(map) => {
            out.push('(');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push(')');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    if s.is_empty() {
        out.push_str("''");
        return;
    }
    let quote = looks_like_literal(s);
    if quote {
        out.push('\'');
    }
    for (i, word) in s.split(' ').enumerate() {
        if i > 0 {
            out.push('+');
        }
        out.extend(utf8_percent_encode(word, ESCAPED));
    }
    if quote {
        out.push('\'');
    }
}

/// True when the bare text would decode as a non-string literal
fn looks_like_literal(s: &str) -> bool {
    matches!(s, "true" | "false" | "null") || parse_number(s).is_some()
}

fn parse_number(s: &str) -> Option<Number> {
    let first = s.chars().next()?;
    if !(first.is_ascii_digit() || first == '-') {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Decode JSON→URL text into a JSON value
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    let mut parser = Parser {
        input: text.as_bytes(),
        pos: 0,
    };
    let value = parser.value()?;
    if parser.pos != parser.input.len() {
        return Err(DecodeError::new(parser.pos, "trailing characters"));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), DecodeError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(DecodeError::new(self.pos, format!("expected '{}'", byte as char)))
        }
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        if self.peek() == Some(b'(') {
            self.composite()
        } else {
            let raw = self.atom()?;
            atom_value(raw, self.pos)
        }
    }

    fn composite(&mut self) -> Result<Value, DecodeError> {
        self.expect(b'(')?;
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Value::Array(Vec::new()));
        }

        // The first element decides: a bare atom followed by ':' opens an object.
        if self.peek() != Some(b'(') {
            let start = self.pos;
            let raw = self.atom()?;
            if self.peek() == Some(b':') {
                self.pos += 1;
                let mut map = Map::new();
                let first = self.value()?;
                map.insert(atom_key(raw, start)?, first);
                return self.object_rest(map);
            }
            let first = atom_value(raw, start)?;
            return self.array_rest(vec![first]);
        }

        let first = self.value()?;
        self.array_rest(vec![first])
    }

    fn array_rest(&mut self, mut items: Vec<Value>) -> Result<Value, DecodeError> {
        loop {
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    items.push(self.value()?);
                }
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(DecodeError::new(self.pos, "unterminated array")),
            }
        }
    }

    fn object_rest(&mut self, mut map: Map<String, Value>) -> Result<Value, DecodeError> {
        loop {
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    let start = self.pos;
                    let raw = self.atom()?;
                    self.expect(b':')?;
                    let value = self.value()?;
                    map.insert(atom_key(raw, start)?, value);
                }
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => return Err(DecodeError::new(self.pos, "unterminated object")),
            }
        }
    }

    fn atom(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(byte, b'(' | b')' | b',' | b':') {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(DecodeError::new(start, "empty value"));
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| DecodeError::new(start, "invalid utf-8"))
    }
}

fn atom_value(raw: &str, pos: usize) -> Result<Value, DecodeError> {
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" => return Ok(Value::Null),
        _ => {}
    }
    if let Some(n) = parse_number(raw) {
        return Ok(Value::Number(n));
    }
    atom_key(raw, pos).map(Value::String)
}

fn atom_key(raw: &str, pos: usize) -> Result<String, DecodeError> {
    let inner = match raw.strip_prefix('\'') {
        Some(rest) => rest
            .strip_suffix('\'')
            .ok_or_else(|| DecodeError::new(pos, "unterminated quoted string"))?,
        None => raw,
    };
    percent_decode(inner, pos)
}

fn percent_decode(s: &str, pos: usize) -> Result<String, DecodeError> {
    let bytes = s.as_bytes();
    for (i, _) in s.match_indices('%') {
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(DecodeError::new(pos + i, "invalid escape"));
        }
    }
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::new(pos, "invalid utf-8 in escape"))
}
