//! Pull-based token source over raw JSON bytes
//!
//! [`TokenSource`] wraps [`jiter::Jiter`] and exposes the handful of
//! primitives the shape parsers need: peek at the next value kind, read typed
//! scalars, skip a value, and walk arrays and objects one step at a time.
//! It never builds a DOM; values are consumed exactly once, in order.

use crate::error::{Error, Result};
use jiter::{Jiter, Peek};
use promframe_domain::LabelSet;

/// Kind of the next JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// Any number
    Number,
    /// A string
    String,
    /// An array
    Array,
    /// An object
    Object,
}

/// Streaming reader over one JSON document
pub struct TokenSource<'j> {
    data: &'j [u8],
    jiter: Jiter<'j>,
}

impl<'j> TokenSource<'j> {
    /// Create a token source positioned before the root value
    pub fn new(data: &'j [u8]) -> Self {
        Self {
            data,
            jiter: Jiter::new(data),
        }
    }

    /// Byte offset of the reader
    pub fn position(&self) -> usize {
        self.jiter.current_index()
    }

    /// Peek at the kind of the next value without consuming it
    pub fn what_is_next(&mut self) -> Result<ValueKind> {
        let peek = self.jiter.peek()?;
        classify(peek).ok_or_else(|| Error::invalid_json(self.position(), "expected value"))
    }

    /// Read a string value
    pub fn read_string(&mut self) -> Result<String> {
        Ok(self.jiter.next_str()?.to_owned())
    }

    /// Read a number as f64
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.jiter.next_float()?)
    }

    /// Read an integral number that fits in i8
    pub fn read_i8(&mut self) -> Result<i8> {
        let position = self.position();
        let value = self.jiter.next_float()?;
        if value.fract() != 0.0 || value < f64::from(i8::MIN) || value > f64::from(i8::MAX) {
            return Err(Error::invalid_json(
                position,
                format!("{value} is not a signed 8-bit integer"),
            ));
        }
        Ok(value as i8)
    }

    /// Skip the next value, whatever its kind
    pub fn skip(&mut self) -> Result<()> {
        self.jiter.next_skip()?;
        Ok(())
    }

    /// Consume the next value and return its raw JSON text
    pub fn read_raw(&mut self) -> Result<&'j [u8]> {
        let peek = self.jiter.peek()?;
        let start = self.jiter.current_index();
        self.jiter.known_skip(peek)?;
        Ok(&self.data[start..self.jiter.current_index()])
    }

    /// Consume the next value as a `serde_json::Value`
    pub fn read_json(&mut self) -> Result<serde_json::Value> {
        let position = self.position();
        let raw = self.read_raw()?;
        serde_json::from_slice(raw).map_err(|e| Error::invalid_json(position, e.to_string()))
    }

    /// Read any scalar as display text.
    ///
    /// Strings are returned unquoted; every other value is returned as its
    /// JSON source text (`12.5`, `true`, `null`, `[1,2]`).
    pub fn read_text(&mut self) -> Result<String> {
        if self.what_is_next()? == ValueKind::String {
            return self.read_string();
        }
        let raw = self.read_raw()?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Enter an array; returns `true` if it has a first element
    pub fn enter_array(&mut self) -> Result<bool> {
        Ok(self.jiter.next_array()?.is_some())
    }

    /// Move past a separator; returns `true` if another element follows
    pub fn next_element(&mut self) -> Result<bool> {
        Ok(self.jiter.array_step()?.is_some())
    }

    /// Enter an object and return its first key
    pub fn enter_object(&mut self) -> Result<Option<String>> {
        Ok(self.jiter.next_object()?.map(str::to_owned))
    }

    /// Return the next key of the current object
    pub fn next_key(&mut self) -> Result<Option<String>> {
        Ok(self.jiter.next_key()?.map(str::to_owned))
    }

    /// Read an object of labels.
    ///
    /// `null` reads as an empty set. Non-string label values are kept as
    /// their JSON text.
    pub fn read_labels(&mut self) -> Result<LabelSet> {
        if self.what_is_next()? == ValueKind::Null {
            self.skip()?;
            return Ok(LabelSet::new());
        }

        let mut pairs = Vec::new();
        let mut key = self.enter_object()?;
        while let Some(name) = key {
            pairs.push((name, self.read_text()?));
            key = self.next_key()?;
        }
        Ok(pairs.into_iter().collect())
    }

    /// Check that only whitespace follows the root value
    pub fn finish(&mut self) -> Result<()> {
        self.jiter.finish()?;
        Ok(())
    }
}

fn classify(peek: Peek) -> Option<ValueKind> {
    if peek == Peek::Null {
        Some(ValueKind::Null)
    } else if peek == Peek::True || peek == Peek::False {
        Some(ValueKind::Bool)
    } else if peek == Peek::String {
        Some(ValueKind::String)
    } else if peek == Peek::Array {
        Some(ValueKind::Array)
    } else if peek == Peek::Object {
        Some(ValueKind::Object)
    } else if peek.is_num() {
        Some(ValueKind::Number)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_what_is_next() {
        let mut src = TokenSource::new(br#"[null, true, 1.5, "x", [], {}]"#);
        assert!(src.enter_array().unwrap());
        let mut kinds = Vec::new();
        loop {
            kinds.push(src.what_is_next().unwrap());
            src.skip().unwrap();
            if !src.next_element().unwrap() {
                break;
            }
        }
        assert_eq!(
            kinds,
            vec![
                ValueKind::Null,
                ValueKind::Bool,
                ValueKind::Number,
                ValueKind::String,
                ValueKind::Array,
                ValueKind::Object,
            ]
        );
    }

    #[test]
    fn test_object_walk() {
        let mut src = TokenSource::new(br#"{"a": 1, "b": "two"}"#);
        assert_eq!(src.enter_object().unwrap().as_deref(), Some("a"));
        assert_eq!(src.read_f64().unwrap(), 1.0);
        assert_eq!(src.next_key().unwrap().as_deref(), Some("b"));
        assert_eq!(src.read_string().unwrap(), "two");
        assert_eq!(src.next_key().unwrap(), None);
        src.finish().unwrap();
    }

    #[test]
    fn test_read_i8_bounds() {
        assert_eq!(TokenSource::new(b"-3").read_i8().unwrap(), -3);
        assert!(TokenSource::new(b"128").read_i8().is_err());
        assert!(TokenSource::new(b"1.5").read_i8().is_err());
    }

    #[test]
    fn test_read_text_keeps_json_source() {
        let mut src = TokenSource::new(br#"[12.50, "plain", false, {"k": [1]}]"#);
        src.enter_array().unwrap();
        assert_eq!(src.read_text().unwrap(), "12.50");
        src.next_element().unwrap();
        assert_eq!(src.read_text().unwrap(), "plain");
        src.next_element().unwrap();
        assert_eq!(src.read_text().unwrap(), "false");
        src.next_element().unwrap();
        assert_eq!(src.read_text().unwrap(), r#"{"k": [1]}"#);
    }

    #[test]
    fn test_read_labels() {
        let mut src = TokenSource::new(br#"{"job": "api", "code": 200}"#);
        let labels = src.read_labels().unwrap();
        assert_eq!(labels.get("job"), Some("api"));
        assert_eq!(labels.get("code"), Some("200"));

        let mut src = TokenSource::new(b"null");
        assert!(src.read_labels().unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let mut src = TokenSource::new(br#"{"a": }"#);
        src.enter_object().unwrap();
        let err = src.skip().unwrap_err();
        assert!(matches!(err, Error::InvalidJson { position, .. } if position > 0));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let mut src = TokenSource::new(b"42");
        assert!(matches!(src.read_string(), Err(Error::InvalidJson { .. })));
    }
}
