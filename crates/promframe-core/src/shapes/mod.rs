//! Shape parsers, one per `resultType`
//!
//! The result tag is turned into a [`ResultType`] before any parser runs, and
//! each parser consumes exactly one JSON value from the token source. Shared
//! helpers here implement the lenient-leaf policy: a malformed
//! `[time, value]` pair is consumed and dropped without failing the series.

pub mod array;
pub mod matrix;
pub mod scalar;
pub mod stream;

use crate::error::{Error, Result};
use crate::time;
use crate::token::{TokenSource, ValueKind};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Closed set of result shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    /// Range query result, many samples per series
    Matrix,
    /// Instant query result, one sample per series
    Vector,
    /// Loki log streams
    Streams,
    /// Single string sample
    String,
    /// Single numeric sample
    Scalar,
}

impl ResultType {
    /// Tag as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Matrix => "matrix",
            ResultType::Vector => "vector",
            ResultType::Streams => "streams",
            ResultType::String => "string",
            ResultType::Scalar => "scalar",
        }
    }
}

impl FromStr for ResultType {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "matrix" => Ok(ResultType::Matrix),
            "vector" => Ok(ResultType::Vector),
            "streams" => Ok(ResultType::Streams),
            "string" => Ok(ResultType::String),
            "scalar" => Ok(ResultType::Scalar),
            other => Err(Error::UnknownResultType(other.to_string())),
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar member of a two-element pair
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Leaf {
    Number(f64),
    Text(String),
}

/// Consume one value expected to be a two-element array of scalars.
///
/// Returns `None` when the value has a different shape; the value is fully
/// consumed either way so the caller stays in sync with the token stream.
pub(crate) fn read_pair(src: &mut TokenSource<'_>) -> Result<Option<(Leaf, Leaf)>> {
    if src.what_is_next()? != ValueKind::Array {
        src.skip()?;
        return Ok(None);
    }

    let mut leaves = Vec::with_capacity(2);
    let mut valid = true;
    let mut more = src.enter_array()?;
    while more {
        match src.what_is_next()? {
            ValueKind::Number => leaves.push(Leaf::Number(src.read_f64()?)),
            ValueKind::String => leaves.push(Leaf::Text(src.read_string()?)),
            _ => {
                valid = false;
                src.skip()?;
            }
        }
        more = src.next_element()?;
    }

    if !valid || leaves.len() != 2 {
        return Ok(None);
    }
    let second = leaves.pop();
    let first = leaves.pop();
    Ok(first.zip(second))
}

/// Read a Prometheus `[seconds, "value"]` sample, dropping malformed ones
pub(crate) fn read_sample(src: &mut TokenSource<'_>) -> Result<Option<(DateTime<Utc>, f64)>> {
    let sample = match read_pair(src)? {
        Some((Leaf::Number(seconds), Leaf::Text(text))) => time::from_float_seconds(seconds)
            .zip(text.parse::<f64>().ok()),
        _ => None,
    };
    if sample.is_none() {
        trace!("dropping malformed sample");
    }
    Ok(sample)
}

/// Call `each` for every element of an array; any other value is skipped
pub(crate) fn for_each_element<'j>(
    src: &mut TokenSource<'j>,
    mut each: impl FnMut(&mut TokenSource<'j>) -> Result<()>,
) -> Result<()> {
    if src.what_is_next()? != ValueKind::Array {
        trace!("expected array, skipping value");
        return src.skip();
    }

    let mut more = src.enter_array()?;
    while more {
        each(src)?;
        more = src.next_element()?;
    }
    Ok(())
}

/// Custom frame annotation naming the upstream result type
pub(crate) fn result_type_meta(tag: &str) -> serde_json::Value {
    serde_json::Value::String(tag.to_string())
}
