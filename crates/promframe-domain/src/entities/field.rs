//! Typed columns

use crate::value_objects::LabelSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// UTC timestamps
    Time,
    /// 64-bit floats
    Float64,
    /// 64-bit floats where a row may be missing
    NullableFloat64,
    /// UTF-8 strings
    String,
    /// Signed 8-bit integers
    Int8,
    /// Opaque JSON documents
    Json,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Time => "time",
            FieldType::Float64 => "float64",
            FieldType::NullableFloat64 => "nullable float64",
            FieldType::String => "string",
            FieldType::Int8 => "int8",
            FieldType::Json => "json",
        };
        f.write_str(name)
    }
}

/// Column storage, one vector per semantic type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "camelCase")]
pub enum FieldValues {
    /// Timestamps
    Time(Vec<DateTime<Utc>>),
    /// Floats
    Float64(Vec<f64>),
    /// Floats with gaps
    NullableFloat64(Vec<Option<f64>>),
    /// Strings
    String(Vec<String>),
    /// Small integers
    Int8(Vec<i8>),
    /// JSON text; rows usually share one allocation
    Json(Vec<Arc<str>>),
}

impl FieldValues {
    /// Create empty storage of the given type
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Time => FieldValues::Time(Vec::new()),
            FieldType::Float64 => FieldValues::Float64(Vec::new()),
            FieldType::NullableFloat64 => FieldValues::NullableFloat64(Vec::new()),
            FieldType::String => FieldValues::String(Vec::new()),
            FieldType::Int8 => FieldValues::Int8(Vec::new()),
            FieldType::Json => FieldValues::Json(Vec::new()),
        }
    }

    /// Semantic type of the storage
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValues::Time(_) => FieldType::Time,
            FieldValues::Float64(_) => FieldType::Float64,
            FieldValues::NullableFloat64(_) => FieldType::NullableFloat64,
            FieldValues::String(_) => FieldType::String,
            FieldValues::Int8(_) => FieldType::Int8,
            FieldValues::Json(_) => FieldType::Json,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Time(v) => v.len(),
            FieldValues::Float64(v) => v.len(),
            FieldValues::NullableFloat64(v) => v.len(),
            FieldValues::String(v) => v.len(),
            FieldValues::Int8(v) => v.len(),
            FieldValues::Json(v) => v.len(),
        }
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow to `len` rows, filling with the type's empty value.
    ///
    /// Nullable columns are padded with nulls, timestamps with the unix epoch,
    /// numbers with zero, strings with `""` and JSON with `null`. Shorter
    /// targets are a no-op.
    pub fn extend_to(&mut self, len: usize) {
        match self {
            FieldValues::Time(v) => v.resize(len.max(v.len()), DateTime::default()),
            FieldValues::Float64(v) => v.resize(len.max(v.len()), 0.0),
            FieldValues::NullableFloat64(v) => v.resize(len.max(v.len()), None),
            FieldValues::String(v) => v.resize(len.max(v.len()), String::new()),
            FieldValues::Int8(v) => v.resize(len.max(v.len()), 0),
            FieldValues::Json(v) => v.resize(len.max(v.len()), Arc::from("null")),
        }
    }

    /// Reorder rows so that row `i` becomes the old row `order[i]`
    pub fn permuted(&self, order: &[usize]) -> Self {
        fn pick<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
            order.iter().map(|&i| values[i].clone()).collect()
        }

        match self {
            FieldValues::Time(v) => FieldValues::Time(pick(v, order)),
            FieldValues::Float64(v) => FieldValues::Float64(pick(v, order)),
            FieldValues::NullableFloat64(v) => FieldValues::NullableFloat64(pick(v, order)),
            FieldValues::String(v) => FieldValues::String(pick(v, order)),
            FieldValues::Int8(v) => FieldValues::Int8(pick(v, order)),
            FieldValues::Json(v) => FieldValues::Json(pick(v, order)),
        }
    }
}

/// A named, typed column with optional labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<LabelSet>,
    #[serde(flatten)]
    values: FieldValues,
}

impl Field {
    /// Create a field from existing storage
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            labels: None,
            values,
        }
    }

    /// Create an empty field of the given type
    pub fn empty(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, FieldValues::empty(field_type))
    }

    /// Attach labels
    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Get name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get labels
    pub fn labels(&self) -> Option<&LabelSet> {
        self.labels.as_ref()
    }

    /// Get column storage
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Get mutable column storage
    pub fn values_mut(&mut self) -> &mut FieldValues {
        &mut self.values
    }

    /// Get semantic type
    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// See [`FieldValues::extend_to`]
    pub fn extend_to(&mut self, len: usize) {
        self.values.extend_to(len);
    }

    /// Timestamps, if this is a time field
    pub fn as_time(&self) -> Option<&[DateTime<Utc>]> {
        match &self.values {
            FieldValues::Time(v) => Some(v),
            _ => None,
        }
    }

    /// Floats, if this is a float field
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.values {
            FieldValues::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// Nullable floats, if this is a nullable float field
    pub fn as_nullable_f64(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            FieldValues::NullableFloat64(v) => Some(v),
            _ => None,
        }
    }

    /// Strings, if this is a string field
    pub fn as_strings(&self) -> Option<&[String]> {
        match &self.values {
            FieldValues::String(v) => Some(v),
            _ => None,
        }
    }

    /// Small integers, if this is an int8 field
    pub fn as_i8(&self) -> Option<&[i8]> {
        match &self.values {
            FieldValues::Int8(v) => Some(v),
            _ => None,
        }
    }

    /// JSON rows, if this is a JSON field
    pub fn as_json(&self) -> Option<&[Arc<str>]> {
        match &self.values {
            FieldValues::Json(v) => Some(v),
            _ => None,
        }
    }
}
