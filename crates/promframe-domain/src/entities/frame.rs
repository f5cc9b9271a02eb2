//! Frame entity: a named table of equal-length fields

use crate::{
    DomainError, DomainResult,
    entities::field::{Field, FieldType},
    value_objects::Notice,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of the rows in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    /// One shared time column and one value column per series
    #[serde(rename = "timeseries-wide")]
    TimeSeriesWide,
    /// One time column and one value column for a single series
    #[serde(rename = "timeseries-multi")]
    TimeSeriesMulti,
    /// Sparse histogram buckets ready for a heatmap
    #[serde(rename = "heatmap-cells-sparse")]
    HeatmapCellsSparse,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameKind::TimeSeriesWide => "timeseries-wide",
            FrameKind::TimeSeriesMulti => "timeseries-multi",
            FrameKind::HeatmapCellsSparse => "heatmap-cells-sparse",
        };
        f.write_str(name)
    }
}

/// Metadata carried next to the columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMeta {
    /// Layout tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FrameKind>,
    /// Free-form annotations such as the upstream result type or query stats
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub custom: serde_json::Map<String, serde_json::Value>,
    /// Warnings and parse anomalies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

/// Named collection of fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    name: String,
    fields: Vec<Field>,
    #[serde(default)]
    meta: FrameMeta,
}

impl Frame {
    /// Create an empty frame
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            meta: FrameMeta::default(),
        }
    }

    /// Create a frame from a list of fields
    pub fn with_fields(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            meta: FrameMeta::default(),
        }
    }

    /// Set the layout tag
    pub fn with_kind(mut self, kind: FrameKind) -> Self {
        self.meta.kind = Some(kind);
        self
    }

    /// Add a custom annotation
    pub fn with_custom(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.custom.insert(key.into(), value);
        self
    }

    /// Get name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by position
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Get the first field with the given name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Append a field
    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get metadata
    pub fn meta(&self) -> &FrameMeta {
        &self.meta
    }

    /// Get mutable metadata
    pub fn meta_mut(&mut self) -> &mut FrameMeta {
        &mut self.meta
    }

    /// Get layout tag
    pub fn kind(&self) -> Option<FrameKind> {
        self.meta.kind
    }

    /// Get a custom annotation
    pub fn custom(&self, key: &str) -> Option<&serde_json::Value> {
        self.meta.custom.get(key)
    }

    /// Set a custom annotation, replacing any previous value
    pub fn set_custom(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.meta.custom.insert(key.into(), value);
    }

    /// Get notices
    pub fn notices(&self) -> &[Notice] {
        &self.meta.notices
    }

    /// Append notices
    pub fn append_notices(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.meta.notices.extend(notices);
    }

    /// Row count, taken from the first field
    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    /// Check that every field has the same number of rows
    pub fn validate(&self) -> DomainResult<()> {
        let expected = self.row_count();
        match self.fields.iter().find(|f| f.len() != expected) {
            Some(field) => Err(DomainError::RaggedFrame {
                field: field.name().to_string(),
                expected,
                actual: field.len(),
            }),
            None => Ok(()),
        }
    }

    /// Stable sort of all rows by a time field, ascending
    pub fn sort_by_field(&mut self, index: usize) -> DomainResult<()> {
        self.validate()?;

        let key = self.fields.get(index).ok_or(DomainError::FieldOutOfRange {
            index,
            len: self.fields.len(),
        })?;
        let times = key.as_time().ok_or(DomainError::FieldTypeMismatch {
            expected: FieldType::Time,
            actual: key.field_type(),
        })?;

        let mut order: Vec<usize> = (0..times.len()).collect();
        order.sort_by_key(|&row| times[row]);
        if order.iter().enumerate().all(|(i, &row)| i == row) {
            return Ok(());
        }

        for field in &mut self.fields {
            let sorted = field.values().permuted(&order);
            *field.values_mut() = sorted;
        }
        Ok(())
    }
}
