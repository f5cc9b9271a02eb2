//! promframe Domain Layer - Columnar Frame Model
//!
//! This crate contains the pure data model produced by the promframe decoder:
//! typed columns ([`Field`]), tables of equal-length columns ([`Frame`]) and the
//! label sets that identify a series.
//!
//! ## Architecture
//!
//! - **Value Objects**: Immutable domain concepts (LabelSet, Notice)
//! - **Entities**: Columnar containers built during one decode pass (Frame, Field)
//!
//! Nothing in this crate performs I/O or holds global state. Every value is
//! created by a single decode call and handed over to the caller afterwards.

#![warn(missing_docs)]

pub mod entities;
pub mod value_objects;

// Re-export core types
pub use entities::{Field, FieldType, FieldValues, Frame, FrameKind, FrameMeta};
pub use value_objects::{LabelSet, Notice, NoticeSeverity};

/// Name of the time column in time series frames
pub const TIME_FIELD_NAME: &str = "Time";

/// Name of the value column in time series frames
pub const VALUE_FIELD_NAME: &str = "Value";

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Fields of one frame disagree on their row count
    #[error("Ragged frame: field '{field}' has {actual} rows, expected {expected}")]
    RaggedFrame {
        /// Name of the offending field
        field: String,
        /// Row count of the first field
        expected: usize,
        /// Row count of the offending field
        actual: usize,
    },

    /// A field index is out of range for the frame
    #[error("Field index {index} out of range for frame with {len} fields")]
    FieldOutOfRange {
        /// Requested index
        index: usize,
        /// Number of fields in the frame
        len: usize,
    },

    /// An operation needed a different field type
    #[error("Field type mismatch: expected {expected}, got {actual}")]
    FieldTypeMismatch {
        /// Type required by the operation
        expected: FieldType,
        /// Actual type of the field
        actual: FieldType,
    },

    /// Label set could not be serialized
    #[error("Label serialization failed: {0}")]
    LabelSerialization(String),
}
