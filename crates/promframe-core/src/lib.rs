//! # promframe
//!
//! Single-pass decoder for Prometheus and Loki query results.
//!
//! A response body is read once, token by token, and turned into typed
//! columnar [`Frame`]s: one frame per series or one shared-time wide frame
//! for vectors and matrices, heatmap-ready frames for native histograms, a
//! four-column frame for log streams, and a bounded sample of exemplars.
//!
//! ```
//! use promframe::{DecodeOptions, ResultDecoder};
//!
//! let body = br#"{"status": "success", "data": {"resultType": "vector",
//!     "result": [{"metric": {"job": "a"}, "value": [1000, "5"]}]}}"#;
//!
//! let response = ResultDecoder::with_options(DecodeOptions::default())?.decode(body)?;
//! assert_eq!(response.len(), 1);
//! # Ok::<(), promframe::Error>(())
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod exemplar;
pub mod histogram;
pub mod response;
pub mod shapes;
pub mod time;
pub mod token;

pub use config::{DEFAULT_EXEMPLAR_CAPACITY, DEFAULT_SAMPLER_SEED, DecodeOptions};
pub use decoder::{ResultDecoder, decode};
pub use error::{Error, Result};
pub use exemplar::{Exemplar, ExemplarSampler};
pub use histogram::HistogramAccumulator;
pub use response::Response;
pub use shapes::ResultType;
pub use token::{TokenSource, ValueKind};

// Frame model
pub use promframe_domain::{
    DomainError, Field, FieldType, FieldValues, Frame, FrameKind, FrameMeta, LabelSet, Notice,
    NoticeSeverity, TIME_FIELD_NAME, VALUE_FIELD_NAME,
};

/// Prelude for the common decode path
pub mod prelude {
    pub use crate::{
        DecodeOptions, Error, Frame, FrameKind, LabelSet, Response, Result, ResultDecoder,
    };
}
