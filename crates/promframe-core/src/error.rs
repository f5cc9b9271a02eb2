//! Error types for decode operations

use promframe_domain::DomainError;

/// Result type alias for decode operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for decode operations.
///
/// Every variant aborts the current decode call; the caller never sees a
/// partial set of frames next to an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid JSON syntax or a value of the wrong JSON type
    #[error("Invalid JSON at position {position}: {message}")]
    InvalidJson {
        /// Byte offset in the input where decoding failed
        position: usize,
        /// Error description
        message: String,
    },

    /// The upstream API reported a failed query
    #[error("{error_type}: {message}")]
    Upstream {
        /// Value of the `errorType` key
        error_type: String,
        /// Value of the `error` key
        message: String,
    },

    /// The `resultType` tag names a shape this decoder does not know
    #[error("unknown result type: {0}")]
    UnknownResultType(String),

    /// `result` arrived before `resultType`, so its shape is unknown
    #[error("result arrived before resultType")]
    MissingResultType,

    /// A JSON value had a kind the decoder cannot interpret at this position
    #[error("{0}")]
    UnexpectedValue(String),

    /// A sparse histogram could not be decoded
    #[error("Invalid histogram: {0}")]
    Histogram(String),

    /// Decode options are inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Frame model invariant violated
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl Error {
    /// Create an invalid JSON error
    pub fn invalid_json(position: usize, message: impl Into<String>) -> Self {
        Self::InvalidJson {
            position,
            message: message.into(),
        }
    }

    /// Create an upstream error from the envelope's `errorType` and `error`
    pub fn upstream(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected value error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedValue(message.into())
    }

    /// Create a histogram error
    pub fn histogram(message: impl Into<String>) -> Self {
        Self::Histogram(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<jiter::JiterError> for Error {
    fn from(err: jiter::JiterError) -> Self {
        Error::invalid_json(err.index, err.error_type.to_string())
    }
}
