//! Notices attached to frames

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a frame notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    /// Informational message
    Info,
    /// Upstream warning, the data is still usable
    Warning,
    /// Part of the payload could not be interpreted
    Error,
}

impl fmt::Display for NoticeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Human readable message surfaced alongside a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notice {
    severity: NoticeSeverity,
    text: String,
}

impl Notice {
    /// Create a notice with an explicit severity
    pub fn new(severity: NoticeSeverity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    /// Create an informational notice
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Info, text)
    }

    /// Create a warning notice
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Warning, text)
    }

    /// Create an error notice
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeSeverity::Error, text)
    }

    /// Get severity
    pub fn severity(&self) -> NoticeSeverity {
        self.severity
    }

    /// Get text
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}
