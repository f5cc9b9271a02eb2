//! Decode options
//!
//! Options are passed per decode call. They have no process-wide state and
//! can be deserialized from the JSON a query handler receives, e.g.
//! `{"wideMatrixLayout": true, "samplingStep": 15000}`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of exemplars kept per time bucket
pub const DEFAULT_EXEMPLAR_CAPACITY: usize = 100;

/// Default seed of the exemplar sampler
pub const DEFAULT_SAMPLER_SEED: u64 = 0x5eed_5eed;

/// Serde for `Duration` as whole milliseconds
mod serde_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Per-call decode configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeOptions {
    /// Emit one shared-time wide frame for matrix results
    pub wide_matrix_layout: bool,
    /// Emit one shared-time wide frame for vector results
    pub wide_vector_layout: bool,
    /// Bucket width of the exemplar sampler; zero means a single bucket
    #[serde(with = "serde_millis")]
    pub sampling_step: Duration,
    /// Exemplars kept per bucket
    pub exemplar_capacity: usize,
    /// Seed of the sampler's random generator
    pub sampler_seed: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            wide_matrix_layout: false,
            wide_vector_layout: false,
            sampling_step: Duration::ZERO,
            exemplar_capacity: DEFAULT_EXEMPLAR_CAPACITY,
            sampler_seed: DEFAULT_SAMPLER_SEED,
        }
    }
}

impl DecodeOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the wide layout for matrix results
    pub fn with_wide_matrix(mut self, enabled: bool) -> Self {
        self.wide_matrix_layout = enabled;
        self
    }

    /// Toggle the wide layout for vector results
    pub fn with_wide_vector(mut self, enabled: bool) -> Self {
        self.wide_vector_layout = enabled;
        self
    }

    /// Set the exemplar bucket width
    pub fn with_sampling_step(mut self, step: Duration) -> Self {
        self.sampling_step = step;
        self
    }

    /// Set the reservoir capacity per bucket
    pub fn with_exemplar_capacity(mut self, capacity: usize) -> Self {
        self.exemplar_capacity = capacity;
        self
    }

    /// Set the sampler seed
    pub fn with_sampler_seed(mut self, seed: u64) -> Self {
        self.sampler_seed = seed;
        self
    }

    /// Check option consistency
    pub fn validate(&self) -> Result<()> {
        if self.exemplar_capacity == 0 {
            return Err(Error::config("exemplar capacity must be at least 1"));
        }
        if self.sampling_step > Duration::ZERO && self.sampling_step < Duration::from_millis(1) {
            return Err(Error::config(
                "sampling step must be zero or at least one millisecond",
            ));
        }
        Ok(())
    }
}
