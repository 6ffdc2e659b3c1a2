//! Sampling policy for schema discovery

use serde::{Deserialize, Serialize};

/// Default: keep every 5th record
pub const DEFAULT_SAMPLE_RATE: usize = 5;

/// Default cap on sampled records per stream
pub const DEFAULT_MAX_SAMPLES: usize = 1000;

/// Picks which records of a file feed inference
///
/// Keeps records `0, rate, 2*rate, ...` until `max_samples` have been kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sampler {
    sample_rate: usize,
    max_samples: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl Sampler {
    /// Create a sampler with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample rate (values below 1 are treated as 1)
    #[must_use]
    pub fn with_sample_rate(mut self, rate: usize) -> Self {
        self.sample_rate = rate.max(1);
        self
    }

    /// Set the maximum number of samples
    #[must_use]
    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }

    /// Sample rate
    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    /// Maximum number of samples
    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Lazily select the sampled items
    pub fn sample_iter<I: IntoIterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items
            .into_iter()
            .step_by(self.sample_rate.max(1))
            .take(self.max_samples)
    }

    /// Select the sampled items
    pub fn sample<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        self.sample_iter(items).collect()
    }
}
