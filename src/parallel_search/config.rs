//! Configuration for concurrent search.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ForkfulError, Result};

/// Configuration for [`ConcurrentSearchOrchestrator`](super::ConcurrentSearchOrchestrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelSearchConfig {
    /// Upper bound on how long a request waits for its sub-searches.
    pub default_timeout: Duration,

    /// Worker threads for sub-searches.
    /// If None, uses the number of CPU cores (at least two).
    pub thread_pool_size: Option<usize>,

    /// Whether to collect search metrics.
    pub enable_metrics: bool,

    /// Return the sub-searches that did finish when another one fails or
    /// times out, instead of an empty result.
    pub allow_partial_results: bool,
}

impl Default for ParallelSearchConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(10),
            thread_pool_size: None,
            enable_metrics: true,
            allow_partial_results: false,
        }
    }
}

impl ParallelSearchConfig {
    /// Number of worker threads the pool will be built with.
    pub fn effective_pool_size(&self) -> usize {
        self.thread_pool_size.unwrap_or_else(num_cpus::get).max(2)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_partial_results(mut self, allow: bool) -> Self {
        self.allow_partial_results = allow;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_timeout.is_zero() {
            return Err(ForkfulError::config("parallel.default_timeout must be positive"));
        }
        if self.thread_pool_size == Some(0) {
            return Err(ForkfulError::config("parallel.thread_pool_size must be at least 1"));
        }
        Ok(())
    }
}
