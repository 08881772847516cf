//! Concurrent execution of the by-name and by-attribute sub-searches.
//!
//! This module provides:
//! - A dedicated rayon pool for sub-searches
//! - Blocking waits bounded by a deadline and a caller cancellation token
//! - Metrics on completed, failed, timed-out and cancelled searches

pub mod config;
pub mod engine;
pub mod metrics;
pub mod search_task;

pub use config::ParallelSearchConfig;
pub use engine::{CONCURRENT_KINDS, CancellationToken, ConcurrentSearchOrchestrator};
pub use metrics::{SearchMetrics, SearchMetricsCollector, SearchOutcome, Timer};
pub use search_task::{SearchTask, TaskHandle, TaskResult, TaskStatus};
