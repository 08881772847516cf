//! Metrics for concurrent searches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Point-in-time copy of the collected counters.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMetrics {
    pub total_searches: u64,
    pub successful_searches: u64,
    pub failed_searches: u64,
    pub cancelled_searches: u64,
    pub timeout_count: u64,
    pub total_hits_returned: u64,
    pub total_execution_time: Duration,
    pub avg_execution_time: Duration,
    pub max_execution_time: Duration,
    pub min_execution_time: Duration,
}

/// How one search ended, for [`SearchMetricsCollector::record_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Success,
    Failed,
    TimedOut,
    Cancelled,
}

/// Lock-free collector shared by all requests of an orchestrator.
#[derive(Debug)]
pub struct SearchMetricsCollector {
    total_searches: AtomicU64,
    successful_searches: AtomicU64,
    failed_searches: AtomicU64,
    cancelled_searches: AtomicU64,
    timeout_count: AtomicU64,
    total_hits_returned: AtomicU64,
    total_execution_nanos: AtomicU64,
    max_execution_nanos: AtomicU64,
    min_execution_nanos: AtomicU64,
}

impl SearchMetricsCollector {
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            successful_searches: AtomicU64::new(0),
            failed_searches: AtomicU64::new(0),
            cancelled_searches: AtomicU64::new(0),
            timeout_count: AtomicU64::new(0),
            total_hits_returned: AtomicU64::new(0),
            total_execution_nanos: AtomicU64::new(0),
            max_execution_nanos: AtomicU64::new(0),
            min_execution_nanos: AtomicU64::new(u64::MAX),
        }
    }

    pub fn record_search(&self, execution_time: Duration, outcome: SearchOutcome, hits: u64) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome {
            SearchOutcome::Success => &self.successful_searches,
            SearchOutcome::Failed => &self.failed_searches,
            SearchOutcome::TimedOut => &self.timeout_count,
            SearchOutcome::Cancelled => &self.cancelled_searches,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_hits_returned.fetch_add(hits, Ordering::Relaxed);

        let nanos = u64::try_from(execution_time.as_nanos()).unwrap_or(u64::MAX);
        self.total_execution_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_execution_nanos.fetch_max(nanos, Ordering::Relaxed);
        self.min_execution_nanos.fetch_min(nanos, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SearchMetrics {
        let total_searches = self.total_searches.load(Ordering::Relaxed);
        let total_nanos = self.total_execution_nanos.load(Ordering::Relaxed);
        let avg_nanos = if total_searches > 0 {
            total_nanos / total_searches
        } else {
            0
        };
        let min_nanos = match self.min_execution_nanos.load(Ordering::Relaxed) {
            u64::MAX => 0,
            n => n,
        };

        SearchMetrics {
            total_searches,
            successful_searches: self.successful_searches.load(Ordering::Relaxed),
            failed_searches: self.failed_searches.load(Ordering::Relaxed),
            cancelled_searches: self.cancelled_searches.load(Ordering::Relaxed),
            timeout_count: self.timeout_count.load(Ordering::Relaxed),
            total_hits_returned: self.total_hits_returned.load(Ordering::Relaxed),
            total_execution_time: Duration::from_nanos(total_nanos),
            avg_execution_time: Duration::from_nanos(avg_nanos),
            max_execution_time: Duration::from_nanos(self.max_execution_nanos.load(Ordering::Relaxed)),
            min_execution_time: Duration::from_nanos(min_nanos),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.total_searches,
            &self.successful_searches,
            &self.failed_searches,
            &self.cancelled_searches,
            &self.timeout_count,
            &self.total_hits_returned,
            &self.total_execution_nanos,
            &self.max_execution_nanos,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.min_execution_nanos.store(u64::MAX, Ordering::Relaxed);
    }
}

impl Default for SearchMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for timing operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return elapsed time.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}
