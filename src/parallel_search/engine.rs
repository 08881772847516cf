//! Concurrent by-name / by-attribute search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::NaiveTime;
use crossbeam_channel::{Receiver, Sender, select};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{ForkfulError, Result};
use crate::model::Restaurant;
use crate::parallel_search::config::ParallelSearchConfig;
use crate::parallel_search::metrics::{SearchMetrics, SearchMetricsCollector, SearchOutcome, Timer};
use crate::parallel_search::search_task::{SearchTask, TaskHandle, TaskResult, TaskStatus};
use crate::query::is_blank;
use crate::search::{MultiCriteriaSearch, SearchContext, SubSearchKind, merge_last_wins};

/// Sub-searches run by the concurrent path, in merge order.
pub const CONCURRENT_KINDS: [SubSearchKind; 2] = [SubSearchKind::ByName, SubSearchKind::ByAttribute];

/// Caller-side cancellation for a concurrent search.
///
/// Cancelling drops the inner sender, which wakes any waiter selecting on
/// [`CancellationToken::receiver`]. Clones share state.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    sender: Arc<Mutex<Option<Sender<()>>>>,
    receiver: Receiver<()>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.sender.lock().take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Becomes ready (disconnected) once the token is cancelled.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// How waiting for the sub-searches ended.
enum Gathered {
    Complete(Vec<TaskResult>),
    Failed(Vec<TaskResult>, ForkfulError),
    TimedOut(Vec<TaskResult>),
    Cancelled,
}

/// Runs by-name and by-attribute on a dedicated pool and merges them.
pub struct ConcurrentSearchOrchestrator {
    search: MultiCriteriaSearch,
    config: ParallelSearchConfig,
    thread_pool: Arc<ThreadPool>,
    metrics: Arc<SearchMetricsCollector>,
}

impl ConcurrentSearchOrchestrator {
    pub fn new(search: MultiCriteriaSearch, config: ParallelSearchConfig) -> Result<Self> {
        config.validate()?;
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(config.effective_pool_size())
            .thread_name(|i| format!("forkful-search-{i}"))
            .build()
            .map_err(|e| ForkfulError::thread_pool(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            search,
            config,
            thread_pool: Arc::new(thread_pool),
            metrics: Arc::new(SearchMetricsCollector::new()),
        })
    }

    pub fn config(&self) -> &ParallelSearchConfig {
        &self.config
    }

    pub fn pool_size(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    pub fn search_concurrently(
        &self,
        lat: f64,
        lon: f64,
        query: &str,
        time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<Restaurant>> {
        self.search_concurrently_with_cancel(lat, lon, query, time, radius_km, &CancellationToken::new())
    }

    /// Run the by-name and by-attribute sub-searches at the same time.
    ///
    /// The result holds every restaurant either sub-search found, once, in
    /// first-seen order (by-name first); where both found the same restaurant
    /// the by-attribute copy is kept. If a sub-search fails or the configured
    /// timeout expires, the other one is cancelled and the result is empty
    /// (or the finished subset, with `allow_partial_results`). Cancelling
    /// `cancel` stops both and returns [`ForkfulError::OperationCancelled`].
    pub fn search_concurrently_with_cancel(
        &self,
        lat: f64,
        lon: f64,
        query: &str,
        time: NaiveTime,
        radius_km: f64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Restaurant>> {
        if is_blank(query) {
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(ForkfulError::cancelled("search cancelled before it started"));
        }

        let timer = Timer::start();
        let ctx = Arc::new(SearchContext::new(lat, lon, query, time, radius_km));
        let tasks: Vec<SearchTask> = CONCURRENT_KINDS.iter().map(|&k| SearchTask::new(k)).collect();
        let handles: Vec<TaskHandle> = tasks
            .iter()
            .map(|task| TaskHandle::new(task.task_id.clone()))
            .collect();

        let (tx, rx) = crossbeam_channel::unbounded();
        for (task, handle) in tasks.into_iter().zip(handles.iter()) {
            let tx = tx.clone();
            let handle = handle.clone();
            let search = self.search.clone();
            let ctx = Arc::clone(&ctx);

            self.thread_pool.spawn(move || {
                let result = Self::execute_single_task(&search, &ctx, task, &handle);
                let _ = tx.send(result);
            });
        }
        drop(tx);

        let gathered = self.gather(&rx, &handles, cancel);
        let (merged, outcome) = match gathered {
            Gathered::Complete(results) => (Self::merge(results), SearchOutcome::Success),
            Gathered::Failed(results, error) => {
                warn!("concurrent search for '{query}' failed: {error}");
                (self.fallback(results), SearchOutcome::Failed)
            }
            Gathered::TimedOut(results) => {
                warn!(
                    "concurrent search for '{query}' timed out after {:?}",
                    self.config.default_timeout
                );
                (self.fallback(results), SearchOutcome::TimedOut)
            }
            Gathered::Cancelled => {
                self.record(timer.elapsed(), SearchOutcome::Cancelled, 0);
                info!("concurrent search for '{query}' cancelled by caller");
                return Err(ForkfulError::cancelled("concurrent search cancelled"));
            }
        };

        let elapsed = timer.stop();
        self.record(elapsed, outcome, merged.len() as u64);
        info!(
            "concurrent search '{query}' returned {} restaurants in {} ms",
            merged.len(),
            elapsed.as_millis()
        );
        Ok(merged)
    }

    /// Wait for every task, the caller's cancellation or the deadline,
    /// whichever comes first.
    fn gather(
        &self,
        rx: &Receiver<TaskResult>,
        handles: &[TaskHandle],
        cancel: &CancellationToken,
    ) -> Gathered {
        let deadline = crossbeam_channel::at(Instant::now() + self.config.default_timeout);
        let cancel_all = || {
            let running = handles
                .iter()
                .filter(|h| h.status() == TaskStatus::Running)
                .count();
            debug!("cancelling {} task(s), {running} still running", handles.len());
            handles.iter().for_each(TaskHandle::cancel);
        };
        let mut results = Vec::with_capacity(handles.len());

        while results.len() < handles.len() {
            select! {
                recv(rx) -> msg => match msg {
                    Ok(result) => {
                        debug!(
                            "task {} finished in {:?} (success: {}, hits: {})",
                            result.task_id,
                            result.execution_time,
                            result.is_success(),
                            result.hit_count()
                        );
                        if cancel.is_cancelled() {
                            cancel_all();
                            return Gathered::Cancelled;
                        }
                        if let Some(error) = result.error.as_ref().filter(|_| !self.config.allow_partial_results) {
                            let error = ForkfulError::other(format!("{} sub-search: {error}", result.kind));
                            cancel_all();
                            return Gathered::Failed(results, error);
                        }
                        results.push(result);
                    }
                    Err(_) => {
                        cancel_all();
                        return Gathered::Failed(results, ForkfulError::thread_pool("search task vanished"));
                    }
                },
                recv(cancel.receiver()) -> _ => {
                    cancel_all();
                    return Gathered::Cancelled;
                }
                recv(deadline) -> _ => {
                    cancel_all();
                    return Gathered::TimedOut(results);
                }
            }
        }

        if results.iter().all(TaskResult::is_success) {
            Gathered::Complete(results)
        } else {
            let error = ForkfulError::other("one or more sub-searches failed");
            Gathered::Failed(results, error)
        }
    }

    fn execute_single_task(
        search: &MultiCriteriaSearch,
        ctx: &SearchContext,
        task: SearchTask,
        handle: &TaskHandle,
    ) -> TaskResult {
        let timer = Timer::start();
        if handle.is_cancelled() {
            handle.set_status(TaskStatus::Cancelled);
            let error = ForkfulError::cancelled(format!("{} cancelled before start", task.kind));
            return TaskResult::failure(task, error, timer.elapsed());
        }

        handle.start();
        let is_cancelled = || handle.is_cancelled();
        match search.run_checked(task.kind, ctx, &is_cancelled) {
            Ok(restaurants) => {
                handle.set_status(TaskStatus::Completed);
                TaskResult::success(task, restaurants, timer.elapsed())
            }
            Err(e) => {
                let status = if e.is_cancelled() {
                    TaskStatus::Cancelled
                } else {
                    TaskStatus::Failed
                };
                handle.set_status(status);
                TaskResult::failure(task, e, timer.elapsed())
            }
        }
    }

    /// Merge successful results in [`CONCURRENT_KINDS`] order.
    fn merge(mut results: Vec<TaskResult>) -> Vec<Restaurant> {
        results.retain(TaskResult::is_success);
        results.sort_by_key(|r| CONCURRENT_KINDS.iter().position(|k| *k == r.kind));
        merge_last_wins(results.into_iter().filter_map(|r| r.restaurants))
    }

    fn fallback(&self, results: Vec<TaskResult>) -> Vec<Restaurant> {
        if self.config.allow_partial_results {
            Self::merge(results)
        } else {
            Vec::new()
        }
    }

    fn record(&self, elapsed: std::time::Duration, outcome: SearchOutcome, hits: u64) {
        if self.config.enable_metrics {
            self.metrics.record_search(elapsed, outcome, hits);
        }
    }

    pub fn metrics(&self) -> SearchMetrics {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}
