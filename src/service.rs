//! Entry surface of the discovery service.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveTime;
use log::debug;

use crate::cache::{CacheStore, GeoCache, MemoryCacheStore};
use crate::catalog::{MenuCatalog, RestaurantCatalog};
use crate::clock::{Clock, SystemClock};
use crate::config::ForkfulConfig;
use crate::error::{ForkfulError, Result};
use crate::model::{SearchRequest, SearchResult};
use crate::parallel_search::{CancellationToken, ConcurrentSearchOrchestrator, SearchMetrics};
use crate::policy::PeakHourPolicy;
use crate::search::{GeoSearchEngine, MultiCriteriaSearch};

/// Resolves the evaluation time and serving radius for a request, then
/// delegates to the nearby engine, the sequential search or the concurrent
/// orchestrator.
pub struct RestaurantService {
    policy: PeakHourPolicy,
    clock: Arc<dyn Clock>,
    nearby: GeoSearchEngine,
    search: MultiCriteriaSearch,
    orchestrator: Arc<ConcurrentSearchOrchestrator>,
}

impl fmt::Debug for RestaurantService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestaurantService")
            .field("policy", &self.policy)
            .field("cache", self.nearby.cache())
            .field("pool_size", &self.orchestrator.pool_size())
            .finish()
    }
}

impl RestaurantService {
    pub fn builder() -> RestaurantServiceBuilder {
        RestaurantServiceBuilder::default()
    }

    /// Restaurants open now and within the serving radius of the request point.
    pub fn find_nearby(&self, request: &SearchRequest) -> Result<SearchResult> {
        request.validate()?;
        let (time, radius_km) = self.resolve(request);
        self.nearby
            .find_nearby(request.latitude, request.longitude, time, radius_km)
            .map(SearchResult::new)
    }

    /// Four-way text search, run sequentially.
    pub fn find_by_search_query(&self, request: &SearchRequest) -> Result<SearchResult> {
        request.validate()?;
        let (time, radius_km) = self.resolve(request);
        self.search
            .search(request.latitude, request.longitude, request.query(), time, radius_km)
            .map(SearchResult::new)
    }

    /// By-name and by-attribute search, run concurrently.
    pub fn find_by_search_query_concurrent(&self, request: &SearchRequest) -> Result<SearchResult> {
        self.find_by_search_query_concurrent_with_cancel(request, &CancellationToken::new())
    }

    pub fn find_by_search_query_concurrent_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResult> {
        request.validate()?;
        let (time, radius_km) = self.resolve(request);
        self.orchestrator
            .search_concurrently_with_cancel(
                request.latitude,
                request.longitude,
                request.query(),
                time,
                radius_km,
                cancel,
            )
            .map(SearchResult::new)
    }

    /// Concurrent search for async callers.
    ///
    /// The blocking wait runs on tokio's blocking pool. Dropping the returned
    /// future before it resolves cancels the sub-searches.
    pub async fn find_by_search_query_async(&self, request: SearchRequest) -> Result<SearchResult> {
        request.validate()?;
        let (time, radius_km) = self.resolve(&request);
        let token = CancellationToken::new();
        let _guard = CancelOnDrop(token.clone());
        let orchestrator = Arc::clone(&self.orchestrator);

        tokio::task::spawn_blocking(move || {
            orchestrator.search_concurrently_with_cancel(
                request.latitude,
                request.longitude,
                request.query(),
                time,
                radius_km,
                &token,
            )
        })
        .await
        .map_err(|e| ForkfulError::thread_pool(format!("search task aborted: {e}")))?
        .map(SearchResult::new)
    }

    pub fn policy(&self) -> &PeakHourPolicy {
        &self.policy
    }

    pub fn metrics(&self) -> SearchMetrics {
        self.orchestrator.metrics()
    }

    fn resolve(&self, request: &SearchRequest) -> (NaiveTime, f64) {
        let time = request.current_time.unwrap_or_else(|| self.clock.now());
        let radius_km = self.policy.serving_radius_km(time);
        debug!(
            "request at ({}, {}) evaluated at {time} with radius {radius_km} km",
            request.latitude, request.longitude
        );
        (time, radius_km)
    }
}

struct CancelOnDrop(CancellationToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Assembles a [`RestaurantService`] from injected collaborators.
///
/// Catalogs are required. The cache store defaults to an in-process
/// [`MemoryCacheStore`] and the clock to [`SystemClock`].
#[derive(Default)]
pub struct RestaurantServiceBuilder {
    restaurants: Option<Arc<dyn RestaurantCatalog>>,
    menus: Option<Arc<dyn MenuCatalog>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: ForkfulConfig,
}

impl RestaurantServiceBuilder {
    pub fn restaurant_catalog(mut self, catalog: Arc<dyn RestaurantCatalog>) -> Self {
        self.restaurants = Some(catalog);
        self
    }

    pub fn menu_catalog(mut self, catalog: Arc<dyn MenuCatalog>) -> Self {
        self.menus = Some(catalog);
        self
    }

    /// Use one value for both catalogs.
    pub fn catalog<C>(self, catalog: Arc<C>) -> Self
    where
        C: RestaurantCatalog + MenuCatalog + 'static,
    {
        self.restaurant_catalog(catalog.clone()).menu_catalog(catalog)
    }

    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: ForkfulConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<RestaurantService> {
        self.config.validate()?;
        let restaurants = self
            .restaurants
            .ok_or_else(|| ForkfulError::config("a restaurant catalog is required"))?;
        let menus = self
            .menus
            .ok_or_else(|| ForkfulError::config("a menu catalog is required"))?;
        let store = self
            .cache_store
            .unwrap_or_else(|| Arc::new(MemoryCacheStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let cache = GeoCache::new(store, self.config.cache.clone());
        let search = MultiCriteriaSearch::new(Arc::clone(&restaurants), menus);
        let orchestrator = ConcurrentSearchOrchestrator::new(search.clone(), self.config.parallel.clone())?;

        Ok(RestaurantService {
            policy: PeakHourPolicy::new(&self.config.peak_hours),
            clock,
            nearby: GeoSearchEngine::new(restaurants, cache),
            search,
            orchestrator: Arc::new(orchestrator),
        })
    }
}
