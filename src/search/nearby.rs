//! "Restaurants near me" with a geohash-keyed result cache in front.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveTime;
use log::{debug, info, warn};

use crate::cache::GeoCache;
use crate::catalog::RestaurantCatalog;
use crate::error::Result;
use crate::geo::GeoPoint;
use crate::model::Restaurant;
use crate::search::{ServingFilter, merge_first_occurrence};

/// Computes the open-and-nearby list for a point, consulting [`GeoCache`] first.
#[derive(Clone)]
pub struct GeoSearchEngine {
    catalog: Arc<dyn RestaurantCatalog>,
    cache: GeoCache,
}

impl GeoSearchEngine {
    pub fn new(catalog: Arc<dyn RestaurantCatalog>, cache: GeoCache) -> Self {
        Self { catalog, cache }
    }

    /// Restaurants open at `time` and strictly closer than `radius_km`.
    ///
    /// A cache hit for the point's cell is returned unchanged, whatever
    /// `time` and `radius_km` were used to compute it. On a miss the full
    /// catalog is scanned and the result is written back. Catalog errors are
    /// returned; cache write errors are only logged.
    pub fn find_nearby(
        &self,
        lat: f64,
        lon: f64,
        time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<Restaurant>> {
        let cell = self.cache.cell_for(lat, lon);
        if let Some(cached) = self.cache.get(&cell) {
            return Ok(cached);
        }

        let start = Instant::now();
        let entities = self.catalog.list_all()?;
        let scanned = entities.len();
        let filter = ServingFilter::new(GeoPoint::unchecked(lat, lon), time, radius_km);
        // Entities with distinct storage ids may share a restaurant_id.
        let restaurants = merge_first_occurrence([filter.apply(entities)]);

        if let Err(e) = self.cache.put(&cell, &restaurants) {
            warn!("failed to cache nearby restaurants for cell {cell}: {e}");
        } else {
            debug!("cached {} restaurants under cell {cell}", restaurants.len());
        }

        info!(
            "nearby scan at ({lat}, {lon}) kept {}/{scanned} restaurants within {radius_km} km in {:?}",
            restaurants.len(),
            start.elapsed()
        );
        Ok(restaurants)
    }

    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }
}
