//! Restaurant lists cached per geohash cell.

use std::sync::Arc;

use log::{debug, warn};

use crate::cache::CacheStore;
use crate::config::{CacheCodec, GeoCacheConfig};
use crate::error::Result;
use crate::geo::GeoCell;
use crate::model::Restaurant;

/// Typed, fail-open view over a [`CacheStore`].
///
/// A hit is returned exactly as stored: entries are not re-filtered against
/// the caller's time or radius, so a list computed at 03:00 with a 5 km
/// radius is served unchanged to a 19:00 caller in the same cell until the
/// store expires it.
#[derive(Debug, Clone)]
pub struct GeoCache {
    store: Arc<dyn CacheStore>,
    config: GeoCacheConfig,
}

impl GeoCache {
    pub fn new(store: Arc<dyn CacheStore>, config: GeoCacheConfig) -> Self {
        Self { store, config }
    }

    /// The cell a point maps to at the configured precision.
    pub fn cell_for(&self, lat: f64, lon: f64) -> GeoCell {
        GeoCell::encode(lat, lon, self.config.geohash_precision)
    }

    /// Cached list for `cell`. Store errors and undecodable payloads count as a miss.
    pub fn get(&self, cell: &GeoCell) -> Option<Vec<Restaurant>> {
        let bytes = match self.store.get(cell.as_str()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("geo cache miss for cell {cell}");
                return None;
            }
            Err(e) => {
                warn!("geo cache read failed for cell {cell}, treating as miss: {e}");
                return None;
            }
        };

        match self.decode(&bytes) {
            Ok(restaurants) => {
                debug!(
                    "geo cache hit for cell {cell} ({} restaurants)",
                    restaurants.len()
                );
                Some(restaurants)
            }
            Err(e) => {
                warn!("discarding undecodable geo cache entry for cell {cell}: {e}");
                None
            }
        }
    }

    /// Store `restaurants` under `cell`, replacing any previous entry.
    pub fn put(&self, cell: &GeoCell, restaurants: &[Restaurant]) -> Result<()> {
        let bytes = self.encode(restaurants)?;
        self.store
            .set(cell.as_str(), &bytes, self.config.ttl_seconds)
    }

    /// Whether the store holds a live entry for `cell`.
    pub fn contains(&self, cell: &GeoCell) -> bool {
        self.store.exists(cell.as_str()).unwrap_or(false)
    }

    pub fn config(&self) -> &GeoCacheConfig {
        &self.config
    }

    fn encode(&self, restaurants: &[Restaurant]) -> Result<Vec<u8>> {
        match self.config.codec {
            CacheCodec::Json => Ok(serde_json::to_vec(restaurants)?),
            CacheCodec::Bincode => Ok(bincode::serialize(restaurants)?),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Restaurant>> {
        match self.config.codec {
            CacheCodec::Json => Ok(serde_json::from_slice(bytes)?),
            CacheCodec::Bincode => Ok(bincode::deserialize(bytes)?),
        }
    }
}
