//! Configuration for the discovery service.
//!
//! Every section has a `Default` that reproduces the production constants, so
//! a missing config file is never an error. Files are JSON:
//!
//! ```json
//! {
//!   "peak_hours": { "peak_radius_km": 3.0, "normal_radius_km": 5.0 },
//!   "cache": { "geohash_precision": 7, "ttl_seconds": 3600, "codec": "json" }
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ForkfulError, Result};
use crate::geo::geohash::{DEFAULT_PRECISION, MAX_PRECISION};
use crate::parallel_search::ParallelSearchConfig;

/// Longest accepted cache ttl: 30 days.
pub const MAX_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkfulConfig {
    pub peak_hours: PeakHourConfig,
    pub cache: GeoCacheConfig,
    pub parallel: ParallelSearchConfig,
}

impl ForkfulConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: ForkfulConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the search core cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.peak_hours.validate()?;
        self.cache.validate()?;
        self.parallel.validate()
    }
}

/// A half-open-on-both-sides window of the day: `start < t < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "crate::model::time_of_day")]
    pub start: NaiveTime,
    #[serde(with = "crate::model::time_of_day")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        TimeWindow { start, end }
    }

    /// Strictly after `start` and strictly before `end`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time > self.start && time < self.end
    }
}

/// Peak windows and the serving radius used inside and outside of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakHourConfig {
    pub windows: Vec<TimeWindow>,
    pub peak_radius_km: f64,
    pub normal_radius_km: f64,
}

impl Default for PeakHourConfig {
    fn default() -> Self {
        Self {
            windows: vec![
                window((7, 59, 59), (10, 0, 1)),
                window((12, 59, 59), (14, 0, 1)),
                window((18, 59, 59), (21, 0, 1)),
            ],
            peak_radius_km: 3.0,
            normal_radius_km: 5.0,
        }
    }
}

impl PeakHourConfig {
    pub fn validate(&self) -> Result<()> {
        if self.peak_radius_km <= 0.0 || self.normal_radius_km <= 0.0 {
            return Err(ForkfulError::config("serving radius must be positive"));
        }
        if let Some(bad) = self.windows.iter().find(|w| w.start >= w.end) {
            return Err(ForkfulError::config(format!(
                "peak window {} - {} does not end after it starts",
                bad.start, bad.end
            )));
        }
        Ok(())
    }
}

fn window(start: (u32, u32, u32), end: (u32, u32, u32)) -> TimeWindow {
    TimeWindow::new(
        NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap_or(NaiveTime::MIN),
        NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap_or(NaiveTime::MIN),
    )
}

/// Encoding of cached restaurant lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheCodec {
    /// JSON text, readable with any cache client.
    #[default]
    Json,
    /// Compact binary encoding.
    Bincode,
}

/// Geo cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoCacheConfig {
    pub geohash_precision: usize,
    pub ttl_seconds: u64,
    pub codec: CacheCodec,
}

impl Default for GeoCacheConfig {
    fn default() -> Self {
        Self {
            geohash_precision: DEFAULT_PRECISION,
            ttl_seconds: 3600,
            codec: CacheCodec::Json,
        }
    }
}

impl GeoCacheConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PRECISION).contains(&self.geohash_precision) {
            return Err(ForkfulError::config(format!(
                "geohash precision must be between 1 and {MAX_PRECISION}, got {}",
                self.geohash_precision
            )));
        }
        if !(1..=MAX_TTL_SECONDS).contains(&self.ttl_seconds) {
            return Err(ForkfulError::config(format!(
                "cache ttl must be between 1 and {MAX_TTL_SECONDS} seconds, got {}",
                self.ttl_seconds
            )));
        }
        Ok(())
    }
}
