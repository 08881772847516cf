//! Peak-hour serving radius policy.

use chrono::NaiveTime;

use crate::config::{PeakHourConfig, TimeWindow};

/// Maps a time of day to the serving radius used for "nearby".
#[derive(Debug, Clone)]
pub struct PeakHourPolicy {
    windows: Vec<TimeWindow>,
    peak_radius_km: f64,
    normal_radius_km: f64,
}

impl Default for PeakHourPolicy {
    fn default() -> Self {
        Self::new(&PeakHourConfig::default())
    }
}

impl PeakHourPolicy {
    pub fn new(config: &PeakHourConfig) -> Self {
        Self {
            windows: config.windows.clone(),
            peak_radius_km: config.peak_radius_km,
            normal_radius_km: config.normal_radius_km,
        }
    }

    /// True when `time` falls strictly inside one of the peak windows.
    pub fn is_peak_hour(&self, time: NaiveTime) -> bool {
        self.windows.iter().any(|w| w.contains(time))
    }

    /// Serving radius in kilometers for `time`.
    pub fn serving_radius_km(&self, time: NaiveTime) -> f64 {
        if self.is_peak_hour(time) {
            self.peak_radius_km
        } else {
            self.normal_radius_km
        }
    }
}
