//! Sequential restaurant search: nearby lookups and multi-criteria text search.

pub mod filter;
pub mod merger;
pub mod multi_criteria;
pub mod nearby;

pub use self::filter::{ServingFilter, is_open};
pub use self::merger::{merge_first_occurrence, merge_last_wins};
pub use self::multi_criteria::{MultiCriteriaSearch, SubSearchKind};
pub use self::nearby::GeoSearchEngine;

use chrono::NaiveTime;

use crate::geo::GeoPoint;

/// Inputs shared by every sub-search of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    pub origin: GeoPoint,
    pub query: String,
    pub time: NaiveTime,
    pub radius_km: f64,
}

impl SearchContext {
    pub fn new(lat: f64, lon: f64, query: &str, time: NaiveTime, radius_km: f64) -> Self {
        Self {
            origin: GeoPoint::unchecked(lat, lon),
            query: query.to_string(),
            time,
            radius_km,
        }
    }

    /// Open-and-within-radius predicate for this request.
    pub fn filter(&self) -> ServingFilter {
        ServingFilter::new(self.origin, self.time, self.radius_km)
    }
}
