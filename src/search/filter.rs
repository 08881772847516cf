//! Open-now and within-radius filtering.

use chrono::NaiveTime;

use crate::geo::GeoPoint;
use crate::model::{Restaurant, RestaurantEntity};

/// Strictly after opening and strictly before closing.
///
/// Hours spanning midnight (closing earlier in the day than opening) are not
/// supported and never match.
pub fn is_open(time: NaiveTime, opens_at: NaiveTime, closes_at: NaiveTime) -> bool {
    time > opens_at && time < closes_at
}

/// Keeps restaurants that are open at `time` and closer than `radius_km`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServingFilter {
    origin: GeoPoint,
    time: NaiveTime,
    radius_km: f64,
}

impl ServingFilter {
    pub fn new(origin: GeoPoint, time: NaiveTime, radius_km: f64) -> Self {
        Self {
            origin,
            time,
            radius_km,
        }
    }

    pub fn accepts(&self, entity: &RestaurantEntity) -> bool {
        is_open(self.time, entity.opens_at, entity.closes_at)
            && self.origin.distance_to(&entity.location()) < self.radius_km
    }

    /// Filter and map to DTOs, keeping input order.
    pub fn apply(&self, entities: Vec<RestaurantEntity>) -> Vec<Restaurant> {
        entities
            .into_iter()
            .filter(|e| self.accepts(e))
            .map(Restaurant::from)
            .collect()
    }
}
