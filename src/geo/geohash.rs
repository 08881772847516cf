//! Base32 geohash cells used as geo cache keys.
//!
//! A cell at precision 7 covers roughly 153 m x 153 m. Two points close to a
//! cell edge can land in different cells; lookups are not widened to
//! neighbouring cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Precision used for cache keys unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 7;

/// Longest supported hash. 12 characters is sub-centimetre.
pub const MAX_PRECISION: usize = 12;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// A geohash string identifying a rectangular grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeoCell(String);

impl GeoCell {
    /// Encode a point. `precision` is clamped to `1..=MAX_PRECISION`.
    pub fn encode(lat: f64, lon: f64, precision: usize) -> Self {
        let precision = precision.clamp(1, MAX_PRECISION);
        let mut lat_range = (-90.0_f64, 90.0_f64);
        let mut lon_range = (-180.0_f64, 180.0_f64);

        let mut hash = String::with_capacity(precision);
        let mut even_bit = true;
        let mut bit = 0;
        let mut idx = 0usize;

        while hash.len() < precision {
            let (range, value) = if even_bit {
                (&mut lon_range, lon)
            } else {
                (&mut lat_range, lat)
            };
            let mid = (range.0 + range.1) / 2.0;
            idx <<= 1;
            if value >= mid {
                idx |= 1;
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even_bit = !even_bit;

            bit += 1;
            if bit == 5 {
                hash.push(BASE32[idx] as char);
                bit = 0;
                idx = 0;
            }
        }

        GeoCell(hash)
    }

    pub fn precision(&self) -> usize {
        self.0.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeoCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GeoCell {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hashes() {
        assert_eq!(GeoCell::encode(42.6, -5.6, 5).as_str(), "ezs42");
        assert_eq!(
            GeoCell::encode(57.64911, 10.40744, 11).as_str(),
            "u4pruydqqvj"
        );
    }

    #[test]
    fn test_same_point_same_cell() {
        let a = GeoCell::encode(20.0, 30.0, DEFAULT_PRECISION);
        let b = GeoCell::encode(20.0, 30.0, DEFAULT_PRECISION);
        assert_eq!(a, b);
        assert_eq!(a.precision(), 7);
    }

    #[test]
    fn test_precision_is_clamped() {
        assert_eq!(GeoCell::encode(1.0, 1.0, 0).precision(), 1);
        assert_eq!(GeoCell::encode(1.0, 1.0, 40).precision(), MAX_PRECISION);
    }

    #[test]
    fn test_nearby_points_share_a_cell() {
        let a = GeoCell::encode(20.0, 30.0, DEFAULT_PRECISION);
        let b = GeoCell::encode(20.0001, 30.0001, DEFAULT_PRECISION);
        assert_eq!(a, b);
        assert_ne!(a, GeoCell::encode(20.01, 30.0, DEFAULT_PRECISION));
    }
}
