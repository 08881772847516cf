//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{ForkfulArgs, OutputFormat};
use crate::config::ForkfulConfig;
use crate::error::Result;
use crate::model::Restaurant;

/// Result of `nearby` and `search`.
#[derive(Debug, Serialize)]
pub struct RestaurantListing {
    pub latitude: f64,
    pub longitude: f64,
    pub time: String,
    pub radius_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub concurrent: bool,
    pub total: usize,
    pub duration_ms: u64,
    pub restaurants: Vec<Restaurant>,
}

/// Result of `check-config`.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub source: String,
    pub valid: bool,
    pub config: ForkfulConfig,
}

/// Plain-text rendering for the human output format.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

impl HumanOutput for RestaurantListing {
    fn render_human(&self) -> String {
        let mut out = String::new();
        match &self.query {
            Some(query) => {
                let _ = writeln!(out, "Search Results for \"{query}\":");
            }
            None => {
                let _ = writeln!(out, "Nearby Restaurants:");
            }
        }
        let _ = writeln!(out, "═══════════════════");

        for (i, r) in self.restaurants.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. [{}] {}  ({:.5}, {:.5})  open {}-{}",
                i + 1,
                r.restaurant_id,
                r.name,
                r.latitude,
                r.longitude,
                r.opens_at.format("%H:%M"),
                r.closes_at.format("%H:%M"),
            );
            if !r.attributes.is_empty() {
                let _ = writeln!(out, "     {}", r.attributes.join(", "));
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Total: {}", self.total);
        let _ = writeln!(
            out,
            "At {} within {} km of ({}, {}){}",
            self.time,
            self.radius_km,
            self.latitude,
            self.longitude,
            if self.concurrent { " [concurrent]" } else { "" }
        );
        let _ = writeln!(out, "Search time: {}ms", self.duration_ms);
        out
    }
}

impl HumanOutput for ConfigReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let c = &self.config;
        let _ = writeln!(out, "Configuration: {} (valid)", self.source);
        let _ = writeln!(out, "────────────");
        let _ = writeln!(out, "Peak windows:");
        for w in &c.peak_hours.windows {
            let _ = writeln!(out, "  {} - {}", w.start, w.end);
        }
        let _ = writeln!(
            out,
            "Radius: {} km peak, {} km otherwise",
            c.peak_hours.peak_radius_km, c.peak_hours.normal_radius_km
        );
        let _ = writeln!(
            out,
            "Cache: precision {}, ttl {}s, codec {:?}",
            c.cache.geohash_precision, c.cache.ttl_seconds, c.cache.codec
        );
        let _ = writeln!(
            out,
            "Concurrent search: timeout {:?}, pool {}, partial results {}",
            c.parallel.default_timeout,
            c.parallel.effective_pool_size(),
            c.parallel.allow_partial_results
        );
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(result: &T, args: &ForkfulArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    println!("{}", render(result, args.output_format, args.pretty)?);
    Ok(())
}

/// Render without printing.
pub fn render<T>(result: &T, format: OutputFormat, pretty: bool) -> Result<String>
where
    T: Serialize + HumanOutput,
{
    Ok(match format {
        OutputFormat::Human => result.render_human(),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(result)?,
        OutputFormat::Json => serde_json::to_string(result)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn listing() -> RestaurantListing {
        RestaurantListing {
            latitude: 20.0,
            longitude: 30.0,
            time: "03:00:00".to_string(),
            radius_km: 5.0,
            query: Some("dosa".to_string()),
            concurrent: false,
            total: 1,
            duration_ms: 3,
            restaurants: vec![Restaurant {
                restaurant_id: "11".to_string(),
                name: "Dosa Plaza".to_string(),
                city: "Bengaluru".to_string(),
                image_url: String::new(),
                latitude: 20.027,
                longitude: 30.0,
                opens_at: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                closes_at: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                attributes: vec!["South Indian".to_string()],
            }],
        }
    }

    #[test]
    fn test_human_listing() {
        let text = render(&listing(), OutputFormat::Human, false).unwrap();
        assert!(text.contains("Search Results for \"dosa\""));
        assert!(text.contains("[11] Dosa Plaza"));
        assert!(text.contains("South Indian"));
        assert!(text.contains("Total: 1"));
    }

    #[test]
    fn test_json_listing() {
        let text = render(&listing(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["restaurants"][0]["restaurant_id"], "11");
    }

    #[test]
    fn test_config_report() {
        let report = ConfigReport {
            source: "defaults".to_string(),
            valid: true,
            config: ForkfulConfig::default(),
        };
        let text = render(&report, OutputFormat::Human, false).unwrap();
        assert!(text.contains("Radius: 3 km peak, 5 km otherwise"));
        assert!(render(&report, OutputFormat::Json, true).unwrap().contains("\"valid\": true"));
    }
}
