//! Command implementations for the forkful CLI.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::catalog::InMemoryCatalog;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::clock::{Clock, SystemClock};
use crate::config::ForkfulConfig;
use crate::error::{ForkfulError, Result};
use crate::model::{SearchRequest, SearchResult, parse_time_of_day};
use crate::service::RestaurantService;

/// Execute a CLI command.
pub fn execute_command(args: ForkfulArgs) -> Result<()> {
    match &args.command {
        Command::Nearby(nearby_args) => nearby(nearby_args, &args),
        Command::Search(search_args) => search(search_args, &args),
        Command::CheckConfig(check_args) => check_config(check_args, &args),
    }
}

/// Load the config named on the command line, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ForkfulConfig> {
    match path {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            ForkfulConfig::from_file(path)
        }
        None => Ok(ForkfulConfig::default()),
    }
}

fn nearby(args: &NearbyArgs, cli_args: &ForkfulArgs) -> Result<()> {
    let (service, request) = prepare(&args.location, None, cli_args)?;

    let start = Instant::now();
    let result = service.find_nearby(&request)?;
    let listing = listing(&service, &request, None, false, result, start);
    output_result(&listing, cli_args)
}

fn search(args: &SearchArgs, cli_args: &ForkfulArgs) -> Result<()> {
    let (service, request) = prepare(&args.location, Some(&args.query), cli_args)?;

    let start = Instant::now();
    let result = if args.concurrent {
        service.find_by_search_query_concurrent(&request)?
    } else {
        service.find_by_search_query(&request)?
    };
    let listing = listing(
        &service,
        &request,
        Some(args.query.clone()),
        args.concurrent,
        result,
        start,
    );
    output_result(&listing, cli_args)
}

fn check_config(args: &CheckConfigArgs, cli_args: &ForkfulArgs) -> Result<()> {
    let path = args.file.as_deref().or(cli_args.config.as_deref());
    let config = load_config(path)?;
    let report = ConfigReport {
        source: path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
        valid: true,
        config,
    };
    output_result(&report, cli_args)
}

/// Build the service over a catalog snapshot and pin the request time.
fn prepare(
    location: &LocationArgs,
    query: Option<&str>,
    cli_args: &ForkfulArgs,
) -> Result<(RestaurantService, SearchRequest)> {
    let config = load_config(cli_args.config.as_deref())?;
    let catalog = InMemoryCatalog::from_file(&location.catalog).map_err(|e| {
        ForkfulError::catalog(format!(
            "failed to load catalog {}: {e}",
            location.catalog.display()
        ))
    })?;
    info!(
        "catalog loaded: {} restaurants, {} menu items",
        catalog.restaurant_count(),
        catalog.item_count()
    );

    let time = match &location.time {
        Some(raw) => parse_time_of_day(raw)?,
        None => SystemClock.now(),
    };

    let service = RestaurantService::builder()
        .catalog(Arc::new(catalog))
        .config(config)
        .build()?;

    let mut request = SearchRequest::new(location.lat, location.lon).at(time);
    if let Some(query) = query {
        request = request.with_search_for(query);
    }
    Ok((service, request))
}

fn listing(
    service: &RestaurantService,
    request: &SearchRequest,
    query: Option<String>,
    concurrent: bool,
    result: SearchResult,
    start: Instant,
) -> RestaurantListing {
    let time = request.current_time.unwrap_or_else(|| SystemClock.now());
    RestaurantListing {
        latitude: request.latitude,
        longitude: request.longitude,
        time: time.format("%H:%M:%S").to_string(),
        radius_km: service.policy().serving_radius_km(time),
        query,
        concurrent,
        total: result.len(),
        duration_ms: millis(start.elapsed()),
        restaurants: result.restaurants,
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(42)), 42);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    use clap::Parser;
    use std::fs;

    const CATALOG: &str = r#"{
        "restaurants": [
            {"restaurant_id": "11", "name": "Udupi Grand", "latitude": 20.027, "longitude": 30.0,
             "opens_at": "00:00", "closes_at": "23:00", "attributes": ["South Indian"]},
            {"restaurant_id": "12", "name": "Far Diner", "latitude": 20.1, "longitude": 30.0,
             "opens_at": "00:00", "closes_at": "23:00"}
        ],
        "items": []
    }"#;

    #[test]
    fn test_nearby_and_search_run() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        fs::write(&catalog, CATALOG).unwrap();
        let catalog = catalog.to_string_lossy().to_string();

        let args = ForkfulArgs::try_parse_from([
            "forkful", "-q", "-f", "json", "nearby", "--catalog", &catalog, "--lat", "20",
            "--lon", "30", "--time", "03:00",
        ])
        .unwrap();
        execute_command(args).unwrap();

        let args = ForkfulArgs::try_parse_from([
            "forkful", "-q", "search", "--catalog", &catalog, "--lat", "20", "--lon", "30",
            "--time", "03:00", "--query", "Udupi", "--concurrent",
        ])
        .unwrap();
        execute_command(args).unwrap();
    }

    #[test]
    fn test_missing_catalog_is_a_catalog_error() {
        let args = ForkfulArgs::try_parse_from([
            "forkful", "nearby", "--catalog", "/no/such/catalog.json", "--lat", "20", "--lon",
            "30",
        ])
        .unwrap();
        assert!(execute_command(args).unwrap_err().is_catalog());
    }

    #[test]
    fn test_check_config() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"cache": {"geohash_precision": 6}}"#).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"cache": {"geohash_precision": 40}}"#).unwrap();

        let args =
            ForkfulArgs::try_parse_from(["forkful", "check-config", good.to_str().unwrap()]).unwrap();
        execute_command(args).unwrap();

        let args =
            ForkfulArgs::try_parse_from(["forkful", "check-config", bad.to_str().unwrap()]).unwrap();
        assert!(matches!(
            execute_command(args).unwrap_err(),
            ForkfulError::Config(_)
        ));
    }
}
