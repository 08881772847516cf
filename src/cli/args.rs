//! Command line argument parsing for the forkful CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Forkful - find open restaurants near you
#[derive(Parser, Debug, Clone)]
#[command(name = "forkful")]
#[command(about = "Find restaurants that are open and nearby, or search them by text")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ForkfulArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, global = true, env = "FORKFUL_CONFIG", value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ForkfulArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List restaurants open now within the serving radius
    Nearby(NearbyArgs),

    /// Search restaurants by name, attribute or menu item
    Search(SearchArgs),

    /// Validate a configuration file and print the effective settings
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),
}

/// Location and time shared by nearby and search.
#[derive(Parser, Debug, Clone)]
pub struct LocationArgs {
    /// Catalog snapshot file (JSON with "restaurants" and "items")
    #[arg(long, value_name = "CATALOG_FILE")]
    pub catalog: PathBuf,

    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Time of day (HH:MM or HH:MM:SS); defaults to the local clock
    #[arg(long, value_name = "TIME")]
    pub time: Option<String>,
}

/// Arguments for nearby lookups
#[derive(Parser, Debug, Clone)]
pub struct NearbyArgs {
    #[command(flatten)]
    pub location: LocationArgs,
}

/// Arguments for text search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Query string
    #[arg(long, value_name = "QUERY")]
    pub query: String,

    /// Run by-name and by-attribute concurrently
    #[arg(long)]
    pub concurrent: bool,
}

/// Arguments for config validation
#[derive(Parser, Debug, Clone)]
pub struct CheckConfigArgs {
    /// Configuration file to check (falls back to --config)
    #[arg(value_name = "CONFIG_FILE")]
    pub file: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_search_command() {
        let args = ForkfulArgs::try_parse_from([
            "forkful",
            "search",
            "--catalog",
            "catalog.json",
            "--lat",
            "12.97",
            "--lon",
            "-77.59",
            "--query",
            "masala dosa",
            "--concurrent",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.location.catalog, PathBuf::from("catalog.json"));
            assert_eq!(search_args.location.lon, -77.59);
            assert_eq!(search_args.query, "masala dosa");
            assert!(search_args.concurrent);
            assert!(search_args.location.time.is_none());
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_nearby_command() {
        let args = ForkfulArgs::try_parse_from([
            "forkful", "nearby", "--catalog", "c.json", "--lat", "20", "--lon", "30", "--time",
            "03:00",
        ])
        .unwrap();

        if let Command::Nearby(nearby_args) = args.command {
            assert_eq!(nearby_args.location.lat, 20.0);
            assert_eq!(nearby_args.location.time.as_deref(), Some("03:00"));
        } else {
            panic!("Expected Nearby command");
        }
    }

    #[test]
    fn test_check_config_command() {
        let args = ForkfulArgs::try_parse_from(["forkful", "check-config", "forkful.json"]).unwrap();
        if let Command::CheckConfig(check_args) = args.command {
            assert_eq!(check_args.file, Some(PathBuf::from("forkful.json")));
        } else {
            panic!("Expected CheckConfig command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = ForkfulArgs::try_parse_from(["forkful", "check-config"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = ForkfulArgs::try_parse_from(["forkful", "-vv", "check-config"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = ForkfulArgs::try_parse_from(["forkful", "--quiet", "check-config"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            ForkfulArgs::try_parse_from(["forkful", "--format", "json", "check-config"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
