//! Air-Quality Monitoring Service - CLI
//!
//! Queries the synthesis and forecast engines from the command line, or
//! serves them over HTTP:
//! 1. Current readings for every monitored site
//! 2. City-wide summary of a fresh snapshot
//! 3. Hourly history for one device
//! 4. Pollution forecast for the city or a single site
//!
//! Usage:
//!   cargo run -- readings --risk high        # Filtered current snapshot
//!   cargo run -- history charsense_003       # Last 24 hours for one device
//!   cargo run -- forecast --hours 12         # City-wide 12 hour forecast
//!   cargo run -- serve --port 8080           # Start the HTTP endpoint
//!
//! Environment:
//!   AQMON_CONFIG - path to the configuration file (default: aqmon.toml)
//!   RUST_LOG     - log filter (e.g. info, aqmon_service=debug)

use aqmon_service::analysis::groupings::{self, ReadingFilter};
use aqmon_service::config::{self, ServiceConfig};
use aqmon_service::endpoint;
use aqmon_service::error::{AqmonError, Result};
use aqmon_service::service::{AirQualityService, ALL_LOCATIONS};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "aqmon_service", version, about = "Air-quality readings and pollution forecasts")]
struct Cli {
    /// Configuration file (overrides AQMON_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fresh reading for every monitored site
    Readings {
        /// Case-insensitive location name filter
        #[arg(long)]
        search: Option<String>,
        /// Risk level filter (low, moderate, high, hazardous, all)
        #[arg(long)]
        risk: Option<String>,
    },
    /// Summary statistics and risk distribution of a fresh snapshot
    Summary,
    /// Hourly history for one device
    History {
        device_id: String,
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,
    },
    /// Forecast for the whole city or a single device
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,
        #[arg(long, default_value = ALL_LOCATIONS)]
        location: String,
    },
    /// Serve the JSON HTTP endpoint
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config: ServiceConfig = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_config_default()?,
    };
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    let workers = config.workers;
    let mut service = AirQualityService::from_config(config);

    match cli.command {
        Command::Readings { search, risk } => {
            let filter = ReadingFilter::from_query(search.as_deref(), risk.as_deref())
                .map_err(AqmonError::InvalidInput)?;
            let readings = service.current_readings_parallel(workers)?;
            print_json(&groupings::filter_readings(&readings, &filter))
        }
        Command::Summary => {
            let readings = service.current_readings_parallel(workers)?;
            print_json(&serde_json::json!({
                "summary": groupings::summarize(&readings),
                "risk_distribution": groupings::risk_distribution(&readings),
                "mean_pm25_by_type": groupings::mean_pm25_by_type(&readings),
            }))
        }
        Command::History { device_id, hours } => {
            let series = service.history(&device_id, hours)?;
            if series.is_empty() {
                log::warn!("no history for '{}' (not a registered device)", device_id);
            }
            print_json(&series)
        }
        Command::Forecast { hours, location } => {
            print_json(&service.forecast_for(&location, hours)?)
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(service.config().endpoint_port);
            log::info!("monitoring {} locations", service.locations().len());
            endpoint::start_endpoint_server(port, service)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AqmonError::Server(format!("Failed to encode output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
