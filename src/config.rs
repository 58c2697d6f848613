/// Service configuration loader - parses aqmon.toml
///
/// Separates tunables (default horizons, endpoint port, RNG seed) from
/// code so they can be adjusted without recompiling the service. The
/// location registry itself stays compiled in.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "aqmon.toml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV_VAR: &str = "AQMON_CONFIG";

/// Service settings loaded from aqmon.toml.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Hours of history returned when a caller does not ask for a window.
    pub default_history_hours: i64,

    /// Forecast horizon used when a caller does not ask for one.
    pub default_forecast_hours: i64,

    /// Largest history/forecast window a caller may request.
    pub max_hours: i64,

    /// Port for the HTTP query endpoint.
    pub endpoint_port: u16,

    /// Worker threads used for parallel snapshot synthesis.
    pub workers: usize,

    /// Fixed seed for reproducible output. Entropy-seeded when absent.
    pub rng_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_history_hours: 24,
            default_forecast_hours: 6,
            max_hours: 168,
            endpoint_port: 8080,
            workers: 4,
            rng_seed: None,
        }
    }
}

/// Loads configuration from an explicit path. A missing or malformed file
/// is an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Resolves the configuration path: `AQMON_CONFIG` if set, otherwise
/// `aqmon.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads configuration from the resolved default path, falling back to
/// built-in defaults when the file does not exist.
pub fn load_config_default() -> Result<ServiceConfig> {
    let path = config_path();
    if !path.exists() {
        log::info!("{} not found, using default configuration", path.display());
        return Ok(ServiceConfig::default());
    }
    load_config(&path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
