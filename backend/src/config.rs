//! Configuration management for the weather forecast server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WF_ prefix

use chrono::NaiveDate;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{DateRange, GeoPoint, DEFAULT_ALPHA, DEFAULT_HISTORY_DAYS};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Location the forecast is made for
    pub location: LocationConfig,

    /// Historical period used for training
    pub period: PeriodConfig,

    /// Regression settings
    pub model: ModelConfig,

    /// Meteostat API configuration
    pub meteostat: MeteostatConfig,

    /// Raw data persistence
    pub storage: StorageConfig,

    /// Chart output
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PeriodConfig {
    /// First day to fetch (inclusive)
    pub start: NaiveDate,

    /// Last day to fetch (inclusive)
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Ridge regularisation strength
    pub alpha: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MeteostatConfig {
    /// Meteostat API endpoint
    pub api_endpoint: String,

    /// Meteostat API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory receiving the timestamped CSV files
    pub output_dir: String,

    /// Write the fetched series to disk and re-read it before modeling
    pub persist_raw: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    /// Directory served under /static, holds the chart
    pub static_dir: String,

    /// Number of observed days drawn before the prediction
    pub history_days: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WF_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("location.latitude", 55.7558)?
            .set_default("location.longitude", 37.6173)?
            .set_default("period.start", "2021-05-27")?
            .set_default("period.end", "2024-05-29")?
            .set_default("model.alpha", DEFAULT_ALPHA)?
            .set_default("meteostat.api_endpoint", "https://meteostat.p.rapidapi.com")?
            .set_default("meteostat.api_key", "")?
            .set_default("storage.output_dir", ".")?
            .set_default("storage.persist_raw", true)?
            .set_default("chart.static_dir", "static")?
            .set_default("chart.history_days", DEFAULT_HISTORY_DAYS as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WF_ prefix)
            .add_source(
                Environment::with_prefix("WF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.location.latitude, self.location.longitude)
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.period.start, self.period.end)
    }
}
