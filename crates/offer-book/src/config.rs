//! Offer book configuration
//!
//! Loaded from JSON; every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferBookConfig {
    /// Directory that receives the statistics artifact
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Dump offer statistics after bootstrap and on every offer book change
    #[serde(default)]
    pub dump_statistics: bool,
    /// Delay of the one-off dump scheduled when bootstrap completes
    #[serde(default = "default_statistics_dump_delay")]
    pub statistics_dump_delay_ms: u64,
    /// Artifact name of the statistics dump (written as `<name>.json`)
    #[serde(default = "default_statistics_artifact")]
    pub statistics_artifact: String,
    /// Currencies quoted in `<code>/BTC` markets; all others are fiat
    #[serde(default = "default_crypto_currencies")]
    pub crypto_currencies: Vec<String>,
    /// Enables raw snapshot dumps into timestamped subdirectories
    #[serde(default)]
    pub snapshot_dump_dir: Option<PathBuf>,
    /// Currencies whose market prices are included in snapshot dumps
    #[serde(default = "default_snapshot_dump_currencies")]
    pub snapshot_dump_currencies: Vec<String>,
}

impl Default for OfferBookConfig {
    fn default() -> Self {
        OfferBookConfig {
            storage_dir: default_storage_dir(),
            dump_statistics: false,
            statistics_dump_delay_ms: default_statistics_dump_delay(),
            statistics_artifact: default_statistics_artifact(),
            crypto_currencies: default_crypto_currencies(),
            snapshot_dump_dir: None,
            snapshot_dump_currencies: default_snapshot_dump_currencies(),
        }
    }
}

impl OfferBookConfig {
    pub fn statistics_dump_delay(&self) -> Duration {
        Duration::from_millis(self.statistics_dump_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage_dir must not be empty".into()));
        }
        if self.statistics_artifact.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "statistics_artifact must not be empty".into(),
            ));
        }
        if self
            .snapshot_dump_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid(
                "snapshot_dump_dir must not be empty when set".into(),
            ));
        }
        Ok(())
    }
}

/// Load offer book configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OfferBookConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<OfferBookConfig, ConfigError> {
    let config: OfferBookConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

// Default value functions for serde
fn default_storage_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_statistics_dump_delay() -> u64 {
    1000
}

fn default_statistics_artifact() -> String {
    "offers_statistics".to_string()
}

fn default_crypto_currencies() -> Vec<String> {
    ["XMR", "ETH", "LTC", "BCH", "DASH", "ZEC", "ETC", "DOGE"]
        .iter()
        .map(|code| code.to_string())
        .collect()
}

fn default_snapshot_dump_currencies() -> Vec<String> {
    vec!["USD".to_string(), "XMR".to_string()]
}
