//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::AmountPolicy;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Receipt storage configuration.
    #[serde(default)]
    pub receipts: ReceiptsConfig,
    /// Money input handling.
    #[serde(default)]
    pub money: MoneyConfig,
    /// Dashboard presentation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Receipt storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptsConfig {
    /// Local directory holding uploaded receipts.
    #[serde(default = "default_receipts_root")]
    pub root: PathBuf,
    /// Base URL of a read-only mirror consulted when a receipt is missing locally.
    #[serde(default)]
    pub mirror_url: Option<String>,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_receipts_root() -> PathBuf {
    PathBuf::from("./public/comprovantes")
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

impl Default for ReceiptsConfig {
    fn default() -> Self {
        Self {
            root: default_receipts_root(),
            mirror_url: None,
            max_file_size: default_max_file_size(),
        }
    }
}

/// Money input handling.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MoneyConfig {
    /// Policy for non-finite or negative amounts at the input boundary.
    #[serde(default)]
    pub amount_policy: AmountPolicy,
}

/// Dashboard presentation settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DashboardConfig {
    /// Number of monthly buckets shown.
    #[serde(default = "default_upcoming_months")]
    pub upcoming_months: usize,
}

fn default_upcoming_months() -> usize {
    12
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_months: default_upcoming_months(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DIVIDAS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
