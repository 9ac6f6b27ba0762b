//! Ledger Configuration Settings
//!
//! Layered configuration: an optional file source overlaid by `LEDGER_*`
//! environment variables, deserialized into typed settings with defaults.

use serde::Deserialize;

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log filter directive, e.g. `info` or `investment_ledger=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings for the demo wiring in `main`.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoSettings {
    /// Pool id to seed.
    #[serde(default = "default_pool_id")]
    pub pool_id: String,
    /// Payment asset id to seed.
    #[serde(default = "default_asset_id")]
    pub asset_id: String,
    /// Atom precision of the seeded asset.
    #[serde(default = "default_decimals")]
    pub asset_decimals: u8,
    /// Atom precision of the seeded pool.
    #[serde(default = "default_decimals")]
    pub pool_decimals: u8,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            pool_id: default_pool_id(),
            asset_id: default_asset_id(),
            asset_decimals: default_decimals(),
            pool_decimals: default_decimals(),
        }
    }
}

fn default_pool_id() -> String {
    "pool-1".to_string()
}

fn default_asset_id() -> String {
    "usdc".to_string()
}

const fn default_decimals() -> u8 {
    6
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Demo wiring settings.
    #[serde(default)]
    pub demo: DemoSettings,
}

impl Settings {
    /// Load settings from an optional config file overlaid by `LEDGER_*`
    /// environment variables (e.g. `LEDGER_LOGGING__LEVEL=debug`).
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or deserialize.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path.unwrap_or("config")).required(false))
            .add_source(config::Environment::with_prefix("LEDGER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
