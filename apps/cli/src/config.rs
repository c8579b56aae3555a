//! # Configuration
//!
//! Shop settings and database location, loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CIRRUS_*`)
//! 2. Config file (`--config PATH`, else `cirrus.toml` in the platform
//!    config directory when it exists)
//! 3. Defaults (`ShopSettings::default()`, database in the data directory)
//!
//! ## Example `cirrus.toml`
//! ```toml
//! database_path = "/var/lib/cirrus/cirrus.db"
//!
//! [shop]
//! company_name = "Cirrus Trading Cards"
//! invoice_prefix = "INV-"
//!
//! [shop.pricing]
//! discount_threshold = "100.00"
//! discount_rate_bps = 1000
//! tax_rate_bps = 1500
//! ```
//!
//! Configuration is read-only after loading.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cirrus_core::validation::validate_rate_bps;
use cirrus_core::{Money, ShopSettings, ValidationError};

pub const CONFIG_FILE_NAME: &str = "cirrus.toml";
pub const DATABASE_FILE_NAME: &str = "cirrus.db";

pub const ENV_DB_PATH: &str = "CIRRUS_DB_PATH";
pub const ENV_COMPANY_NAME: &str = "CIRRUS_COMPANY_NAME";
pub const ENV_INVOICE_PREFIX: &str = "CIRRUS_INVOICE_PREFIX";
pub const ENV_TAX_RATE: &str = "CIRRUS_TAX_RATE";
pub const ENV_DISCOUNT_RATE: &str = "CIRRUS_DISCOUNT_RATE";
pub const ENV_DISCOUNT_THRESHOLD: &str = "CIRRUS_DISCOUNT_THRESHOLD";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {} is not valid TOML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error("{name}='{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Could not determine the application data directory")]
    NoDataDir,

    #[error("Could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file; the platform data directory when unset.
    pub database_path: Option<PathBuf>,

    pub shop: ShopSettings,
}

impl AppConfig {
    /// Loads configuration from file and environment, then validates it.
    ///
    /// An explicit `path` must exist; the default config file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => AppConfig::from_file(path)?,
            None => match default_config_file() {
                Some(path) if path.is_file() => AppConfig::from_file(&path)?,
                _ => AppConfig::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Applies `CIRRUS_*` overrides, reading variables through `lookup`.
    ///
    /// ## Environment Variables
    /// - `CIRRUS_DB_PATH`: database file
    /// - `CIRRUS_COMPANY_NAME`, `CIRRUS_INVOICE_PREFIX`
    /// - `CIRRUS_TAX_RATE`, `CIRRUS_DISCOUNT_RATE`: percentages (e.g. "15", "8.25")
    /// - `CIRRUS_DISCOUNT_THRESHOLD`: amount (e.g. "100.00")
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup(ENV_COMPANY_NAME) {
            self.shop.company_name = name;
        }

        if let Some(prefix) = lookup(ENV_INVOICE_PREFIX) {
            self.shop.invoice_prefix = prefix;
        }

        if let Some(raw) = lookup(ENV_TAX_RATE) {
            self.shop.pricing.tax_rate_bps = percent_to_bps(ENV_TAX_RATE, &raw)?;
        }

        if let Some(raw) = lookup(ENV_DISCOUNT_RATE) {
            self.shop.pricing.discount_rate_bps = percent_to_bps(ENV_DISCOUNT_RATE, &raw)?;
        }

        if let Some(raw) = lookup(ENV_DISCOUNT_THRESHOLD) {
            self.shop.pricing.discount_threshold =
                Money::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                    name: ENV_DISCOUNT_THRESHOLD,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }

    /// Checks rates and the invoice prefix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pricing = &self.shop.pricing;
        validate_rate_bps("tax_rate_bps", pricing.tax_rate_bps)?;
        validate_rate_bps("discount_rate_bps", pricing.discount_rate_bps)?;

        if pricing.discount_threshold.is_negative() {
            return Err(ValidationError::MustBePositive {
                field: "discount_threshold".to_string(),
            }
            .into());
        }

        if self.shop.invoice_prefix.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "invoice_prefix".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// The database file to open, creating the default data directory
    /// if needed.
    ///
    /// ## Platform-Specific Default
    /// - **Linux**: `~/.local/share/cirrus/cirrus.db`
    /// - **macOS**: `~/Library/Application Support/com.cirrus.cirrus/cirrus.db`
    /// - **Windows**: `%APPDATA%\cirrus\cirrus\data\cirrus.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::CreateDir {
            path: data_dir.to_path_buf(),
            source,
        })?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "cirrus", "cirrus")
}

/// `cirrus.toml` in the platform config directory.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Converts a percentage such as "8.25" (or "8.25%") to basis points.
fn percent_to_bps(name: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let percent = Decimal::from_str(raw.trim().trim_end_matches('%').trim())
        .map_err(|_| invalid("not a number"))?;

    (percent * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .ok_or_else(|| invalid("must be a percentage between 0 and 100"))
}
