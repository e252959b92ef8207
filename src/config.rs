//! Configuration for the reference-data store.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::service::validate::DEFAULT_MIN_YEAR;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "f1-reference-data")
        .map(|dirs| dirs.data_dir().join("f1data.sqlite"))
        .unwrap_or_else(|| PathBuf::from("f1data.sqlite"))
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Directory holding the JSON fixtures
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Seed before answering queries
    #[serde(default = "default_on_startup")]
    pub on_startup: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Data")
}

fn default_on_startup() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            on_startup: default_on_startup(),
        }
    }
}

/// Input validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_year")]
    pub min_year: i32,
}

fn default_min_year() -> i32 {
    DEFAULT_MIN_YEAR
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "f1_reference_data=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the environment.
    ///
    /// Without an explicit file, `f1data.{toml,json,yaml}` in the working
    /// directory is used when present.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let file_source = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("f1data").required(false),
        };

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(file_source)
            // Override with environment variables (F1DATA_DATABASE__PATH, etc.)
            .add_source(
                config::Environment::with_prefix("F1DATA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
