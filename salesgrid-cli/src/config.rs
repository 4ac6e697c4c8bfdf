//! Host configuration: `config.json` plus environment overrides.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use salesgrid_lib::config::GridConfig;
use salesgrid_lib::error::SchemaError;
use salesgrid_lib::model::Column;
use salesgrid_lib::model::EditKind;
use salesgrid_lib::model::FilterKind;
use salesgrid_lib::model::Schema;
use salesgrid_lib::plugins::PaginationConfig;
use serde::Deserialize;
use simplelog::LevelFilter;
use thiserror::Error;

pub const ENV_URL: &str = "SALESGRID_URL";
pub const ENV_TIMEOUT: &str = "SALESGRID_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "SALESGRID_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {key}: {value:?}")]
    Env { key: &'static str, value: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Settings read at startup.
///
/// Every field has a default, so `config.json` may set only what it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API base URL.
    pub base_url: String,
    /// Per-request timeout; `null` disables it.
    pub timeout_secs: Option<u64>,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub page_size: usize,
    pub page_sizes: Vec<usize>,
    pub columns: Vec<Column>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3002/api".to_string(),
            timeout_secs: Some(10),
            log_level: "info".to_string(),
            page_size: 10,
            page_sizes: vec![10, 20, 50, 100],
            columns: default_columns(),
        }
    }
}

/// The sales columns: date, customer, seller and total.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("date", "Date")
            .sortable()
            .filter(FilterKind::Text)
            .edit(EditKind::Date)
            .required(),
        Column::new("customer", "Customer")
            .filter(FilterKind::Text)
            .edit(EditKind::Select)
            .options("customers"),
        Column::new("seller", "Seller")
            .filter(FilterKind::Select)
            .options("sellers")
            .edit(EditKind::Select),
        Column::new("total", "Total")
            .sortable()
            .filter(FilterKind::Range)
            .edit(EditKind::Number),
    ]
}

impl Settings {
    /// Reads `path` if it exists, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overrides fields from `SALESGRID_*` variables found by `lookup`.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_URL) {
            self.base_url = url;
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            let secs = value.trim().parse().map_err(|_| ConfigError::Env {
                key: ENV_TIMEOUT,
                value: value.clone(),
            })?;
            self.timeout_secs = if secs == 0 { None } else { Some(secs) };
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            if LevelFilter::from_str(&level).is_err() {
                return Err(ConfigError::Env {
                    key: ENV_LOG_LEVEL,
                    value: level,
                });
            }
            self.log_level = level;
        }
        Ok(self)
    }

    /// The configured level, falling back to `Info` for unknown names.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn schema(&self) -> Result<Schema, ConfigError> {
        Ok(Schema::from_columns(self.columns.iter().cloned())?)
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig::default().with_pagination(
            PaginationConfig::default()
                .with_default_limit(self.page_size)
                .with_options(self.page_sizes.clone()),
        )
    }
}
