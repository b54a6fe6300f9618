//! Configuration types for season collection and playtime filtering.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic collector setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default season page template. `{year}` is replaced by the season's end year.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.basketball-reference.com/leagues/NBA_{year}_totals.html";

/// Id of the season totals `<table>` element.
pub const DEFAULT_TABLE_ID: &str = "totals_stats";

/// Configuration for the season collector.
///
/// Use [`CollectorConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use courtside_processing::config::CollectorConfig;
///
/// let config = CollectorConfig::builder()
///     .output_dir("data")
///     .timeout_secs(15)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Season page URL with a `{year}` placeholder.
    pub url_template: String,

    /// Id of the statistics table in the season page.
    /// Default: "totals_stats"
    pub table_id: String,

    /// Directory receiving per-season and combined CSV files.
    /// Default: "data"
    pub output_dir: PathBuf,

    /// Request timeout in seconds.
    /// Default: 30
    pub timeout_secs: u64,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            table_id: DEFAULT_TABLE_ID.to_string(),
            output_dir: PathBuf::from("data"),
            timeout_secs: 30,
            user_agent: concat!("courtside/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CollectorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CollectorConfigBuilder {
        CollectorConfigBuilder::default()
    }

    /// URL of the season page for `year`.
    pub fn season_url(&self, year: u16) -> String {
        self.url_template.replace("{year}", &year.to_string())
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.url_template.contains("{year}") {
            return Err(ConfigValidationError::MissingYearPlaceholder(
                self.url_template.clone(),
            ));
        }

        if self.table_id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("table_id".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(self.timeout_secs));
        }

        Ok(())
    }
}

/// Minimum-participation thresholds applied before modeling and charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaytimeFilter {
    /// Minimum total minutes played (`MP`).
    /// Default: 100
    pub min_minutes: f64,

    /// Minimum games played (`G`).
    /// Default: 10
    pub min_games: f64,
}

impl Default for PlaytimeFilter {
    fn default() -> Self {
        Self {
            min_minutes: 100.0,
            min_games: 10.0,
        }
    }
}

impl PlaytimeFilter {
    pub fn new(min_minutes: f64, min_games: f64) -> Self {
        Self {
            min_minutes,
            min_games,
        }
    }

    /// Validate the thresholds and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [("min_minutes", self.min_minutes), ("min_games", self.min_games)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("URL template '{0}' has no {{year}} placeholder")]
    MissingYearPlaceholder(String),

    #[error("Field '{0}' must not be empty")]
    EmptyField(String),

    #[error("Invalid timeout: {0}s (must be at least 1)")]
    InvalidTimeout(u64),

    #[error("Invalid threshold for '{field}': {value} (must be a non-negative number)")]
    InvalidThreshold { field: String, value: f64 },
}

impl From<ConfigValidationError> for crate::error::ProcessingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProcessingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CollectorConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CollectorConfigBuilder {
    url_template: Option<String>,
    table_id: Option<String>,
    output_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl CollectorConfigBuilder {
    /// Set the season page template. Must contain `{year}`.
    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }

    /// Set the id of the statistics table.
    pub fn table_id(mut self, id: impl Into<String>) -> Self {
        self.table_id = Some(id.into());
        self
    }

    /// Set the output directory for season CSV files.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CollectorConfig` or an error if validation fails.
    pub fn build(self) -> Result<CollectorConfig, ConfigValidationError> {
        let defaults = CollectorConfig::default();
        let config = CollectorConfig {
            url_template: self.url_template.unwrap_or(defaults.url_template),
            table_id: self.table_id.unwrap_or(defaults.table_id),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}
