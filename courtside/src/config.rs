//! Configuration for a full pipeline run.

use crate::error::{PipelineError, Result};
use courtside_learning::ComparisonConfig;
use courtside_processing::PlaytimeFilter;
use courtside_processing::collector::COMBINED_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const SUMMARY_FILE_NAME: &str = "pipeline_summary.json";

/// Paths and parameters of a [`Pipeline`](crate::Pipeline) run.
///
/// Every field has a default, so a partial JSON file is enough:
///
/// ```json
/// { "data_file": "data/nba_combined_totals_cleaned.csv", "test_size": 0.25 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Combined, cleaned multi-season totals.
    /// Default: "data/nba_combined_totals_cleaned.csv"
    pub data_file: PathBuf,

    /// Directory for the ranked bar charts.
    /// Default: "data/plots"
    pub plots_dir: PathBuf,

    /// Output PDF.
    /// Default: "data/nba_pipeline_report.pdf"
    pub report_path: PathBuf,

    /// Directory for model files, diagnostic plots and summaries.
    /// Default: "data"
    pub output_dir: PathBuf,

    /// Log file, truncated each run. `None` logs to stderr only.
    /// Default: "data/pipeline.log"
    pub log_file: Option<PathBuf>,

    /// Minimum minutes and games for modeling and charts.
    pub playtime: PlaytimeFilter,

    /// Held-out fraction for model evaluation.
    /// Default: 0.2
    pub test_size: f64,

    /// Seed for the split and the forest.
    /// Default: 42
    pub random_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
        Self {
            data_file: output_dir.join(COMBINED_FILE_NAME),
            plots_dir: output_dir.join("plots"),
            report_path: output_dir.join("nba_pipeline_report.pdf"),
            log_file: Some(output_dir.join("pipeline.log")),
            output_dir,
            playtime: PlaytimeFilter::default(),
            test_size: 0.2,
            random_seed: 42,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("reading {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.playtime.validate()?;
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::Config(format!(
                "test_size must be between 0.0 and 1.0 (exclusive), got {}",
                self.test_size
            )));
        }
        for (field, path) in [
            ("data_file", &self.data_file),
            ("plots_dir", &self.plots_dir),
            ("report_path", &self.report_path),
            ("output_dir", &self.output_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(PipelineError::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }

    /// Settings for the model comparison stage.
    pub fn comparison_config(&self) -> Result<ComparisonConfig> {
        Ok(ComparisonConfig::builder()
            .test_size(self.test_size)
            .random_seed(self.random_seed)
            .output_dir(&self.output_dir)
            .build()?)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE_NAME)
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    pub fn plots_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.plots_dir = path.into();
        self
    }

    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.report_path = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    pub fn log_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.log_file = path;
        self
    }

    pub fn playtime(mut self, min_minutes: f64, min_games: f64) -> Self {
        self.config.playtime = PlaytimeFilter::new(min_minutes, min_games);
        self
    }

    pub fn test_size(mut self, size: f64) -> Self {
        self.config.test_size = size;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.data_file, PathBuf::from("data/nba_combined_totals_cleaned.csv"));
        assert_eq!(config.plots_dir, PathBuf::from("data/plots"));
        assert_eq!(config.report_path, PathBuf::from("data/nba_pipeline_report.pdf"));
        assert_eq!(config.log_file, Some(PathBuf::from("data/pipeline.log")));
        assert_eq!(config.summary_path(), PathBuf::from("data/pipeline_summary.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validates() {
        assert!(PipelineConfig::builder().test_size(1.5).build().is_err());
        assert!(PipelineConfig::builder().playtime(-1.0, 10.0).build().is_err());
        assert!(PipelineConfig::builder().data_file("").build().is_err());
    }

    #[test]
    fn test_comparison_config_carries_split() {
        let config = PipelineConfig::builder()
            .test_size(0.3)
            .random_seed(9)
            .output_dir("artifacts")
            .build()
            .unwrap();
        let comparison = config.comparison_config().unwrap();
        assert_eq!(comparison.test_size, 0.3);
        assert_eq!(comparison.random_seed, 9);
        assert_eq!(comparison.output_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_from_partial_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, r#"{ "test_size": 0.25, "playtime": { "min_games": 20 } }"#).unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();

        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.playtime.min_games, 20.0);
        assert_eq!(config.playtime.min_minutes, 100.0);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn test_from_json_file_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, r#"{ "test_size": 0.0 }"#).unwrap();

        let err = PipelineConfig::from_json_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_from_missing_json_file() {
        let err = PipelineConfig::from_json_file(Path::new("/nonexistent/pipeline.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
