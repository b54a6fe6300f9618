//! Configuration for model comparison.

use crate::error::LearningError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for a [`ModelComparator`](crate::ModelComparator) run.
///
/// Use [`ComparisonConfig::builder()`] for validated construction.
///
/// # Example
///
/// ```rust,ignore
/// let config = ComparisonConfig::builder()
///     .test_size(0.2)
///     .random_seed(42)
///     .output_dir("data")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Fraction of rows held out for evaluation, in `(0.0, 1.0)`.
    /// Default: 0.2
    pub test_size: f64,

    /// Seed for the split shuffle and every randomized model.
    /// Default: 42
    pub random_seed: u64,

    /// Directory receiving model files, diagnostic plots and the summary CSV.
    /// Default: "data"
    pub output_dir: PathBuf,

    /// Write model files, plots and the summary CSV.
    /// When false, the comparison runs in memory only.
    /// Default: true
    pub save_artifacts: bool,

    /// Trees in the random forest.
    /// Default: 100
    pub n_trees: usize,

    /// Boosting rounds for gradient-boosted trees.
    /// Default: 100
    pub boosting_rounds: usize,

    /// Shrinkage applied to each boosting round.
    /// Default: 0.1
    pub learning_rate: f64,

    /// Depth of each boosted tree.
    /// Default: 3
    pub boosting_max_depth: usize,

    /// Name of the predicted quantity, used in plot labels.
    /// Default: "PTS"
    pub target_label: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_seed: 42,
            output_dir: PathBuf::from("data"),
            save_artifacts: true,
            n_trees: 100,
            boosting_rounds: 100,
            learning_rate: 0.1,
            boosting_max_depth: 3,
            target_label: "PTS".to_string(),
        }
    }
}

impl ComparisonConfig {
    pub fn builder() -> ComparisonConfigBuilder {
        ComparisonConfigBuilder::default()
    }

    /// Check every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] if:
    /// - `test_size` is not in range `(0.0, 1.0)`
    /// - `n_trees` or `boosting_rounds` is 0
    /// - `learning_rate` is not in range `(0.0, 1.0]`
    /// - `boosting_max_depth` is 0
    pub fn validate(&self) -> Result<(), LearningError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(LearningError::InvalidConfig(
                "test_size must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        if self.n_trees == 0 {
            return Err(LearningError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }

        if self.boosting_rounds == 0 {
            return Err(LearningError::InvalidConfig(
                "boosting_rounds must be at least 1".to_string(),
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(LearningError::InvalidConfig(
                "learning_rate must be in (0.0, 1.0]".to_string(),
            ));
        }

        if self.boosting_max_depth == 0 {
            return Err(LearningError::InvalidConfig(
                "boosting_max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ComparisonConfig`].
#[derive(Debug, Default)]
pub struct ComparisonConfigBuilder {
    config: ComparisonConfig,
}

impl ComparisonConfigBuilder {
    /// Fraction of rows held out for evaluation.
    pub fn test_size(mut self, size: f64) -> Self {
        self.config.test_size = size;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Directory for model files, diagnostic plots and the summary CSV.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    pub fn save_artifacts(mut self, save: bool) -> Self {
        self.config.save_artifacts = save;
        self
    }

    pub fn n_trees(mut self, n: usize) -> Self {
        self.config.n_trees = n;
        self
    }

    pub fn boosting_rounds(mut self, rounds: usize) -> Self {
        self.config.boosting_rounds = rounds;
        self
    }

    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.config.learning_rate = rate;
        self
    }

    pub fn boosting_max_depth(mut self, depth: usize) -> Self {
        self.config.boosting_max_depth = depth;
        self
    }

    pub fn target_label(mut self, label: impl Into<String>) -> Self {
        self.config.target_label = label.into();
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ComparisonConfig, LearningError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComparisonConfig::default();
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.n_trees, 100);
        assert!(config.save_artifacts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ComparisonConfig::builder()
            .test_size(0.3)
            .random_seed(7)
            .n_trees(10)
            .save_artifacts(false)
            .build()
            .unwrap();

        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.n_trees, 10);
        assert!(!config.save_artifacts);
    }

    #[test]
    fn test_invalid_test_size() {
        for size in [0.0, 1.0, -0.1, f64::NAN] {
            let result = ComparisonConfig::builder().test_size(size).build();
            assert!(matches!(result, Err(LearningError::InvalidConfig(_))), "size {size}");
        }
    }

    #[test]
    fn test_invalid_model_settings() {
        assert!(ComparisonConfig::builder().n_trees(0).build().is_err());
        assert!(ComparisonConfig::builder().boosting_rounds(0).build().is_err());
        assert!(ComparisonConfig::builder().learning_rate(0.0).build().is_err());
        assert!(ComparisonConfig::builder().boosting_max_depth(0).build().is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ComparisonConfig =
            serde_json::from_str(r#"{ "test_size": 0.25, "output_dir": "artifacts" }"#).unwrap();
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.output_dir, PathBuf::from("artifacts"));
        assert_eq!(config.random_seed, 42);
    }
}
