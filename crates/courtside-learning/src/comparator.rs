//! Fit every registered model on the same split and compare them.
//!
//! # Example
//!
//! ```rust,ignore
//! use courtside_learning::{ComparisonConfig, Dataset, ModelComparator, split};
//!
//! let dataset = Dataset::from_frame(&prepared.features, &prepared.target)?;
//! let data = split(&dataset, 0.2, 42)?;
//!
//! let comparator = ModelComparator::builder()
//!     .config(ComparisonConfig::default())
//!     .on_progress(|u| println!("{:.0}% {}", u.progress * 100.0, u.message))
//!     .build()?;
//!
//! let table = comparator.compare(&data)?;
//! println!("{table}");
//! ```

use crate::config::ComparisonConfig;
use crate::dataset::TrainTestSplit;
use crate::error::{LearningError, Result};
use crate::metrics::Metrics;
use crate::models::Regressor;
use crate::plot::render_scatter;
use crate::progress::{ComparisonUpdate, ProgressCallback};
use crate::registry::{ModelSpec, default_registry};
use crate::types::{ComparisonTable, ModelComparison};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const SUMMARY_FILE_NAME: &str = "model_comparison_summary.csv";

/// Lowercase, spaces replaced by `_`.
pub fn model_slug(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

pub fn model_file_name(name: &str) -> String {
    format!("{}_model.json", model_slug(name))
}

pub fn plot_file_name(name: &str) -> String {
    format!("{}_predicted_vs_actual.png", model_slug(name))
}

/// Runs the registered models on a [`TrainTestSplit`].
pub struct ModelComparator {
    config: ComparisonConfig,
    registry: Vec<ModelSpec>,
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for ModelComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelComparator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ModelComparator {
    #[must_use]
    pub fn builder() -> ModelComparatorBuilder {
        ModelComparatorBuilder::default()
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Fit, evaluate and persist each available model in registry order.
    ///
    /// Unavailable models are skipped with a warning. A model whose fit,
    /// prediction or persistence fails is skipped with a warning; a failed
    /// diagnostic plot is logged and the model is kept.
    ///
    /// # Errors
    ///
    /// - [`TrainingFailed`](LearningError::TrainingFailed) if no model succeeded
    /// - [`Polars`](LearningError::Polars) / [`Io`](LearningError::Io) if the
    ///   summary CSV cannot be written
    pub fn compare(&self, data: &TrainTestSplit) -> Result<ComparisonTable> {
        let mut table = ComparisonTable::default();

        let (available, unavailable): (Vec<&ModelSpec>, Vec<&ModelSpec>) =
            self.registry.iter().partition(|spec| (spec.is_available)());
        for spec in unavailable {
            warn!("{} is not available in this build; skipping", spec.name);
            table
                .skipped
                .push((spec.name.to_string(), LearningError::ModelUnavailable(spec.name.to_string()).to_string()));
        }

        info!(
            "Comparing {} models on {} training / {} test rows",
            available.len(),
            data.train.n_samples(),
            data.test.n_samples()
        );
        if self.config.save_artifacts {
            fs::create_dir_all(&self.config.output_dir)?;
        }

        let total = available.len();
        for (done, spec) in available.into_iter().enumerate() {
            self.report(ComparisonUpdate::new(
                done,
                total,
                Some(spec.name),
                format!("Fitting {}", spec.name),
            ));

            match self.evaluate(spec, data) {
                Ok(row) => {
                    info!(
                        "{}: MAE {:.4}, RMSE {:.4}, R2 {:.4}",
                        row.name, row.metrics.mae, row.metrics.rmse, row.metrics.r2
                    );
                    table.rows.push(row);
                }
                Err(e) => {
                    warn!("{} failed and is skipped: {}", spec.name, e);
                    table.skipped.push((spec.name.to_string(), e.to_string()));
                }
            }
        }

        if table.rows.is_empty() {
            return Err(LearningError::TrainingFailed(
                "no model could be trained".to_string(),
            ));
        }

        if self.config.save_artifacts {
            let path = self.config.output_dir.join(SUMMARY_FILE_NAME);
            write_summary(&table, &path)?;
            info!("Model comparison summary saved: {}", path.display());
            table.summary_path = Some(path);
        }

        self.report(ComparisonUpdate::new(total, total, None, "Comparison complete"));
        Ok(table)
    }

    fn evaluate(&self, spec: &ModelSpec, data: &TrainTestSplit) -> Result<ModelComparison> {
        let regressor: Box<dyn Regressor> = (spec.build)(&self.config)?;

        let started = Instant::now();
        let model = regressor.fit(&data.train)?;
        let elapsed = started.elapsed().as_secs_f64();
        debug!("{} fitted in {:.2}s", spec.name, elapsed);

        let predicted = model.predict(data.test.x.view())?;
        let metrics = Metrics::compute(data.test.y.view(), predicted.view())?;

        let mut row = ModelComparison::new(spec.name, metrics);
        row.training_time_seconds = elapsed;

        if self.config.save_artifacts {
            let plot_path = self.config.output_dir.join(plot_file_name(spec.name));
            match render_scatter(
                spec.name,
                &self.config.target_label,
                data.test.y.view(),
                predicted.view(),
                &plot_path,
            ) {
                Ok(()) => {
                    debug!("Saved {}", plot_path.display());
                    row.plot_path = Some(plot_path);
                }
                Err(e) => warn!("Diagnostic plot for {} not saved: {}", spec.name, e),
            }

            let model_path = self.config.output_dir.join(model_file_name(spec.name));
            model.save(&model_path)?;
            debug!("Saved {}", model_path.display());
            row.model_path = Some(model_path);
        }

        Ok(row)
    }

    fn report(&self, update: ComparisonUpdate) {
        if let Some(callback) = &self.progress_callback {
            callback(update);
        }
    }
}

fn write_summary(table: &ComparisonTable, path: &Path) -> Result<()> {
    let mut df = table.to_dataframe()?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Builder for [`ModelComparator`].
#[derive(Default)]
pub struct ModelComparatorBuilder {
    config: Option<ComparisonConfig>,
    registry: Option<Vec<ModelSpec>>,
    progress_callback: Option<ProgressCallback>,
}

impl ModelComparatorBuilder {
    /// Comparison settings. Defaults to [`ComparisonConfig::default()`].
    #[must_use]
    pub fn config(mut self, config: ComparisonConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default model registry.
    #[must_use]
    pub fn registry(mut self, registry: Vec<ModelSpec>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Receive a [`ComparisonUpdate`] before each model and once at the end.
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ComparisonUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(std::sync::Arc::new(callback));
        self
    }

    /// Build the comparator.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] if the configuration does not
    /// validate or the registry is empty.
    pub fn build(self) -> Result<ModelComparator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let registry = self.registry.unwrap_or_else(default_registry);
        if registry.is_empty() {
            return Err(LearningError::InvalidConfig(
                "model registry is empty".to_string(),
            ));
        }

        Ok(ModelComparator {
            config,
            registry,
            progress_callback: self.progress_callback,
        })
    }
}

/// Default artifact directory joined with a model's file name.
pub fn model_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(model_file_name(name))
}
