//! The end-to-end pipeline: prepare, compare models, chart, report.
//!
//! Stages run in order `CheckInput → Prepare → Train → Visualize → Report →
//! Done`. A missing input file ends the run early as
//! [`PipelineOutcome::Aborted`]; any other failure is returned as an error.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
use chrono::Local;
use courtside_learning::{ComparisonTable, Dataset, ModelComparator, ModelComparison, split};
use courtside_processing::{
    ChartImage, ReportOutcome, build_report, load_dataset, plot_extended, prepare_with,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Everything a completed run produced. Written to `pipeline_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// RFC 3339 local time at completion.
    pub timestamp: String,
    pub data_file: PathBuf,
    pub rows_loaded: usize,
    /// Rows left after coercion, incomplete-row removal and playtime filter.
    pub rows_prepared: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: Vec<String>,
    pub comparison: Vec<ModelComparison>,
    /// Lowest RMSE.
    pub best_model: Option<String>,
    /// Rows of the prepared table the charts were drawn from.
    pub rows_charted: usize,
    pub charts: Vec<ChartImage>,
    pub report: ReportOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Completed(Box<PipelineSummary>),
    Aborted { reason: String },
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// The pipeline driver.
///
/// # Example
///
/// ```rust,ignore
/// let outcome = Pipeline::builder()
///     .config(PipelineConfig::default())
///     .build()?
///     .run()?;
///
/// if let PipelineOutcome::Aborted { reason } = outcome {
///     eprintln!("{reason}");
/// }
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage.
    ///
    /// Returns [`PipelineOutcome::Aborted`] without touching any output when
    /// the input file does not exist.
    pub fn run(&self) -> Result<PipelineOutcome> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::CheckInput,
            0.0,
            format!("Looking for {}", self.config.data_file.display()),
        ));
        if !self.config.data_file.exists() {
            let reason = format!(
                "Data file '{}' not found. Please run `courtside scrape` first.",
                self.config.data_file.display()
            );
            error!("{}", reason);
            self.report_progress(ProgressUpdate::aborted(&reason));
            return Ok(PipelineOutcome::Aborted { reason });
        }

        match self.run_stages() {
            Ok(summary) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                info!("Pipeline completed successfully");
                Ok(PipelineOutcome::Completed(Box::new(summary)))
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn run_stages(&self) -> Result<PipelineSummary> {
        let config = &self.config;

        // Prepare
        self.enter(PipelineStage::Prepare, "Loading and preparing features");
        let df = load_dataset(&config.data_file)?;
        let prepared = prepare_with(&df, &config.playtime)?;
        info!(
            "Prepared {} of {} rows with {} features",
            prepared.height(),
            df.height(),
            prepared.feature_names().len()
        );

        // Train
        self.enter(PipelineStage::Train, "Splitting and comparing models");
        let dataset = Dataset::from_frame(&prepared.features, &prepared.target)?;
        let data = split(&dataset, config.test_size, config.random_seed)?;
        let comparator = self.comparator()?;
        let table: ComparisonTable = comparator.compare(&data)?;
        info!("Model comparison:\n{}", table);

        // Visualize
        self.enter(PipelineStage::Visualize, "Plotting ranked charts");
        // Chart the rows the models saw.
        let charts = plot_extended(&prepared.table, &config.plots_dir)?;
        info!("{} charts saved to {}", charts.len(), config.plots_dir.display());

        // Report
        self.enter(PipelineStage::Report, "Assembling PDF report");
        let report = build_report(&config.plots_dir, &config.report_path, None)?;

        let summary = PipelineSummary {
            timestamp: Local::now().to_rfc3339(),
            data_file: config.data_file.clone(),
            rows_loaded: df.height(),
            rows_prepared: prepared.height(),
            train_rows: data.train.n_samples(),
            test_rows: data.test.n_samples(),
            features: prepared.feature_names(),
            best_model: table.best().map(|row| row.name.clone()),
            comparison: table.rows,
            rows_charted: prepared.table.height(),
            charts,
            report,
        };
        write_summary(config, &summary)?;
        Ok(summary)
    }

    /// Comparator whose per-model updates are forwarded as `Train` progress.
    fn comparator(&self) -> Result<ModelComparator> {
        let mut builder = ModelComparator::builder().config(self.config.comparison_config()?);
        if let Some(reporter) = &self.progress_reporter {
            let reporter = Arc::clone(reporter);
            builder = builder.on_progress(move |update| {
                let stage_progress = update.progress as f32;
                let next = match update.current_model {
                    Some(model) => ProgressUpdate::with_sub_stage(
                        PipelineStage::Train,
                        model,
                        stage_progress,
                        update.message,
                    ),
                    None => ProgressUpdate::new(PipelineStage::Train, stage_progress, update.message),
                };
                reporter.report(next);
            });
        }
        Ok(builder.build()?)
    }

    fn enter(&self, stage: PipelineStage, message: &str) {
        info!("[{}] {}", stage.display_name(), message);
        self.report_progress(ProgressUpdate::new(stage, 0.0, message));
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

fn write_summary(config: &PipelineConfig, summary: &PipelineSummary) -> Result<()> {
    fs::create_dir_all(&config.output_dir)?;
    let path = config.summary_path();
    fs::write(&path, serde_json::to_string_pretty(summary)?)?;
    info!("Pipeline summary saved: {}", path.display());
    Ok(())
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Defaults to [`PipelineConfig::default()`].
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter(Arc::new(ClosureProgressReporter::new(callback)))
    }

    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_missing_input_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        let pipeline = Pipeline::builder()
            .config(
                PipelineConfig::builder()
                    .data_file(dir.path().join("absent.csv"))
                    .output_dir(dir.path())
                    .build()
                    .unwrap(),
            )
            .on_progress(move |u| sink.lock().unwrap().push(u.stage))
            .build()
            .unwrap();

        let outcome = pipeline.run().unwrap();

        let PipelineOutcome::Aborted { reason } = outcome else {
            panic!("expected an aborted run");
        };
        assert!(reason.contains("absent.csv"));
        assert!(reason.contains("courtside scrape"));
        assert_eq!(
            *stages.lock().unwrap(),
            vec![PipelineStage::CheckInput, PipelineStage::Aborted]
        );
        assert!(!dir.path().join("pipeline_summary.json").exists());
    }

    #[test]
    fn test_missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("combined.csv");
        fs::write(&data_file, "Player,G\nA,10\n").unwrap();

        let pipeline = Pipeline::builder()
            .config(
                PipelineConfig::builder()
                    .data_file(&data_file)
                    .output_dir(dir.path())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = PipelineConfig::default();
        config.test_size = 2.0;
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_outcome_json_tag() {
        let json = serde_json::to_value(PipelineOutcome::Aborted {
            reason: "missing".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "aborted");
    }
}
