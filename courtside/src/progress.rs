//! Progress reporting for the pipeline driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use courtside::{Pipeline, PipelineConfig};
//!
//! let outcome = Pipeline::builder()
//!     .config(PipelineConfig::default())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}: {}", update.progress * 100.0, update.stage.display_name(), update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a pipeline run, in execution order.
///
/// `Done`, `Aborted` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Looking for the combined input file
    CheckInput,
    /// Numeric coercion, incomplete-row removal and playtime filter
    Prepare,
    /// Splitting and comparing regression models
    Train,
    /// Ranked bar charts
    Visualize,
    /// Chart images concatenated into the PDF
    Report,
    /// Pipeline completed successfully
    Done,
    /// Input file missing; nothing was run
    Aborted,
    /// A stage returned an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CheckInput => "Checking Input",
            Self::Prepare => "Preparing Features",
            Self::Train => "Comparing Models",
            Self::Visualize => "Plotting Charts",
            Self::Report => "Assembling Report",
            Self::Done => "Done",
            Self::Aborted => "Aborted",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run spent in this stage.
    pub fn weight(&self) -> f32 {
        match self {
            Self::CheckInput => 0.02,
            Self::Prepare => 0.08,
            Self::Train => 0.60,
            Self::Visualize => 0.20,
            Self::Report => 0.10,
            Self::Done | Self::Aborted | Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::CheckInput => 0.0,
            Self::Prepare => 0.02,
            Self::Train => 0.10,
            Self::Visualize => 0.70,
            Self::Report => 0.90,
            Self::Done => 1.0,
            Self::Aborted | Self::Failed => 0.0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,

    /// Current item within the stage, e.g. the model being fitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let stage_progress = stage_progress.clamp(0.0, 1.0);
        let progress = stage.base_progress() + stage.weight() * stage_progress;
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress,
            message: message.into(),
            sub_stage: None,
        }
    }

    pub fn with_sub_stage(
        stage: PipelineStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sub_stage: Some(sub_stage.into()),
            ..Self::new(stage, stage_progress, message)
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Done, 1.0, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Aborted, 0.0, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Failed, 0.0, message)
    }
}

/// Receives progress updates during a pipeline run.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
