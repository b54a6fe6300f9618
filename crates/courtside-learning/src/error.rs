//! Error types for the courtside-learning crate.
//!
//! This module defines [`LearningError`], the main error type used throughout
//! the crate. All public API functions return `Result<T, LearningError>`.
//!
//! # Example
//!
//! ```no_run
//! use courtside_learning::{ComparisonConfig, LearningError};
//!
//! fn configure() -> Result<ComparisonConfig, LearningError> {
//!     // Errors are automatically propagated with ?
//!     let config = ComparisonConfig::builder()
//!         .test_size(0.25)
//!         .build()?;
//!     Ok(config)
//! }
//! ```

use thiserror::Error;

/// The main error type for courtside-learning operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid configuration provided to the comparator.
    ///
    /// Check the error message for details on which configuration value is invalid
    /// and what values are accepted.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data provided for training or prediction.
    ///
    /// Common causes:
    /// - feature or target column contains nulls (run feature preparation first)
    /// - too few rows to form both a training and an evaluation partition
    /// - feature matrix width differs from the one the model was fitted on
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A model could not be fitted, or no model in a comparison succeeded.
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// The model is not compiled into this build.
    ///
    /// Enable the corresponding cargo feature (e.g. `boosting`).
    #[error("Model '{0}' is not available in this build")]
    ModelUnavailable(String),

    /// The specified model file was not found.
    #[error("Model not found: {path}")]
    ModelNotFound { path: String },

    /// Diagnostic plot rendering failed.
    #[error("Plot error: {0}")]
    Plot(String),

    /// Polars error while reading features or writing the summary table.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LearningError {
    /// Stable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::TrainingFailed(_) => "TRAINING_FAILED",
            Self::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            Self::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            Self::Plot(_) => "PLOT_FAILED",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;
