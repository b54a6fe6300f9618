//! Error type for the pipeline driver.

use courtside_learning::LearningError;
use courtside_processing::{ConfigValidationError, ProcessingError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid or unreadable pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Learning(#[from] LearningError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigValidationError> for PipelineError {
    fn from(err: ConfigValidationError) -> Self {
        Self::Config(err.to_string())
    }
}

impl PipelineError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Processing(e) => e.error_code(),
            Self::Learning(e) => e.error_code(),
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_codes_pass_through() {
        let err: PipelineError = ProcessingError::ColumnNotFound("PTS".to_string()).into();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(err.to_string(), ProcessingError::ColumnNotFound("PTS".to_string()).to_string());

        let err: PipelineError = LearningError::TrainingFailed("none".to_string()).into();
        assert_eq!(err.error_code(), "TRAINING_FAILED");
    }
}
