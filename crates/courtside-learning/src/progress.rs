//! Progress reporting for the model comparison.

use std::sync::Arc;

/// A progress update from [`ModelComparator::compare`](crate::ModelComparator::compare).
///
/// # Example
///
/// ```
/// use courtside_learning::ComparisonUpdate;
///
/// let update = ComparisonUpdate {
///     progress: 0.5,
///     message: "Fitting LinearRegression".to_string(),
///     current_model: Some("LinearRegression".to_string()),
///     models_completed: (1, 2),
/// };
///
/// println!("{:.0}% complete", update.progress * 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonUpdate {
    /// Fraction of models processed, 0.0 to 1.0.
    pub progress: f64,

    pub message: String,

    /// Model being fitted, if any.
    pub current_model: Option<String>,

    /// `(completed, total)` models, counting skipped ones as completed.
    pub models_completed: (u32, u32),
}

impl ComparisonUpdate {
    pub(crate) fn new(done: usize, total: usize, current_model: Option<&str>, message: impl Into<String>) -> Self {
        let progress = if total == 0 { 1.0 } else { done as f64 / total as f64 };
        Self {
            progress,
            message: message.into(),
            current_model: current_model.map(str::to_string),
            models_completed: (done as u32, total as u32),
        }
    }
}

/// Callback receiving [`ComparisonUpdate`]s. Must be thread-safe.
pub type ProgressCallback = Arc<dyn Fn(ComparisonUpdate) + Send + Sync>;
