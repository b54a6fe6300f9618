//! Regression Model Comparison
//!
//! Fits several regressors on one seeded train/test split of the prepared
//! season totals and compares them by MAE, RMSE and R².
//!
//! # Overview
//!
//! - [`Dataset`] / [`split`]: dense `f64` features and a deterministic split
//! - [`ModelComparator`]: runs the [`registry`] models in order, writes
//!   diagnostic plots, model files and `model_comparison_summary.csv`
//! - [`TrainedModel`]: fitted models, JSON save/load and prediction
//!
//! # Models
//!
//! | Name | Notes |
//! |------|-------|
//! | `RandomForest` | 100 bootstrap CART trees, seeded |
//! | `LinearRegression` | ordinary least squares via `linfa-linear` |
//! | `GradientBoosting` | squared loss, requires the `boosting` feature |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use courtside_learning::{ComparisonConfig, Dataset, ModelComparator, split};
//!
//! let dataset = Dataset::from_frame(&features, &target)?;
//! let data = split(&dataset, 0.2, 42)?;
//! let table = ModelComparator::builder()
//!     .config(ComparisonConfig::default())
//!     .build()?
//!     .compare(&data)?;
//! println!("{table}");
//! ```

pub mod comparator;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod plot;
pub mod progress;
pub mod registry;
pub mod types;

pub use comparator::{ModelComparator, ModelComparatorBuilder, SUMMARY_FILE_NAME, model_slug};
pub use config::{ComparisonConfig, ComparisonConfigBuilder};
pub use dataset::{Dataset, TrainTestSplit, split};
pub use error::{LearningError, Result};
pub use metrics::Metrics;
pub use models::{Regressor, TrainedModel};
pub use progress::{ComparisonUpdate, ProgressCallback};
pub use registry::{ModelSpec, default_registry};
pub use types::{ComparisonTable, ModelComparison};

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(ComparisonConfig: Send, Sync, Clone);
    static_assertions::assert_impl_all!(TrainedModel: Send, Sync, Clone);
    static_assertions::assert_impl_all!(ModelComparator: Send, Sync);
    static_assertions::assert_impl_all!(LearningError: Send, Sync, std::error::Error);
}
