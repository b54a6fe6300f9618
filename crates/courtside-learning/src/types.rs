//! Result types returned by the model comparison.
//!
//! - [`ModelComparison`]: scores and artifact paths of one evaluated model
//! - [`ComparisonTable`]: every successful model, in evaluation order

use crate::metrics::Metrics;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Comparison data for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ModelComparison {
    /// Model name (e.g., "RandomForest", "LinearRegression").
    pub name: String,

    /// Scores on the held-out partition.
    pub metrics: Metrics,

    /// Saved model file, if artifacts were written.
    pub model_path: Option<PathBuf>,

    /// Predicted-vs-actual scatter plot.
    ///
    /// `None` when artifacts are disabled or the plot could not be drawn.
    pub plot_path: Option<PathBuf>,

    /// Seconds spent fitting.
    pub training_time_seconds: f64,
}

impl ModelComparison {
    pub fn new(name: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            name: name.into(),
            metrics,
            model_path: None,
            plot_path: None,
            training_time_seconds: 0.0,
        }
    }
}

/// Outcome of [`ModelComparator::compare`](crate::ModelComparator::compare).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ComparisonTable {
    pub rows: Vec<ModelComparison>,

    /// `model_comparison_summary.csv`, if written.
    pub summary_path: Option<PathBuf>,

    /// Models that were skipped, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl ComparisonTable {
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    /// Row with the lowest RMSE.
    pub fn best(&self) -> Option<&ModelComparison> {
        self.rows
            .iter()
            .min_by(|a, b| a.metrics.rmse.total_cmp(&b.metrics.rmse))
    }

    /// Columns `model, MAE, RMSE, R2`, one row per model.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = self.names();
        let mae: Vec<f64> = self.rows.iter().map(|r| r.metrics.mae).collect();
        let rmse: Vec<f64> = self.rows.iter().map(|r| r.metrics.rmse).collect();
        let r2: Vec<f64> = self.rows.iter().map(|r| r.metrics.r2).collect();

        df! {
            "model" => names,
            "MAE" => mae,
            "RMSE" => rmse,
            "R2" => r2,
        }
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<20} {:>12} {:>12} {:>8}", "model", "MAE", "RMSE", "R2")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<20} {:>12.4} {:>12.4} {:>8.4}",
                row.name, row.metrics.mae, row.metrics.rmse, row.metrics.r2
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ComparisonTable {
        ComparisonTable {
            rows: vec![
                ModelComparison::new("RandomForest", Metrics { mae: 10.0, rmse: 14.0, r2: 0.95 }),
                ModelComparison::new("LinearRegression", Metrics { mae: 8.0, rmse: 11.0, r2: 0.97 }),
            ],
            summary_path: None,
            skipped: vec![],
        }
    }

    #[test]
    fn test_best_is_lowest_rmse() {
        assert_eq!(table().best().unwrap().name, "LinearRegression");
        assert!(ComparisonTable::default().best().is_none());
    }

    #[test]
    fn test_to_dataframe_columns() {
        let df = table().to_dataframe().unwrap();
        let columns: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(columns, vec!["model", "MAE", "RMSE", "R2"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_display_lists_models_in_order() {
        let text = table().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("RandomForest"));
        assert!(lines[2].starts_with("LinearRegression"));
    }
}
