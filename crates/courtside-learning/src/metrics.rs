//! Regression metrics, scored with linfa's single-target regression metrics.

use crate::error::{LearningError, Result};
use linfa::prelude::SingleTargetRegression;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Evaluation scores of one model on the held-out partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl Metrics {
    pub fn compute(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<Self> {
        Ok(Self {
            mae: mae(actual, predicted)?,
            rmse: rmse(actual, predicted)?,
            r2: r2(actual, predicted)?,
        })
    }
}

fn check_lengths(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<()> {
    if actual.is_empty() {
        return Err(LearningError::InvalidData("no samples to score".to_string()));
    }
    if actual.len() != predicted.len() {
        return Err(LearningError::InvalidData(format!(
            "{} actual values but {} predictions",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

fn scoring_error(e: linfa::Error) -> LearningError {
    LearningError::InvalidData(format!("scoring predictions: {e}"))
}

/// Mean absolute error.
pub fn mae(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<f64> {
    check_lengths(actual, predicted)?;
    predicted.mean_absolute_error(&actual).map_err(scoring_error)
}

/// Root mean squared error.
pub fn rmse(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<f64> {
    check_lengths(actual, predicted)?;
    predicted
        .mean_squared_error(&actual)
        .map(f64::sqrt)
        .map_err(scoring_error)
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// A constant target gives 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let first = actual[0];
    if actual.iter().all(|&a| a == first) {
        let perfect = actual.iter().zip(predicted.iter()).all(|(a, p)| a == p);
        return Ok(if perfect { 1.0 } else { 0.0 });
    }
    predicted.r2(&actual).map_err(scoring_error)
}
