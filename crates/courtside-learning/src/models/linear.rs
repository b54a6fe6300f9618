use super::{Regressor, TrainedModel};
use crate::dataset::Dataset;
use crate::error::{LearningError, Result};
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Ordinary least squares with an intercept.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegressor;

impl Regressor for LinearRegressor {
    fn name(&self) -> &'static str {
        "LinearRegression"
    }

    fn fit(&self, data: &Dataset) -> Result<TrainedModel> {
        let records = linfa::Dataset::new(data.x.clone(), data.y.clone());
        let fitted = LinearRegression::new()
            .fit(&records)
            .map_err(|e| LearningError::TrainingFailed(format!("LinearRegression: {e}")))?;

        Ok(TrainedModel::Linear(LinearModel {
            coefficients: fitted.params().to_vec(),
            intercept: fitted.intercept(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub(crate) fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.dot(&Array1::from(self.coefficients.clone())) + self.intercept
    }
}
