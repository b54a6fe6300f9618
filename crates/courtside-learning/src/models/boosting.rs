//! Gradient-boosted regression trees with squared loss.
//!
//! Starts from the training mean and adds `learning_rate` times a shallow tree
//! fitted to the current residuals each round. No subsampling, so the fit is
//! deterministic.

use super::tree::{RegressionTree, TreeParams};
use super::{Regressor, TrainedModel, check_width};
use crate::dataset::Dataset;
use crate::error::{LearningError, Result};
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct GradientBoostingRegressor {
    pub rounds: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
        }
    }
}

impl Regressor for GradientBoostingRegressor {
    fn name(&self) -> &'static str {
        "GradientBoosting"
    }

    fn fit(&self, data: &Dataset) -> Result<TrainedModel> {
        let n = data.n_samples();
        let Some(init) = data.y.mean() else {
            return Err(LearningError::InvalidData("cannot fit boosting on zero rows".to_string()));
        };

        let params = TreeParams::with_max_depth(self.max_depth);
        let mut current = Array1::from_elem(n, init);
        let mut trees = Vec::with_capacity(self.rounds);

        for _ in 0..self.rounds {
            let residuals = &data.y - &current;
            let tree = RegressionTree::fit(data.x.view(), residuals.view(), (0..n).collect(), params)?;
            for (i, row) in data.x.rows().into_iter().enumerate() {
                current[i] += self.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }
        debug!("GradientBoosting fitted {} rounds on {} rows", trees.len(), n);

        Ok(TrainedModel::Boosted(BoostedModel {
            n_features: data.n_features(),
            init,
            learning_rate: self.learning_rate,
            trees,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedModel {
    pub n_features: usize,
    pub init: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

impl BoostedModel {
    pub(crate) fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_width(self.n_features, x)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                self.init
                    + self.learning_rate * self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::rmse;
    use ndarray::Array2;

    fn sine(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64 / 4.0);
        let y = x.column(0).mapv(f64::sin);
        Dataset::new(vec!["t".into()], x, y).unwrap()
    }

    #[test]
    fn test_more_rounds_lower_training_error() {
        let data = sine(40);
        let short = GradientBoostingRegressor { rounds: 5, ..Default::default() }
            .fit(&data)
            .unwrap();
        let long = GradientBoostingRegressor::default().fit(&data).unwrap();

        let short_err = rmse(data.y.view(), short.predict(data.x.view()).unwrap().view()).unwrap();
        let long_err = rmse(data.y.view(), long.predict(data.x.view()).unwrap().view()).unwrap();
        assert!(long_err < short_err);
    }

    #[test]
    fn test_single_round_zero_rate_is_mean() {
        let data = sine(10);
        let model = GradientBoostingRegressor {
            rounds: 1,
            learning_rate: 1e-300,
            max_depth: 1,
        }
        .fit(&data)
        .unwrap();
        let predicted = model.predict(data.x.view()).unwrap();
        let mean = data.y.mean().unwrap();
        assert!(predicted.iter().all(|p| (p - mean).abs() < 1e-9));
    }

    #[test]
    fn test_deterministic() {
        let data = sine(20);
        let a = GradientBoostingRegressor::default().fit(&data).unwrap();
        let b = GradientBoostingRegressor::default().fit(&data).unwrap();
        assert_eq!(a, b);
    }
}
