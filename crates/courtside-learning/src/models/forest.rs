use super::tree::{RegressionTree, TreeParams};
use super::{Regressor, TrainedModel, check_width};
use crate::dataset::Dataset;
use crate::error::{LearningError, Result};
use ndarray::{Array1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bagged, fully grown regression trees.
#[derive(Debug, Clone, Copy)]
pub struct RandomForestRegressor {
    pub n_trees: usize,
    pub seed: u64,
}

impl RandomForestRegressor {
    pub fn new(n_trees: usize, seed: u64) -> Self {
        Self { n_trees, seed }
    }
}

impl Regressor for RandomForestRegressor {
    fn name(&self) -> &'static str {
        "RandomForest"
    }

    fn fit(&self, data: &Dataset) -> Result<TrainedModel> {
        let n = data.n_samples();
        if n == 0 {
            return Err(LearningError::InvalidData("cannot fit a forest on zero rows".to_string()));
        }
        if self.n_trees == 0 {
            return Err(LearningError::InvalidConfig("n_trees must be at least 1".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(RegressionTree::fit(
                data.x.view(),
                data.y.view(),
                bootstrap,
                TreeParams::default(),
            )?);
        }
        debug!("RandomForest fitted {} trees on {} rows", trees.len(), n);

        Ok(TrainedModel::Forest(ForestModel {
            n_features: data.n_features(),
            trees,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl ForestModel {
    pub(crate) fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_width(self.n_features, x)?;
        let n_trees = self.trees.len().max(1) as f64;
        Ok(x.rows()
            .into_iter()
            .map(|row| self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / n_trees)
            .collect())
    }
}
