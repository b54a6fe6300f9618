//! Regression models compared by the [`ModelComparator`](crate::ModelComparator).
//!
//! Every model implements [`Regressor`] and fits into a [`TrainedModel`], a
//! serializable enum that can predict and round-trip through JSON.

#[cfg(feature = "boosting")]
pub mod boosting;
pub mod forest;
pub mod linear;
pub mod tree;

#[cfg(feature = "boosting")]
pub use boosting::{BoostedModel, GradientBoostingRegressor};
pub use forest::{ForestModel, RandomForestRegressor};
pub use linear::{LinearModel, LinearRegressor};
pub use tree::{RegressionTree, TreeParams};

use crate::dataset::Dataset;
use crate::error::{LearningError, Result};
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// An unfitted regression algorithm.
pub trait Regressor: Send + Sync {
    /// Display name, also the source of artifact file names.
    fn name(&self) -> &'static str;

    fn fit(&self, data: &Dataset) -> Result<TrainedModel>;
}

/// A fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainedModel {
    Linear(LinearModel),
    Forest(ForestModel),
    #[cfg(feature = "boosting")]
    Boosted(BoostedModel),
}

impl TrainedModel {
    pub fn n_features(&self) -> usize {
        match self {
            Self::Linear(m) => m.n_features(),
            Self::Forest(m) => m.n_features,
            #[cfg(feature = "boosting")]
            Self::Boosted(m) => m.n_features,
        }
    }

    /// Predict one value per row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        match self {
            Self::Linear(m) => {
                check_width(m.n_features(), x)?;
                Ok(m.predict(x))
            }
            Self::Forest(m) => m.predict(x),
            #[cfg(feature = "boosting")]
            Self::Boosted(m) => m.predict(x),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Write the model as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LearningError::ModelNotFound {
                path: path.display().to_string(),
            });
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub(crate) fn check_width(expected: usize, x: ArrayView2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(LearningError::InvalidData(format!(
            "model expects {expected} features, got {}",
            x.ncols()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    fn line() -> Dataset {
        let x = Array2::from_shape_fn((8, 1), |(i, _)| i as f64);
        let y = x.column(0).mapv(|v| 3.0 * v + 1.0);
        Dataset::new(vec!["v".into()], x, y).unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/randomforest_model.json");

        let model = RandomForestRegressor::new(3, 42).fit(&line()).unwrap();
        model.save(&path).unwrap();
        let loaded = TrainedModel::load(&path).unwrap();

        let query = array![[2.5], [6.0]];
        let before = model.predict(query.view()).unwrap();
        let after = loaded.predict(query.view()).unwrap();
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bytes_carry_kind_tag() {
        let model = LinearRegressor.fit(&line()).unwrap();
        let bytes = model.to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], "linear");

        let restored = TrainedModel::from_bytes(&bytes).unwrap();
        assert_eq!(restored.n_features(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainedModel::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LearningError::ModelNotFound { .. }));
    }

    #[test]
    fn test_linear_predict_checks_width() {
        let model = LinearRegressor.fit(&line()).unwrap();
        assert!(model.predict(Array2::zeros((2, 4)).view()).is_err());
    }
}
