//! Dense numeric training data and the train/evaluation split.

use crate::error::{LearningError, Result};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Feature matrix and target vector, row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    /// `n_samples x n_features`
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl Dataset {
    pub fn new(feature_names: Vec<String>, x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(LearningError::InvalidData(format!(
                "feature matrix has {} rows but target has {}",
                x.nrows(),
                y.len()
            )));
        }
        if feature_names.len() != x.ncols() {
            return Err(LearningError::InvalidData(format!(
                "{} feature names for {} columns",
                feature_names.len(),
                x.ncols()
            )));
        }
        Ok(Self { feature_names, x, y })
    }

    /// Convert a prepared feature table and target series.
    ///
    /// Every column is cast to `f64`. Nulls are rejected: feature preparation
    /// is expected to have removed incomplete rows already.
    pub fn from_frame(features: &DataFrame, target: &Series) -> Result<Self> {
        if features.height() != target.len() {
            return Err(LearningError::InvalidData(format!(
                "feature table has {} rows but target has {}",
                features.height(),
                target.len()
            )));
        }
        if features.width() == 0 {
            return Err(LearningError::InvalidData("no feature columns".to_string()));
        }

        let n_rows = features.height();
        let mut x = Array2::<f64>::zeros((n_rows, features.width()));
        let mut feature_names = Vec::with_capacity(features.width());

        for (j, column) in features.get_columns().iter().enumerate() {
            let name = column.name().to_string();
            let values = column.cast(&DataType::Float64)?;
            for (i, value) in values.f64()?.into_iter().enumerate() {
                x[[i, j]] = value.ok_or_else(|| {
                    LearningError::InvalidData(format!("column '{name}' has a missing value at row {i}"))
                })?;
            }
            feature_names.push(name);
        }

        let target_name = target.name().to_string();
        let y = target
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                value.ok_or_else(|| {
                    LearningError::InvalidData(format!(
                        "target '{target_name}' has a missing value at row {i}"
                    ))
                })
            })
            .collect::<Result<Array1<f64>>>()?;

        Self::new(feature_names, x, y)
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}

/// Training and evaluation partitions of one [`Dataset`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

/// Shuffle rows with a seeded generator and hold out `ceil(n * test_size)`
/// of them for evaluation.
///
/// The same seed always yields the same partition. Both partitions must be
/// non-empty.
pub fn split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(LearningError::InvalidConfig(
            "test_size must be between 0.0 and 1.0 (exclusive)".to_string(),
        ));
    }

    let n = dataset.n_samples();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n < 2 || n_test == 0 || n_test >= n {
        return Err(LearningError::InvalidData(format!(
            "{n} rows cannot be split with test_size {test_size}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok(TrainTestSplit {
        train: dataset.select(train_idx),
        test: dataset.select(test_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| i as f64);
        Dataset::new(vec!["a".into(), "b".into()], x, y).unwrap()
    }

    #[test]
    fn test_from_frame() {
        let features = df! {
            "G" => [10i64, 20, 30],
            "FG%" => [0.4f64, 0.5, 0.6],
        }
        .unwrap();
        let target = Series::new("PTS".into(), [100i64, 200, 300]);

        let ds = Dataset::from_frame(&features, &target).unwrap();

        assert_eq!(ds.feature_names, vec!["G", "FG%"]);
        assert_eq!(ds.x, array![[10.0, 0.4], [20.0, 0.5], [30.0, 0.6]]);
        assert_eq!(ds.y, array![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_from_frame_rejects_nulls() {
        let features = df! { "G" => [Some(1.0f64), None] }.unwrap();
        let target = Series::new("PTS".into(), [1.0f64, 2.0]);

        let err = Dataset::from_frame(&features, &target).unwrap_err();
        assert!(matches!(err, LearningError::InvalidData(ref m) if m.contains("'G'")));
    }

    #[test]
    fn test_from_frame_length_mismatch() {
        let features = df! { "G" => [1.0f64, 2.0] }.unwrap();
        let target = Series::new("PTS".into(), [1.0f64]);
        assert!(Dataset::from_frame(&features, &target).is_err());
    }

    #[test]
    fn test_split_sizes() {
        let s = split(&sample(10), 0.2, 42).unwrap();
        assert_eq!(s.test.n_samples(), 2);
        assert_eq!(s.train.n_samples(), 8);

        // ceil rounding
        let s = split(&sample(11), 0.2, 42).unwrap();
        assert_eq!(s.test.n_samples(), 3);
        assert_eq!(s.train.n_samples(), 8);
    }

    #[test]
    fn test_split_is_deterministic_and_disjoint() {
        let ds = sample(25);
        let a = split(&ds, 0.2, 42).unwrap();
        let b = split(&ds, 0.2, 42).unwrap();
        assert_eq!(a.test.y, b.test.y);
        assert_eq!(a.train.y, b.train.y);

        let mut all: Vec<f64> = a.train.y.iter().chain(a.test.y.iter()).copied().collect();
        all.sort_by(|l, r| l.partial_cmp(r).unwrap());
        assert_eq!(all, (0..25).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rows_stay_aligned() {
        let s = split(&sample(12), 0.25, 7).unwrap();
        for (row, y) in s.test.x.rows().into_iter().zip(s.test.y.iter()) {
            assert_eq!(row[0], y * 2.0);
        }
    }

    #[test]
    fn test_split_too_small() {
        assert!(matches!(split(&sample(1), 0.2, 42), Err(LearningError::InvalidData(_))));
        assert!(matches!(split(&sample(10), 1.0, 42), Err(LearningError::InvalidConfig(_))));
    }
}
