//! CART regression tree, the base learner of the forest and boosting models.
//!
//! Splits minimize the summed squared error of the two children. Candidate
//! thresholds are midpoints between consecutive distinct feature values.

use crate::error::{LearningError, Result};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeParams {
    pub fn with_max_depth(depth: usize) -> Self {
        Self {
            max_depth: Some(depth),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        value: f64,
    },
    /// Rows with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    n_features: usize,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit on the rows of `x`/`y` listed in `indices`. Repeated indices are
    /// allowed, which is how bootstrap samples are passed in.
    pub fn fit<'a>(x: ArrayView2<'a, f64>, y: ArrayView1<'a, f64>, mut indices: Vec<usize>, params: TreeParams) -> Result<Self> {
        if indices.is_empty() {
            return Err(LearningError::InvalidData("cannot fit a tree on zero rows".to_string()));
        }
        if x.nrows() != y.len() {
            return Err(LearningError::InvalidData(format!(
                "feature matrix has {} rows but target has {}",
                x.nrows(),
                y.len()
            )));
        }

        let mut builder = TreeBuilder {
            x,
            y,
            params,
            nodes: Vec::new(),
        };
        builder.grow(&mut indices, 0);

        Ok(Self {
            n_features: x.ncols(),
            nodes: builder.nodes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

struct Candidate {
    feature: usize,
    threshold: f64,
    /// Rows left of the split once sorted by `feature`.
    n_left: usize,
    sse: f64,
}

struct TreeBuilder<'a> {
    x: ArrayView2<'a, f64>,
    y: ArrayView1<'a, f64>,
    params: TreeParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let id = self.nodes.len();
        let (sum, sum_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let v = self.y[i];
            (s + v, sq + v * v)
        });
        let n = indices.len() as f64;
        self.nodes.push(Node::Leaf { value: sum / n });

        let parent_sse = sum_sq - sum * sum / n;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || indices.len() < self.params.min_samples_split || parent_sse <= 1e-12 {
            return id;
        }

        let Some(best) = self.best_split(indices) else {
            return id;
        };
        if best.sse >= parent_sse - 1e-12 {
            return id;
        }

        let feature = best.feature;
        indices.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));
        let (left_rows, right_rows) = indices.split_at_mut(best.n_left);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[id] = Node::Split {
            feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(&self, indices: &[usize]) -> Option<Candidate> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        if n < 2 * min_leaf {
            return None;
        }

        let total: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| self.y[i] * self.y[i]).sum();

        let mut best: Option<Candidate> = None;
        let mut order = indices.to_vec();
        for feature in 0..self.x.ncols() {
            order.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let v = self.y[order[k - 1]];
                left_sum += v;
                left_sq += v * v;

                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let lo = self.x[[order[k - 1], feature]];
                let hi = self.x[[order[k], feature]];
                if lo >= hi {
                    continue;
                }

                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / k as f64)
                    + (right_sq - right_sum * right_sum / (n - k) as f64);

                if best.as_ref().is_none_or(|b| sse < b.sse) {
                    best = Some(Candidate {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        n_left: k,
                        sse,
                    });
                }
            }
        }
        best
    }
}
