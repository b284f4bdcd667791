//! CART regression tree.
//!
//! Splits minimize the summed squared error of the two children; leaves
//! predict the mean target of their samples.

use crate::error::{AnalyticsError, Result};
use crate::models::Regressor;

/// Hyperparameters for a regression tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    /// Maximum tree depth; `None` grows until the split criteria stop.
    pub max_depth: Option<usize>,
    /// Minimum number of samples a node needs to be considered for a split.
    pub min_samples_split: usize,
    /// Minimum number of samples each child of a split must keep.
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A single regression tree.
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    config: TreeConfig,
    root: Option<Node>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Create an unfitted tree with the given configuration.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    fn grow(&self, rows: &[Vec<f64>], targets: &[f64], indices: &[usize], depth: usize) -> Node {
        let value = mean_of(targets, indices);

        if indices.len() < self.config.min_samples_split {
            return Node::Leaf { value };
        }
        if let Some(max_depth) = self.config.max_depth {
            if depth >= max_depth {
                return Node::Leaf { value };
            }
        }

        match best_split(rows, targets, indices, self.config.min_samples_leaf) {
            Some(split) => Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.grow(rows, targets, &split.left, depth + 1)),
                right: Box::new(self.grow(rows, targets, &split.right, depth + 1)),
            },
            None => Node::Leaf { value },
        }
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let mut node = self.root.as_ref().ok_or(AnalyticsError::FitRequired)?;
        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if rows.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }
        if rows.len() != targets.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: rows.len(),
                got: targets.len(),
            });
        }
        let width = rows[0].len();
        if rows.iter().any(|r| r.len() != width) {
            return Err(AnalyticsError::InvalidParameter(
                "feature rows have inconsistent widths".to_string(),
            ));
        }

        let indices: Vec<usize> = (0..rows.len()).collect();
        self.n_features = width;
        self.root = Some(self.grow(rows, targets, &indices, 0));
        Ok(())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(AnalyticsError::FitRequired);
        }
        for row in rows {
            if row.len() != self.n_features {
                return Err(AnalyticsError::DimensionMismatch {
                    expected: self.n_features,
                    got: row.len(),
                });
            }
        }
        rows.iter().map(|r| self.predict_row(r)).collect()
    }

    fn name(&self) -> &str {
        "DecisionTreeRegressor"
    }

    fn is_fitted(&self) -> bool {
        self.root.is_some()
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Find the split with the lowest summed child SSE, honoring the leaf-size
/// minimum. Returns `None` when no admissible split improves on the node.
fn best_split(
    rows: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let n = indices.len();
    if n < 2 * min_leaf {
        return None;
    }

    let node_sse = sse_of(targets, indices);
    if node_sse <= f64::EPSILON {
        return None; // already pure
    }

    let n_features = rows[indices[0]].len();
    let mut best: Option<(f64, usize, f64)> = None; // (child sse, feature, threshold)

    let mut order: Vec<usize> = indices.to_vec();
    for feature in 0..n_features {
        order.sort_by(|&a, &b| {
            rows[a][feature]
                .partial_cmp(&rows[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Prefix sums over the sorted order let each candidate split be
        // scored in O(1).
        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let total_sum: f64 = order.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = order.iter().map(|&i| targets[i] * targets[i]).sum();

        for pos in 0..n - 1 {
            let idx = order[pos];
            left_sum += targets[idx];
            left_sq += targets[idx] * targets[idx];

            let left_n = pos + 1;
            let right_n = n - left_n;
            if left_n < min_leaf || right_n < min_leaf {
                continue;
            }

            let here = rows[idx][feature];
            let next = rows[order[pos + 1]][feature];
            if next <= here {
                continue; // no boundary between equal values
            }

            let left_sse = left_sq - left_sum * left_sum / left_n as f64;
            let right_sum = total_sum - left_sum;
            let right_sse = (total_sq - left_sq) - right_sum * right_sum / right_n as f64;
            let child_sse = left_sse + right_sse;

            if best.map_or(child_sse < node_sse, |(b, _, _)| child_sse < b) {
                best = Some((child_sse, feature, (here + next) / 2.0));
            }
        }
    }

    let (_, feature, threshold) = best?;
    let (left, right) = indices
        .iter()
        .copied()
        .partition(|&i| rows[i][feature] <= threshold);
    Some(SplitCandidate {
        feature,
        threshold,
        left,
        right,
    })
}

fn mean_of(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

fn sse_of(targets: &[f64], indices: &[usize]) -> f64 {
    let mean = mean_of(targets, indices);
    indices.iter().map(|&i| (targets[i] - mean).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fits_a_step_function_exactly() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 9.0 }).collect();

        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&rows, &targets).unwrap();

        let preds = tree.predict(&rows).unwrap();
        for (pred, target) in preds.iter().zip(&targets) {
            assert_relative_eq!(pred, target);
        }
    }

    #[test]
    fn constant_targets_become_a_single_leaf() {
        let rows: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, (i * 2) as f64]).collect();
        let targets = vec![4.0; 6];

        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&rows, &targets).unwrap();

        let preds = tree.predict(&[vec![100.0, -3.0]]).unwrap();
        assert_relative_eq!(preds[0], 4.0);
    }

    #[test]
    fn min_leaf_constrains_splits() {
        let rows: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64]).collect();
        let targets = vec![0.0, 0.0, 0.0, 10.0];

        let config = TreeConfig {
            min_samples_leaf: 2,
            ..TreeConfig::default()
        };
        let mut tree = DecisionTreeRegressor::new(config);
        tree.fit(&rows, &targets).unwrap();

        // The only admissible split is 2|2, so the outlier is averaged into
        // its pair rather than isolated.
        let preds = tree.predict(&rows).unwrap();
        assert_relative_eq!(preds[3], 5.0);
    }

    #[test]
    fn unfitted_tree_refuses_to_predict() {
        let tree = DecisionTreeRegressor::default();
        assert!(matches!(
            tree.predict(&[vec![1.0]]),
            Err(AnalyticsError::FitRequired)
        ));
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let mut tree = DecisionTreeRegressor::default();
        let err = tree.fit(&[vec![1.0], vec![2.0]], &[1.0]).unwrap_err();
        assert!(matches!(err, AnalyticsError::DimensionMismatch { .. }));

        tree.fit(&[vec![1.0], vec![2.0]], &[1.0, 2.0]).unwrap();
        let err = tree.predict(&[vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, AnalyticsError::DimensionMismatch { .. }));
    }

    #[test]
    fn max_depth_caps_the_tree() {
        let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..8).map(|i| i as f64).collect();

        let config = TreeConfig {
            max_depth: Some(1),
            ..TreeConfig::default()
        };
        let mut tree = DecisionTreeRegressor::new(config);
        tree.fit(&rows, &targets).unwrap();

        // Depth 1 allows one split, so at most two distinct predictions.
        let mut preds = tree.predict(&rows).unwrap();
        preds.sort_by(|a, b| a.partial_cmp(b).unwrap());
        preds.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        assert!(preds.len() <= 2);
    }
}
