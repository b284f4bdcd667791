//! Isolation forest for multivariate outlier scoring.
//!
//! Points that can be isolated with few random axis-aligned splits receive
//! scores near 1; typical points score near 0.5. The label threshold is the
//! `(1 - contamination)` quantile of the fitted scores, so roughly the
//! configured fraction of points is flagged anomalous.

use crate::error::{AnalyticsError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

/// Hyperparameters for an isolation forest.
#[derive(Debug, Clone, Copy)]
pub struct IsolationForestConfig {
    /// Number of isolation trees.
    pub n_trees: usize,
    /// Subsample size per tree (capped at the number of points).
    pub max_samples: usize,
    /// A-priori assumed fraction of anomalous points, in (0, 0.5].
    pub contamination: f64,
    /// RNG seed for subsampling and split selection.
    pub seed: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

impl IsolationForestConfig {
    /// Set the contamination rate.
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Scores and labels produced by a fitted isolation forest.
#[derive(Debug, Clone)]
pub struct AnomalyScores {
    /// Per-point anomaly score in (0, 1); higher is more anomalous.
    pub scores: Vec<f64>,
    /// Score threshold implied by the contamination rate.
    pub threshold: f64,
    /// Per-point label, parallel to `scores`.
    pub is_anomaly: Vec<bool>,
}

impl AnomalyScores {
    /// Number of points labeled anomalous.
    pub fn anomaly_count(&self) -> usize {
        self.is_anomaly.iter().filter(|&&a| a).count()
    }

    /// Fraction of points labeled anomalous.
    pub fn anomaly_fraction(&self) -> f64 {
        if self.is_anomaly.is_empty() {
            0.0
        } else {
            self.anomaly_count() as f64 / self.is_anomaly.len() as f64
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Isolation forest outlier detector.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    config: IsolationForestConfig,
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForest {
    /// Create an unfitted forest with the given configuration.
    pub fn new(config: IsolationForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            sample_size: 0,
        }
    }

    /// Fit on the given points (row-major, fixed width).
    pub fn fit(&mut self, points: &[Vec<f64>]) -> Result<()> {
        if points.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }
        if !(0.0..=0.5).contains(&self.config.contamination)
            || self.config.contamination == 0.0
        {
            return Err(AnalyticsError::InvalidParameter(
                "contamination must be in (0, 0.5]".to_string(),
            ));
        }
        let width = points[0].len();
        if points.iter().any(|p| p.len() != width) {
            return Err(AnalyticsError::InvalidParameter(
                "points have inconsistent widths".to_string(),
            ));
        }

        let n = points.len();
        let psi = self.config.max_samples.min(n).max(1);
        // Standard height limit: average path length saturates past log2(psi).
        let height_limit = (psi as f64).log2().ceil().max(1.0) as usize;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.n_trees);
        for _ in 0..self.config.n_trees {
            let indices = if psi < n {
                rand::seq::index::sample(&mut rng, n, psi).into_vec()
            } else {
                (0..n).collect()
            };
            trees.push(build_node(points, &indices, 0, height_limit, &mut rng));
        }

        self.trees = trees;
        self.sample_size = psi;
        Ok(())
    }

    /// Anomaly scores for the given points.
    pub fn scores(&self, points: &[Vec<f64>]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(AnalyticsError::FitRequired);
        }

        let norm = average_path_length(self.sample_size);
        if norm <= 0.0 {
            // Single-point subsamples carry no isolation signal.
            return Ok(vec![0.5; points.len()]);
        }

        Ok(points
            .iter()
            .map(|point| {
                let total: f64 = self
                    .trees
                    .iter()
                    .map(|tree| path_length(point, tree, 0))
                    .sum();
                let mean_path = total / self.trees.len() as f64;
                2f64.powf(-mean_path / norm)
            })
            .collect())
    }

    /// Fit on the points, score them, and label the top `contamination`
    /// fraction as anomalous.
    pub fn fit_label(&mut self, points: &[Vec<f64>]) -> Result<AnomalyScores> {
        self.fit(points)?;
        let scores = self.scores(points)?;
        let threshold = quantile(&scores, 1.0 - self.config.contamination);
        let is_anomaly = scores.iter().map(|&s| s > threshold).collect();
        Ok(AnomalyScores {
            scores,
            threshold,
            is_anomaly,
        })
    }
}

fn build_node(
    points: &[Vec<f64>],
    indices: &[usize],
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if indices.len() <= 1 || depth >= height_limit {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Only features with spread among these points can split them.
    let width = points[indices[0]].len();
    let splittable: Vec<(usize, f64, f64)> = (0..width)
        .filter_map(|feature| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for &i in indices {
                min = min.min(points[i][feature]);
                max = max.max(points[i][feature]);
            }
            (max > min).then_some((feature, min, max))
        })
        .collect();

    if splittable.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, min, max) = splittable[rng.gen_range(0..splittable.len())];
    let threshold = rng.gen_range(min..max);

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| points[i][feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(points, &left, depth + 1, height_limit, rng)),
        right: Box::new(build_node(points, &right, depth + 1, height_limit, rng)),
    }
}

fn path_length(point: &[f64], node: &Node, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            let child = if point[*feature] < *threshold { left } else { right };
            path_length(point, child, depth + 1)
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points:
/// `2 * H(n - 1) - 2 * (n - 1) / n`.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            let harmonic = (n - 1.0).ln() + EULER_MASCHERONI;
            2.0 * harmonic - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile of an unsorted sample, `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let weight = pos - lo as f64;
        sorted[lo] * (1.0 - weight) + sorted[hi] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A tight 2-D cluster with deterministic jitter.
    fn cluster(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| {
                let jitter = (i % 7) as f64 * 0.1;
                vec![10.0 + jitter, -5.0 - jitter * 0.5]
            })
            .collect()
    }

    #[test]
    fn blatant_outlier_is_flagged() {
        let mut points = cluster(29);
        points.push(vec![500.0, 400.0]);

        let mut forest = IsolationForest::new(IsolationForestConfig::default());
        let labels = forest.fit_label(&points).unwrap();

        assert_eq!(labels.is_anomaly.len(), 30);
        assert!(labels.is_anomaly[29], "outlier not flagged");
        let outlier_score = labels.scores[29];
        assert!(labels.scores[..29].iter().all(|&s| s < outlier_score));
    }

    #[test]
    fn anomaly_fraction_tracks_contamination() {
        // Spread-out sample so scores are distinct.
        let points: Vec<Vec<f64>> = (0..200)
            .map(|i| {
                let x = (i as f64 * 0.7).sin() * 10.0;
                let y = (i as f64 * 1.3).cos() * 10.0;
                vec![x, y]
            })
            .collect();

        let mut forest = IsolationForest::new(IsolationForestConfig::default());
        let labels = forest.fit_label(&points).unwrap();

        let fraction = labels.anomaly_fraction();
        assert!(
            (0.02..=0.08).contains(&fraction),
            "fraction {fraction} not near contamination 0.05"
        );
    }

    #[test]
    fn identical_points_yield_no_anomalies() {
        let points = vec![vec![1.0, 2.0]; 25];
        let mut forest = IsolationForest::new(IsolationForestConfig::default());
        let labels = forest.fit_label(&points).unwrap();

        assert_eq!(labels.anomaly_count(), 0);
        // All scores collapse to the same value.
        for &score in &labels.scores {
            assert_relative_eq!(score, labels.scores[0]);
        }
    }

    #[test]
    fn seeded_runs_are_deterministic() {
        let mut points = cluster(40);
        points.push(vec![90.0, 90.0]);

        let mut a = IsolationForest::new(IsolationForestConfig::default().with_seed(3));
        let mut b = IsolationForest::new(IsolationForestConfig::default().with_seed(3));
        let la = a.fit_label(&points).unwrap();
        let lb = b.fit_label(&points).unwrap();

        assert_eq!(la.is_anomaly, lb.is_anomaly);
        for (sa, sb) in la.scores.iter().zip(&lb.scores) {
            assert_relative_eq!(sa, sb);
        }
    }

    #[test]
    fn invalid_contamination_is_rejected() {
        let mut forest =
            IsolationForest::new(IsolationForestConfig::default().with_contamination(0.9));
        let err = forest.fit(&cluster(10)).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
    }

    #[test]
    fn unfitted_forest_refuses_to_score() {
        let forest = IsolationForest::new(IsolationForestConfig::default());
        assert!(matches!(
            forest.scores(&cluster(3)),
            Err(AnalyticsError::FitRequired)
        ));
    }
}
