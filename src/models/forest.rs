//! Bagged random-forest regressor.
//!
//! Each tree is fitted on a bootstrap resample of the training rows and
//! predictions are averaged. The RNG is seeded, so a fit over the same data
//! always yields the same forest.

use crate::error::{AnalyticsError, Result};
use crate::models::{DecisionTreeRegressor, Regressor, TreeConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hyperparameters for a random forest.
#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Per-tree split configuration.
    pub tree: TreeConfig,
    /// RNG seed for bootstrap resampling.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            tree: TreeConfig::default(),
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Set the number of trees.
    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Set the minimum samples required to split a node.
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.tree.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum samples each leaf must keep.
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.tree.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Random-forest regressor.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<DecisionTreeRegressor>,
}

impl RandomForestRegressor {
    /// Create an unfitted forest with the given configuration.
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    /// The configuration this forest was created with.
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if rows.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }
        if self.config.n_trees == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "forest needs at least one tree".to_string(),
            ));
        }

        let n = rows.len();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.n_trees);

        for _ in 0..self.config.n_trees {
            let mut sample_rows = Vec::with_capacity(n);
            let mut sample_targets = Vec::with_capacity(n);
            for _ in 0..n {
                let pick = rng.gen_range(0..n);
                sample_rows.push(rows[pick].clone());
                sample_targets.push(targets[pick]);
            }

            let mut tree = DecisionTreeRegressor::new(self.config.tree);
            tree.fit(&sample_rows, &sample_targets)?;
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(AnalyticsError::FitRequired);
        }

        let mut sums = vec![0.0; rows.len()];
        for tree in &self.trees {
            for (sum, pred) in sums.iter_mut().zip(tree.predict(rows)?) {
                *sum += pred;
            }
        }
        Ok(sums
            .into_iter()
            .map(|s| s / self.trees.len() as f64)
            .collect())
    }

    fn name(&self) -> &str {
        "RandomForestRegressor"
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}
