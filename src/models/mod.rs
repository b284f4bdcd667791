//! Statistical models used by the analytics pipeline.
//!
//! All models are fitted fresh per analysis request on small in-memory
//! matrices, with seeded RNGs so repeated runs over the same table produce
//! identical results.

mod forest;
mod isolation;
mod linear;
mod traits;
mod tree;

pub use forest::{ForestConfig, RandomForestRegressor};
pub use isolation::{AnomalyScores, IsolationForest, IsolationForestConfig};
pub use linear::SimpleLinearRegression;
pub use traits::Regressor;
pub use tree::{DecisionTreeRegressor, TreeConfig};
