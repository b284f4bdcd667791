//! Regressor trait defining the common supervised-model interface.

use crate::error::Result;

/// Common interface for supervised regression models.
///
/// `rows` is row-major: one feature vector per observation. All rows must
/// share the width seen at fit time.
pub trait Regressor {
    /// Fit the model on feature rows and their targets.
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()>;

    /// Predict targets for the given feature rows.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}
