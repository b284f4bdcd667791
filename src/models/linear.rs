//! Single-feature ordinary least squares.
//!
//! The resource analyzer fits `consumption = a + b * order_count` baselines;
//! this is the closed-form slope/intercept fit with an intercept-only
//! fallback for degenerate inputs.

use crate::error::{AnalyticsError, Result};

/// Least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleLinearRegression {
    slope: f64,
    intercept: f64,
    fitted: bool,
}

impl SimpleLinearRegression {
    /// Create an unfitted model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the line on paired observations.
    ///
    /// When `x` has no variance (all observations at the same order count),
    /// the fit degrades to an intercept-only model at the mean of `y`.
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        if x.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }
        if x.len() != y.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            covariance += (xi - mean_x) * (yi - mean_y);
            variance += (xi - mean_x) * (xi - mean_x);
        }

        if variance <= f64::EPSILON {
            self.slope = 0.0;
            self.intercept = mean_y;
        } else {
            self.slope = covariance / variance;
            self.intercept = mean_y - self.slope * mean_x;
        }
        self.fitted = true;
        Ok(())
    }

    /// Predict `y` for each `x`.
    pub fn predict(&self, x: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AnalyticsError::FitRequired);
        }
        Ok(x.iter().map(|&xi| self.intercept + self.slope * xi).collect())
    }

    /// Residuals `y - predicted(x)` for paired observations.
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        if x.len() != y.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        let expected = self.predict(x)?;
        Ok(y.iter().zip(expected).map(|(&yi, ei)| yi - ei).collect())
    }

    /// Fitted slope.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}
