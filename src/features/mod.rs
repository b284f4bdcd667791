//! Feature engineering over daily order series.
//!
//! Calendar features are pure date arithmetic; lag and rolling features are
//! pure functions of the series up to and including the row's date — no
//! look-ahead.

mod calendar;
mod matrix;

pub use calendar::{
    day_of_month, day_of_week, day_of_year, is_weekend, iso_week, month, seasonal_row,
};
pub use matrix::{FeatureMatrix, LagSnapshot, FEATURE_NAMES, LAG_OFFSETS};
