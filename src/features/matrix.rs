//! Lag/rolling feature matrix for demand forecasting.

use crate::core::DailySeries;
use crate::features::calendar;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Lag offsets used by the customer demand model, in days.
pub const LAG_OFFSETS: [usize; 4] = [1, 7, 14, 28];

/// Feature column names, in the fixed order used for both training rows and
/// future rows.
pub const FEATURE_NAMES: [&str; 12] = [
    "day_of_week",
    "is_weekend",
    "month",
    "day_of_month",
    "time_idx",
    "orders_7d_avg",
    "orders_28d_avg",
    "lag_1",
    "lag_7",
    "lag_14",
    "lag_28",
    "is_holiday",
];

/// The engineered per-day feature rows for a daily series.
///
/// Every feature is a pure function of the series up to and including that
/// day. Rolling means use a minimum period of 1 and lags are zero-filled
/// when the offset exceeds the available history, so no cell is ever NaN.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl FeatureMatrix {
    /// Derive the feature rows for a zero-filled daily series against the
    /// global holiday calendar.
    pub fn from_series(series: &DailySeries, holidays: &BTreeSet<NaiveDate>) -> Self {
        let orders = series.orders();
        let n = orders.len();
        let avg_7 = trailing_mean(orders, 7);
        let avg_28 = trailing_mean(orders, 28);

        let mut rows = Vec::with_capacity(n);
        for (i, &date) in series.dates().iter().enumerate() {
            let mut row = Vec::with_capacity(FEATURE_NAMES.len());
            row.push(calendar::day_of_week(date));
            row.push(calendar::is_weekend(date));
            row.push(calendar::month(date));
            row.push(calendar::day_of_month(date));
            row.push(i as f64); // days since series start
            row.push(avg_7[i]);
            row.push(avg_28[i]);
            for lag in LAG_OFFSETS {
                row.push(if i >= lag { orders[i - lag] } else { 0.0 });
            }
            row.push(if holidays.contains(&date) { 1.0 } else { 0.0 });
            rows.push(row);
        }

        Self {
            dates: series.dates().to_vec(),
            rows,
            targets: orders.to_vec(),
        }
    }

    /// Build the feature row for a future date.
    ///
    /// Calendar features come from the date itself; lag and rolling features
    /// come from the supplied [`LagSnapshot`]. `origin` is the first day of
    /// the historical series, anchoring the linear time index.
    pub fn future_row(
        date: NaiveDate,
        origin: NaiveDate,
        snapshot: &LagSnapshot,
        holidays: &BTreeSet<NaiveDate>,
    ) -> Vec<f64> {
        let mut row = Vec::with_capacity(FEATURE_NAMES.len());
        row.push(calendar::day_of_week(date));
        row.push(calendar::is_weekend(date));
        row.push(calendar::month(date));
        row.push(calendar::day_of_month(date));
        row.push((date - origin).num_days() as f64);
        row.push(snapshot.avg_7);
        row.push(snapshot.avg_28);
        for lag in snapshot.lags {
            row.push(lag);
        }
        row.push(if holidays.contains(&date) { 1.0 } else { 0.0 });
        row
    }

    /// Feature rows, parallel to [`dates`](Self::dates).
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Target order counts, parallel to the rows.
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// The dates of the rows.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lag and rolling-mean values observed at the end of a series.
///
/// In the default (reference) forecasting mode one snapshot, taken at the end
/// of history, is reused for every horizon day; in recursive mode a fresh
/// snapshot is taken after each predicted day is appended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagSnapshot {
    /// Values at the [`LAG_OFFSETS`] offsets from the series end, zero when
    /// the series is shorter than the offset.
    pub lags: [f64; 4],
    /// Trailing 7-day mean at the series end (minimum period 1).
    pub avg_7: f64,
    /// Trailing 28-day mean at the series end (minimum period 1).
    pub avg_28: f64,
}

impl LagSnapshot {
    /// Take the snapshot at the end of an order-count series.
    pub fn at_end(orders: &[f64]) -> Self {
        let n = orders.len();
        let mut lags = [0.0; 4];
        for (slot, lag) in lags.iter_mut().zip(LAG_OFFSETS) {
            if n >= lag {
                *slot = orders[n - lag];
            }
        }
        Self {
            lags,
            avg_7: tail_mean(orders, 7),
            avg_28: tail_mean(orders, 28),
        }
    }
}

/// Trailing rolling mean with a minimum period of 1: entry `i` averages the
/// last `min(window, i + 1)` values.
fn trailing_mean(series: &[f64], window: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(series.len());
    let mut sum = 0.0;
    for i in 0..series.len() {
        sum += series[i];
        if i >= window {
            sum -= series[i - window];
        }
        let span = (i + 1).min(window);
        result.push(sum / span as f64);
    }
    result
}

/// Mean of the last `min(window, len)` values; 0 for an empty series.
fn tail_mean(series: &[f64], window: usize) -> f64 {
    let n = series.len();
    if n == 0 {
        return 0.0;
    }
    let span = n.min(window);
    series[n - span..].iter().sum::<f64>() / span as f64
}
