//! Facility-level demand forecasting and peak/low-demand detection.
//!
//! The facility model uses calendar features only (day-of-year, day-of-week,
//! ISO week) — no lag or rolling features and no validation split: the
//! forest is fitted on the full zero-filled series.

use crate::core::{DailySeries, DemandForecast, ForecastRow, OrderRecord, ThresholdSplit};
use crate::error::Result;
use crate::features::seasonal_row;
use crate::models::{ForestConfig, RandomForestRegressor, Regressor};
use chrono::Duration;

/// Horizon used by the low-demand scan.
pub const LOW_DEMAND_HORIZON: usize = 7;

/// Configuration for the facility demand forecast.
#[derive(Debug, Clone, Copy)]
pub struct FacilityForecastConfig {
    /// Number of future days to predict (7, 14, or 30 at the call sites).
    pub horizon: usize,
    /// Additive confidence band half-width around the point prediction.
    pub band: f64,
    /// Forest hyperparameters.
    pub forest: ForestConfig,
}

impl Default for FacilityForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 14,
            band: 1.5,
            forest: ForestConfig::default(),
        }
    }
}

impl FacilityForecastConfig {
    /// Set the forecast horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }
}

/// Forecast daily demand for one facility's order rows.
///
/// The rows must all belong to the same facility; callers resolve unknown
/// identifiers before this point.
pub fn forecast_demand(
    rows: &[&OrderRecord],
    config: &FacilityForecastConfig,
) -> Result<DemandForecast> {
    let series = DailySeries::from_orders(rows)?;

    let feature_rows: Vec<Vec<f64>> = series.dates().iter().map(|&d| seasonal_row(d)).collect();

    let mut forest = RandomForestRegressor::new(config.forest);
    forest.fit(&feature_rows, series.orders())?;
    tracing::debug!(
        days = series.len(),
        horizon = config.horizon,
        "fitted facility demand model"
    );

    let last = series.end_date();
    let future: Vec<Vec<f64>> = (1..=config.horizon as i64)
        .map(|step| seasonal_row(last + Duration::days(step)))
        .collect();
    let points = forest.predict(&future)?;

    let rows = points
        .into_iter()
        .enumerate()
        .map(|(step, point)| ForecastRow {
            date: last + Duration::days(step as i64 + 1),
            point,
            lower: point - config.band,
            upper: point + config.band,
        })
        .collect();

    Ok(DemandForecast::new(series, rows))
}

/// Forecast a week ahead and partition it at a low-demand threshold.
///
/// Days below the threshold are candidates for maintenance windows and
/// reduced staffing; days at or above it are business as usual.
pub fn detect_low_demand(
    rows: &[&OrderRecord],
    threshold: f64,
    config: &FacilityForecastConfig,
) -> Result<(DemandForecast, ThresholdSplit)> {
    let config = FacilityForecastConfig {
        horizon: LOW_DEMAND_HORIZON,
        ..*config
    };
    let forecast = forecast_demand(rows, &config)?;
    let split = forecast.split_at_threshold(threshold);
    Ok((forecast, split))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(date: NaiveDate) -> OrderRecord {
        OrderRecord {
            tenant_id: "T1".to_string(),
            laundry_id: "L1".to_string(),
            start_date: date,
            item: "Shirts".to_string(),
            service: "Wash".to_string(),
            water_litres: 30.0,
            electricity_kwh: 1.5,
            is_holiday: 0,
            is_weekend: 0,
        }
    }

    fn constant_demand(days: i64, per_day: usize) -> Vec<OrderRecord> {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        (0..days)
            .flat_map(|offset| {
                (0..per_day)
                    .map(move |_| order(start + Duration::days(offset)))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn constant_demand_forecasts_near_the_mean() {
        let rows = constant_demand(30, 3);
        let refs: Vec<&OrderRecord> = rows.iter().collect();
        let config = FacilityForecastConfig::default().with_horizon(7);

        let forecast = forecast_demand(&refs, &config).unwrap();
        assert_eq!(forecast.horizon(), 7);
        for row in forecast.rows() {
            assert!(
                (row.point - 3.0).abs() < 0.5,
                "expected near 3.0, got {}",
                row.point
            );
            assert!(row.point >= 0.0);
        }
    }

    #[test]
    fn band_is_additive_and_ordered() {
        let rows = constant_demand(20, 2);
        let refs: Vec<&OrderRecord> = rows.iter().collect();
        let forecast = forecast_demand(&refs, &FacilityForecastConfig::default()).unwrap();

        for row in forecast.rows() {
            assert!((row.upper - row.point - 1.5).abs() < 1e-9);
            assert!((row.point - row.lower - 1.5).abs() < 1e-9);
            assert!(row.lower <= row.point && row.point <= row.upper);
        }
    }

    #[test]
    fn threshold_partition_is_total() {
        let rows = constant_demand(30, 3);
        let refs: Vec<&OrderRecord> = rows.iter().collect();
        let forecast = forecast_demand(
            &refs,
            &FacilityForecastConfig::default().with_horizon(14),
        )
        .unwrap();

        let split = forecast.split_at_threshold(3.0);
        assert_eq!(split.peak.len() + split.low.len(), 14);

        // Constant demand of 3 sits at the threshold: peak by the
        // at-or-above rule.
        let high_split = forecast.split_at_threshold(10.0);
        assert!(!high_split.has_peaks());
        assert_eq!(high_split.low.len(), 14);
    }

    #[test]
    fn low_demand_scan_uses_week_horizon() {
        let rows = constant_demand(25, 1);
        let refs: Vec<&OrderRecord> = rows.iter().collect();
        let (forecast, split) =
            detect_low_demand(&refs, 5.0, &FacilityForecastConfig::default()).unwrap();

        assert_eq!(forecast.horizon(), LOW_DEMAND_HORIZON);
        // One order a day is far below the threshold of five.
        assert_eq!(split.low.len(), LOW_DEMAND_HORIZON);
        assert!(!split.has_peaks());
    }
}
