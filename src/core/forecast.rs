//! Forecast containers: per-day predictions with confidence bounds.

use crate::core::DailySeries;
use chrono::NaiveDate;

/// One forecasted day.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// The future calendar day.
    pub date: NaiveDate,
    /// Point prediction.
    pub point: f64,
    /// Lower confidence bound (`lower <= point`).
    pub lower: f64,
    /// Upper confidence bound (`point <= upper`).
    pub upper: f64,
}

/// A demand forecast: the historical actuals it was fitted on plus one
/// [`ForecastRow`] per horizon day.
#[derive(Debug, Clone)]
pub struct DemandForecast {
    history: DailySeries,
    rows: Vec<ForecastRow>,
}

impl DemandForecast {
    pub(crate) fn new(history: DailySeries, rows: Vec<ForecastRow>) -> Self {
        Self { history, rows }
    }

    /// The historical daily series the model was fitted on.
    pub fn history(&self) -> &DailySeries {
        &self.history
    }

    /// Forecast rows, in date order.
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Number of forecasted days.
    pub fn horizon(&self) -> usize {
        self.rows.len()
    }

    /// First forecasted day, if any.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    /// Last forecasted day, if any.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Mean of the point predictions (0 for an empty horizon).
    pub fn mean_point(&self) -> f64 {
        mean(self.rows.iter().map(|r| r.point))
    }

    /// Mean of the lower bounds.
    pub fn mean_lower(&self) -> f64 {
        mean(self.rows.iter().map(|r| r.lower))
    }

    /// Mean of the upper bounds.
    pub fn mean_upper(&self) -> f64 {
        mean(self.rows.iter().map(|r| r.upper))
    }

    /// Sum of the point predictions.
    pub fn total_point(&self) -> f64 {
        self.rows.iter().map(|r| r.point).sum()
    }

    /// Largest point prediction (0 for an empty horizon).
    pub fn max_point(&self) -> f64 {
        self.rows.iter().map(|r| r.point).fold(0.0, f64::max)
    }

    /// Partition the horizon at a demand threshold.
    ///
    /// Days at or above the threshold are peak days, days below are
    /// low-demand days. The split is total: every row lands in exactly one
    /// side, with no smoothing or hysteresis.
    pub fn split_at_threshold(&self, threshold: f64) -> ThresholdSplit {
        let (peak, low) = self
            .rows
            .iter()
            .cloned()
            .partition(|row| row.point >= threshold);
        ThresholdSplit {
            threshold,
            peak,
            low,
        }
    }
}

/// Result of partitioning a forecast at a demand threshold.
#[derive(Debug, Clone)]
pub struct ThresholdSplit {
    /// The threshold used.
    pub threshold: f64,
    /// Days with predicted demand at or above the threshold.
    pub peak: Vec<ForecastRow>,
    /// Days with predicted demand below the threshold.
    pub low: Vec<ForecastRow>,
}

impl ThresholdSplit {
    /// Whether any peak days were detected.
    pub fn has_peaks(&self) -> bool {
        !self.peak.is_empty()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn forecast_with_points(points: &[f64]) -> DemandForecast {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let history = DailySeries::from_counts(start, vec![1.0, 2.0]).unwrap();
        let rows = points
            .iter()
            .enumerate()
            .map(|(i, &p)| ForecastRow {
                date: start + chrono::Duration::days(2 + i as i64),
                point: p,
                lower: p - 1.5,
                upper: p + 1.5,
            })
            .collect();
        DemandForecast::new(history, rows)
    }

    #[test]
    fn summary_statistics() {
        let forecast = forecast_with_points(&[2.0, 4.0, 6.0]);
        assert_relative_eq!(forecast.mean_point(), 4.0);
        assert_relative_eq!(forecast.total_point(), 12.0);
        assert_relative_eq!(forecast.max_point(), 6.0);
        assert_eq!(forecast.horizon(), 3);
    }

    #[test]
    fn threshold_split_is_total_and_inclusive() {
        let forecast = forecast_with_points(&[2.0, 5.0, 7.0]);
        let split = forecast.split_at_threshold(5.0);

        // 5.0 sits exactly at the threshold and counts as peak.
        assert_eq!(split.peak.len(), 2);
        assert_eq!(split.low.len(), 1);
        assert_eq!(split.peak.len() + split.low.len(), forecast.horizon());
        assert!(split.has_peaks());
    }

    #[test]
    fn empty_horizon_means() {
        let forecast = forecast_with_points(&[]);
        assert_eq!(forecast.mean_point(), 0.0);
        assert_eq!(forecast.start_date(), None);
    }
}
