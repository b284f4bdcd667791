//! Customer-level analytics: demand forecasting, behavioural insights, and
//! resource-usage projection.

use crate::core::{DailySeries, DemandForecast, ForecastRow, OrderRecord};
use crate::error::{AnalyticsError, Result};
use crate::features::{FeatureMatrix, LagSnapshot};
use crate::models::{ForestConfig, RandomForestRegressor, Regressor};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeSet, HashMap};

/// Configuration for the customer demand forecast.
#[derive(Debug, Clone, Copy)]
pub struct CustomerForecastConfig {
    /// Number of future days to predict.
    pub horizon: usize,
    /// Chronological fraction of the feature rows used for training; the
    /// remainder is an internal validation slice only.
    pub train_fraction: f64,
    /// When false (the reference behavior), every horizon day reuses the
    /// lag/rolling values observed at the end of history, so days past the
    /// first are driven almost entirely by calendar features. When true,
    /// each predicted day is appended to the series and the lag/rolling
    /// features are recomputed before predicting the next day.
    pub recursive_lags: bool,
    /// Forest hyperparameters.
    pub forest: ForestConfig,
}

impl Default for CustomerForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 90,
            train_fraction: 0.8,
            recursive_lags: false,
            forest: ForestConfig::default()
                .with_trees(200)
                .with_min_samples_split(5)
                .with_min_samples_leaf(2),
        }
    }
}

/// Forecast daily demand for one customer's order rows.
///
/// The rows must all belong to the same customer; callers resolve unknown
/// identifiers before this point. Short histories degrade gracefully: lag
/// and rolling features zero-fill and the training slice never drops below
/// one row.
pub fn forecast_demand(
    rows: &[&OrderRecord],
    holidays: &BTreeSet<NaiveDate>,
    config: &CustomerForecastConfig,
) -> Result<DemandForecast> {
    let series = DailySeries::from_orders(rows)?;
    let matrix = FeatureMatrix::from_series(&series, holidays);

    let n = matrix.len();
    let train_size = ((n as f64 * config.train_fraction) as usize).clamp(1, n);

    let mut forest = RandomForestRegressor::new(config.forest);
    forest.fit(&matrix.rows()[..train_size], &matrix.targets()[..train_size])?;

    if train_size < n {
        let holdout_pred = forest.predict(&matrix.rows()[train_size..])?;
        let holdout_mae: f64 = holdout_pred
            .iter()
            .zip(&matrix.targets()[train_size..])
            .map(|(p, t)| (p - t).abs())
            .sum::<f64>()
            / (n - train_size) as f64;
        tracing::debug!(
            train_days = train_size,
            holdout_days = n - train_size,
            holdout_mae,
            "fitted customer demand model"
        );
    }

    let origin = series.start_date();
    let last = series.end_date();
    let mut forecast_rows = Vec::with_capacity(config.horizon);

    if config.recursive_lags {
        let mut extended = series.orders().to_vec();
        for step in 1..=config.horizon as i64 {
            let date = last + Duration::days(step);
            let snapshot = LagSnapshot::at_end(&extended);
            let row = FeatureMatrix::future_row(date, origin, &snapshot, holidays);
            let point = forest.predict(&[row])?[0];
            extended.push(point.max(0.0));
            forecast_rows.push(banded_row(date, point));
        }
    } else {
        let snapshot = LagSnapshot::at_end(series.orders());
        let future: Vec<Vec<f64>> = (1..=config.horizon as i64)
            .map(|step| {
                FeatureMatrix::future_row(last + Duration::days(step), origin, &snapshot, holidays)
            })
            .collect();
        let points = forest.predict(&future)?;
        for (step, point) in points.into_iter().enumerate() {
            forecast_rows.push(banded_row(last + Duration::days(step as i64 + 1), point));
        }
    }

    Ok(DemandForecast::new(series, forecast_rows))
}

/// Clamp a raw prediction into a non-negative row with the fixed
/// ±30% fractional band.
fn banded_row(date: NaiveDate, raw: f64) -> ForecastRow {
    ForecastRow {
        date,
        point: raw.max(0.0),
        lower: (raw * 0.7).max(0.0),
        upper: (raw * 1.3).max(0.0),
    }
}

/// Behavioural profile of one customer's order history.
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    /// Total historical orders.
    pub order_count: usize,
    /// Earliest order date.
    pub first_order: NaiveDate,
    /// Latest order date.
    pub last_order: NaiveDate,
    /// Days between the latest order and `as_of`.
    pub days_since_last_order: i64,
    /// Mean gap between consecutive orders, `None` for a single order.
    pub avg_days_between_orders: Option<f64>,
    /// The weekday with the most orders.
    pub top_weekday: Weekday,
    /// Up to three most-ordered items with their counts.
    pub top_items: Vec<(String, usize)>,
    /// Up to three most-used services with their counts.
    pub top_services: Vec<(String, usize)>,
    /// Share of orders placed on weekends, in [0, 1].
    pub weekend_share: f64,
}

impl CustomerProfile {
    /// Build the profile from one customer's rows relative to `as_of`.
    pub fn build(rows: &[&OrderRecord], as_of: NaiveDate) -> Result<Self> {
        if rows.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }

        let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.start_date).collect();
        dates.sort();
        let first_order = dates[0];
        let last_order = dates[dates.len() - 1];

        let avg_days_between_orders = if dates.len() > 1 {
            let total: i64 = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).sum();
            Some(total as f64 / (dates.len() - 1) as f64)
        } else {
            None
        };

        let mut weekday_counts = [0usize; 7];
        for date in &dates {
            weekday_counts[date.weekday().num_days_from_monday() as usize] += 1;
        }
        let top_index = weekday_counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let top_weekday = weekday_from_index(top_index);

        let weekend_orders = rows.iter().filter(|r| r.is_weekend == 1).count();

        Ok(Self {
            order_count: rows.len(),
            first_order,
            last_order,
            days_since_last_order: (as_of - last_order).num_days(),
            avg_days_between_orders,
            top_weekday,
            top_items: top_counts(rows.iter().map(|r| r.item.as_str()), 3),
            top_services: top_counts(rows.iter().map(|r| r.service.as_str()), 3),
            weekend_share: weekend_orders as f64 / rows.len() as f64,
        })
    }

    /// Render the profile as human-readable insight lines.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Days since last order: {} days",
                self.days_since_last_order
            ),
            match self.avg_days_between_orders {
                Some(avg) => format!("Average days between orders: {avg:.1} days"),
                None => "Average days between orders: n/a (single order)".to_string(),
            },
            format!(
                "Most frequent ordering day: {}",
                weekday_name(self.top_weekday)
            ),
        ];
        lines.push(format!("Top items: {}", format_counts(&self.top_items)));
        lines.push(format!(
            "Top services: {}",
            format_counts(&self.top_services)
        ));
        lines
    }
}

fn top_counts<'a>(values: impl Iterator<Item = &'a str>, k: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{name} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn weekday_from_index(index: usize) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Historical resource usage for one customer.
#[derive(Debug, Clone)]
pub struct CustomerResourceUsage {
    /// Mean water per order across the whole history, in litres.
    pub avg_water_per_order: f64,
    /// Mean electricity per order across the whole history, in kWh.
    pub avg_electricity_per_order: f64,
    /// Per-day usage totals on observed days, in date order.
    pub daily: Vec<(NaiveDate, f64, f64)>,
}

/// Aggregate one customer's historical water and electricity usage.
pub fn resource_usage(rows: &[&OrderRecord]) -> Result<CustomerResourceUsage> {
    if rows.is_empty() {
        return Err(AnalyticsError::EmptyData);
    }

    let total_water: f64 = rows.iter().map(|r| r.water_litres).sum();
    let total_electricity: f64 = rows.iter().map(|r| r.electricity_kwh).sum();
    let orders = rows.len() as f64;

    let mut per_day: std::collections::BTreeMap<NaiveDate, (f64, f64)> =
        std::collections::BTreeMap::new();
    for row in rows {
        let entry = per_day.entry(row.start_date).or_insert((0.0, 0.0));
        entry.0 += row.water_litres;
        entry.1 += row.electricity_kwh;
    }

    Ok(CustomerResourceUsage {
        avg_water_per_order: total_water / orders,
        avg_electricity_per_order: total_electricity / orders,
        daily: per_day
            .into_iter()
            .map(|(date, (water, electricity))| (date, water, electricity))
            .collect(),
    })
}

/// Projected resource needs for one forecasted day.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedResourceDay {
    /// The future day.
    pub date: NaiveDate,
    /// Forecasted order count.
    pub orders: f64,
    /// Projected water need, in litres.
    pub water_litres: f64,
    /// Projected electricity need, in kWh.
    pub electricity_kwh: f64,
}

/// Project future resource needs: forecasted orders times the historical
/// per-order averages.
pub fn project_resources(
    forecast: &DemandForecast,
    usage: &CustomerResourceUsage,
) -> Vec<ProjectedResourceDay> {
    forecast
        .rows()
        .iter()
        .map(|row| ProjectedResourceDay {
            date: row.date,
            orders: row.point,
            water_litres: row.point * usage.avg_water_per_order,
            electricity_kwh: row.point * usage.avg_electricity_per_order,
        })
        .collect()
}
