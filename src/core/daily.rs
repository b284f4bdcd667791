//! Dense daily order-count series.

use crate::core::OrderRecord;
use crate::error::{AnalyticsError, Result};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// One row per calendar day between the earliest and latest observed order
/// date, inclusive. Days with no orders are present with a count of zero.
///
/// Invariant: dates are contiguous and strictly increasing; `dates` and
/// `orders` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    orders: Vec<f64>,
}

impl DailySeries {
    /// Build the series from a filtered set of order rows (one customer or
    /// one facility). Input dates need not be sorted.
    ///
    /// Returns [`AnalyticsError::EmptyData`] for an empty input; callers are
    /// expected to have resolved unknown identifiers before this point.
    pub fn from_orders(rows: &[&OrderRecord]) -> Result<Self> {
        if rows.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }

        let mut counts: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for row in rows {
            *counts.entry(row.start_date).or_insert(0.0) += 1.0;
        }

        // BTreeMap iteration is ordered, so first/last are min/max.
        let start = *counts.keys().next().ok_or(AnalyticsError::EmptyData)?;
        let end = *counts.keys().next_back().ok_or(AnalyticsError::EmptyData)?;
        let span = (end - start).num_days();

        let mut dates = Vec::with_capacity(span as usize + 1);
        let mut orders = Vec::with_capacity(span as usize + 1);
        for offset in 0..=span {
            let date = start + Duration::days(offset);
            dates.push(date);
            orders.push(counts.get(&date).copied().unwrap_or(0.0));
        }

        Ok(Self { dates, orders })
    }

    /// Build a series directly from a start date and per-day counts.
    /// Primarily useful for constructing synthetic series.
    pub fn from_counts(start: NaiveDate, counts: Vec<f64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(AnalyticsError::EmptyData);
        }
        let dates = (0..counts.len() as i64)
            .map(|offset| start + Duration::days(offset))
            .collect();
        Ok(Self {
            dates,
            orders: counts,
        })
    }

    /// The calendar days covered, in order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Order counts, parallel to [`dates`](Self::dates).
    pub fn orders(&self) -> &[f64] {
        &self.orders
    }

    /// Number of days covered.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series covers no days. Construction rejects empty input,
    /// so this is false for any built series.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First covered day.
    pub fn start_date(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last covered day.
    pub fn end_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Order count on a specific day, if covered.
    pub fn count_on(&self, date: NaiveDate) -> Option<f64> {
        let offset = (date - self.start_date()).num_days();
        if offset < 0 {
            return None;
        }
        self.orders.get(offset as usize).copied()
    }
}
