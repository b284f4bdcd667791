//! Calendar features derived from a date by pure arithmetic.

use chrono::{Datelike, NaiveDate};

/// Day of week, Monday = 0 through Sunday = 6.
pub fn day_of_week(date: NaiveDate) -> f64 {
    date.weekday().num_days_from_monday() as f64
}

/// 1.0 on Saturday/Sunday, 0.0 otherwise.
pub fn is_weekend(date: NaiveDate) -> f64 {
    if date.weekday().num_days_from_monday() >= 5 {
        1.0
    } else {
        0.0
    }
}

/// Calendar month, 1 through 12.
pub fn month(date: NaiveDate) -> f64 {
    date.month() as f64
}

/// Day of month, 1 through 31.
pub fn day_of_month(date: NaiveDate) -> f64 {
    date.day() as f64
}

/// Day of year, 1 through 366.
pub fn day_of_year(date: NaiveDate) -> f64 {
    date.ordinal() as f64
}

/// ISO 8601 week number, 1 through 53.
pub fn iso_week(date: NaiveDate) -> f64 {
    date.iso_week().week() as f64
}

/// The reduced facility feature vector: day-of-year, day-of-week,
/// ISO week-of-year.
pub fn seasonal_row(date: NaiveDate) -> Vec<f64> {
    vec![day_of_year(date), day_of_week(date), iso_week(date)]
}
