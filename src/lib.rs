//! # laundry-analytics
//!
//! Analytics core for a laundry-service operator: ingests historical order
//! records from CSV and derives per-customer demand forecasts with inventory
//! guidance, per-facility peak-day forecasts, resource-consumption anomaly
//! detection, efficiency metrics, and Markdown business reports.
//!
//! The presentation layer (dashboard, charts) is an external caller: it
//! supplies a customer or facility identifier plus a horizon/threshold and
//! renders whatever [`engine::AnalyticsEngine`] returns. Every analysis is a
//! fresh, synchronous recomputation from the immutable [`core::OrderTable`];
//! there is no incremental caching and no shared mutable state.

pub mod analysis;
pub mod core;
pub mod engine;
pub mod error;
pub mod features;
pub mod logging;
pub mod models;
pub mod report;

pub use engine::AnalyticsEngine;
pub use error::{AnalyticsError, Result};

pub mod prelude {
    pub use crate::analysis::{
        CustomerForecastConfig, CustomerProfile, FacilityForecastConfig, ResourceAnalysis,
    };
    pub use crate::core::{DailySeries, DemandForecast, ForecastRow, OrderRecord, OrderTable};
    pub use crate::engine::AnalyticsEngine;
    pub use crate::error::{AnalyticsError, Result};
}
