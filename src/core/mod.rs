//! Core data structures: order records, the immutable source table, dense
//! daily series, and forecast containers.

mod daily;
mod forecast;
mod order;

pub use daily::DailySeries;
pub use forecast::{DemandForecast, ForecastRow, ThresholdSplit};
pub use order::{OrderRecord, OrderTable};
