//! Analysis pipelines: customer demand, facility demand, and resource
//! consumption.
//!
//! Each pipeline is a pure function of a filtered slice of the order table;
//! nothing is cached between requests.

pub mod customer;
pub mod facility;
pub mod resources;

pub use customer::{
    CustomerForecastConfig, CustomerProfile, CustomerResourceUsage, ProjectedResourceDay,
};
pub use facility::FacilityForecastConfig;
pub use resources::{AnomalyLabel, ResourceAnalysis, ResourceDay, LOW_ORDER_ALERT_THRESHOLD};
