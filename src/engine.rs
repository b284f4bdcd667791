//! The analytics facade called by the presentation layer.
//!
//! An [`AnalyticsEngine`] wraps the load-once [`OrderTable`] and recomputes
//! every analysis from it on each call. Unknown identifiers are rejected
//! here, before any pipeline work runs.

use crate::analysis::{customer, facility, resources};
use crate::analysis::{
    CustomerForecastConfig, CustomerProfile, CustomerResourceUsage, FacilityForecastConfig,
    ProjectedResourceDay, ResourceAnalysis,
};
use crate::core::{DemandForecast, OrderRecord, OrderTable, ThresholdSplit};
use crate::error::{AnalyticsError, Result};
use crate::models::IsolationForestConfig;
use crate::report;
use chrono::NaiveDate;
use std::path::Path;

/// Stateless analysis API over the immutable source table.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    table: OrderTable,
}

impl AnalyticsEngine {
    /// Wrap an already-loaded table.
    pub fn new(table: OrderTable) -> Self {
        Self { table }
    }

    /// Load the source table from CSV and wrap it.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(OrderTable::from_csv_path(path)?))
    }

    /// The underlying source table.
    pub fn table(&self) -> &OrderTable {
        &self.table
    }

    fn customer_rows(&self, tenant_id: &str) -> Result<Vec<&OrderRecord>> {
        let rows = self.table.customer(tenant_id);
        if rows.is_empty() {
            return Err(AnalyticsError::UnknownCustomer(tenant_id.to_string()));
        }
        Ok(rows)
    }

    fn facility_rows(&self, laundry_id: &str) -> Result<Vec<&OrderRecord>> {
        let rows = self.table.facility(laundry_id);
        if rows.is_empty() {
            return Err(AnalyticsError::UnknownFacility(laundry_id.to_string()));
        }
        Ok(rows)
    }

    /// Behavioural profile for one customer, relative to `as_of`.
    pub fn customer_profile(&self, tenant_id: &str, as_of: NaiveDate) -> Result<CustomerProfile> {
        let rows = self.customer_rows(tenant_id)?;
        tracing::info!(tenant_id, orders = rows.len(), "customer profile requested");
        CustomerProfile::build(&rows, as_of)
    }

    /// 90-day demand forecast for one customer with default settings.
    pub fn customer_forecast(&self, tenant_id: &str) -> Result<DemandForecast> {
        self.customer_forecast_with(tenant_id, &CustomerForecastConfig::default())
    }

    /// Customer demand forecast with explicit settings.
    pub fn customer_forecast_with(
        &self,
        tenant_id: &str,
        config: &CustomerForecastConfig,
    ) -> Result<DemandForecast> {
        let rows = self.customer_rows(tenant_id)?;
        tracing::info!(
            tenant_id,
            orders = rows.len(),
            horizon = config.horizon,
            "customer forecast requested"
        );
        customer::forecast_demand(&rows, self.table.holidays(), config)
    }

    /// Historical per-order resource usage for one customer.
    pub fn customer_resource_usage(&self, tenant_id: &str) -> Result<CustomerResourceUsage> {
        let rows = self.customer_rows(tenant_id)?;
        customer::resource_usage(&rows)
    }

    /// Forecasted resource needs for one customer over the default horizon.
    pub fn customer_resource_projection(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<ProjectedResourceDay>> {
        let usage = self.customer_resource_usage(tenant_id)?;
        let forecast = self.customer_forecast(tenant_id)?;
        Ok(customer::project_resources(&forecast, &usage))
    }

    /// Markdown demand report for one customer.
    pub fn customer_report(&self, tenant_id: &str, as_of: NaiveDate) -> Result<String> {
        let forecast = self.customer_forecast(tenant_id)?;
        let profile = self.customer_profile(tenant_id, as_of)?;
        Ok(report::demand_report(tenant_id, &forecast, &profile))
    }

    /// Demand forecast for one facility over the given horizon.
    pub fn facility_forecast(&self, laundry_id: &str, horizon: usize) -> Result<DemandForecast> {
        let rows = self.facility_rows(laundry_id)?;
        tracing::info!(
            laundry_id,
            orders = rows.len(),
            horizon,
            "facility forecast requested"
        );
        let config = FacilityForecastConfig::default().with_horizon(horizon);
        facility::forecast_demand(&rows, &config)
    }

    /// Forecast one facility and partition the horizon at a peak threshold.
    pub fn facility_peaks(
        &self,
        laundry_id: &str,
        horizon: usize,
        threshold: f64,
    ) -> Result<ThresholdSplit> {
        let forecast = self.facility_forecast(laundry_id, horizon)?;
        Ok(forecast.split_at_threshold(threshold))
    }

    /// Week-ahead low-demand scan for one facility.
    pub fn facility_low_demand(
        &self,
        laundry_id: &str,
        threshold: f64,
    ) -> Result<(DemandForecast, ThresholdSplit)> {
        let rows = self.facility_rows(laundry_id)?;
        facility::detect_low_demand(&rows, threshold, &FacilityForecastConfig::default())
    }

    /// Resource-consumption analysis for one facility.
    pub fn facility_resources(&self, laundry_id: &str) -> Result<ResourceAnalysis> {
        let rows = self.facility_rows(laundry_id)?;
        tracing::info!(
            laundry_id,
            orders = rows.len(),
            "facility resource analysis requested"
        );
        resources::analyze(&rows, &IsolationForestConfig::default())
    }
}
