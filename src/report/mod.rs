//! Business-report synthesis and flat-file report storage.

mod store;
mod synthesizer;

pub use store::{load_report, save_report, DEFAULT_REPORT_DIR};
pub use synthesizer::{
    delivery_cadence, demand_report, demand_watch_window, inventory_posture,
    stock_allocation_percent, stockout_risk, volatility, waste_potential,
};
