//! Quickstart: build a small synthetic order table and walk through the
//! customer and facility analyses.
//!
//! Run with: cargo run --example quickstart

use chrono::{Duration, NaiveDate};
use laundry_analytics::core::{OrderRecord, OrderTable};
use laundry_analytics::report;
use laundry_analytics::{logging, AnalyticsEngine, Result};

fn main() -> Result<()> {
    logging::init();

    let table = OrderTable::from_records(synthetic_orders());
    println!(
        "Loaded {} orders across customers {:?} and facilities {:?}\n",
        table.len(),
        table.customer_ids(),
        table.facility_ids()
    );

    let engine = AnalyticsEngine::new(table);
    let as_of = NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date");

    // Customer profile and forecast.
    let profile = engine.customer_profile("T1", as_of)?;
    println!("== Customer T1 profile ==");
    for line in profile.summary_lines() {
        println!("  - {line}");
    }

    let forecast = engine.customer_forecast("T1")?;
    println!(
        "\n90-day forecast: avg {:.2} orders/day, {:.0} total",
        forecast.mean_point(),
        forecast.total_point()
    );

    // Facility peaks and resource anomalies.
    let split = engine.facility_peaks("L1", 30, 5.0)?;
    println!(
        "\n== Facility L1 ==\nPeak days over the next 30: {} (threshold 5.0)",
        split.peak.len()
    );

    let analysis = engine.facility_resources("L1")?;
    println!(
        "Resource anomalies: {} of {} days, {} alert(s)",
        analysis.anomalies().len(),
        analysis.days.len(),
        analysis.alerts().len()
    );
    for day in analysis.alerts() {
        println!(
            "  {}: {} orders, {:.0} L water -> {}",
            day.date,
            day.order_count,
            day.water_litres,
            day.alert_message().unwrap_or("n/a")
        );
    }

    // Business report, persisted under the reports directory.
    let text = engine.customer_report("T1", as_of)?;
    let path = report::save_report(report::DEFAULT_REPORT_DIR, "customer_T1_report.md", &text)?;
    println!("\nReport written to {}", path.display());

    Ok(())
}

/// Eight weeks of orders: customer T1 orders most weekdays, the facility
/// serves several other customers, and one quiet day hides a water spike.
fn synthetic_orders() -> Vec<OrderRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date");
    let items = ["Shirts", "Bedding", "Towels"];
    let services = ["Wash", "Dry Clean"];

    let mut records = Vec::new();
    for offset in 0..56i64 {
        let date = start + Duration::days(offset);
        let weekday = offset % 7;
        let is_weekend = u8::from(weekday >= 5);

        // T1: orders on Mondays, Wednesdays, and Saturdays.
        if matches!(weekday, 0 | 2 | 5) {
            records.push(row("T1", date, items[0], services[0], 40.0, 2.0, is_weekend));
        }

        // Background demand from other customers, heavier midweek.
        let background = if weekday < 5 { 6 } else { 3 };
        for i in 0..background {
            records.push(row(
                if i % 2 == 0 { "T2" } else { "T3" },
                date,
                items[(offset as usize + i) % items.len()],
                services[i % services.len()],
                48.0,
                2.4,
                is_weekend,
            ));
        }
    }

    // A nearly idle day with a leak-sized water reading.
    let quiet = start + Duration::days(56);
    records.push(row("T2", quiet, "Towels", "Wash", 2600.0, 2.4, 0));
    records.push(row("T3", quiet, "Shirts", "Wash", 2600.0, 2.4, 0));
    records
}

#[allow(clippy::too_many_arguments)]
fn row(
    tenant: &str,
    date: NaiveDate,
    item: &str,
    service: &str,
    water: f64,
    electricity: f64,
    is_weekend: u8,
) -> OrderRecord {
    OrderRecord {
        tenant_id: tenant.to_string(),
        laundry_id: "L1".to_string(),
        start_date: date,
        item: item.to_string(),
        service: service.to_string(),
        water_litres: water,
        electricity_kwh: electricity,
        is_holiday: 0,
        is_weekend,
    }
}
