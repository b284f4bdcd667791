//! End-to-end scenarios over the full pipeline, from CSV to reports.

use chrono::{Duration, NaiveDate};
use laundry_analytics::analysis::AnomalyLabel;
use laundry_analytics::core::{OrderRecord, OrderTable};
use laundry_analytics::features::FeatureMatrix;
use laundry_analytics::report;
use laundry_analytics::{AnalyticsEngine, AnalyticsError};
use std::collections::BTreeSet;
use std::fmt::Write as _;

fn order(
    tenant: &str,
    laundry: &str,
    date: NaiveDate,
    water: f64,
    electricity: f64,
) -> OrderRecord {
    OrderRecord {
        tenant_id: tenant.to_string(),
        laundry_id: laundry.to_string(),
        start_date: date,
        item: "Shirts".to_string(),
        service: "Wash".to_string(),
        water_litres: water,
        electricity_kwh: electricity,
        is_holiday: 0,
        is_weekend: 0,
    }
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

#[test]
fn steady_facility_forecasts_near_its_mean() {
    laundry_analytics::logging::init_test();
    // Repeated initialization is tolerated across test functions.
    laundry_analytics::logging::init_test();

    // 30 consecutive days with exactly three orders each.
    let mut records = Vec::new();
    for offset in 0..30 {
        for _ in 0..3 {
            records.push(order("T1", "L1", start() + Duration::days(offset), 45.0, 2.0));
        }
    }
    let engine = AnalyticsEngine::new(OrderTable::from_records(records));

    let forecast = engine.facility_forecast("L1", 7).unwrap();
    assert_eq!(forecast.horizon(), 7);
    for row in forecast.rows() {
        assert!(row.point >= 0.0);
        assert!(
            (row.point - 3.0).abs() < 1.0,
            "point {} strays from the historical mean",
            row.point
        );
    }
}

#[test]
fn five_day_customer_history_produces_full_forecast() {
    // Far less history than the largest lag window of 28 days.
    let records: Vec<OrderRecord> = (0..5)
        .map(|offset| order("T2", "L1", start() + Duration::days(offset), 40.0, 2.0))
        .collect();
    let engine = AnalyticsEngine::new(OrderTable::from_records(records.clone()));

    let forecast = engine.customer_forecast("T2").unwrap();
    assert_eq!(forecast.horizon(), 90);
    assert!(forecast.rows().iter().all(|r| r.point >= 0.0));

    // The early lag features are zero for every offset the history cannot
    // cover yet.
    let refs: Vec<&OrderRecord> = records.iter().collect();
    let series = laundry_analytics::core::DailySeries::from_orders(&refs).unwrap();
    let matrix = FeatureMatrix::from_series(&series, &BTreeSet::new());
    for row in matrix.rows() {
        // lag_7, lag_14, lag_28 columns are all unreachable in 5 days.
        assert_eq!(row[8], 0.0);
        assert_eq!(row[9], 0.0);
        assert_eq!(row[10], 0.0);
    }
}

#[test]
fn water_spike_on_quiet_day_raises_the_alert() {
    let mut records = Vec::new();
    // Baseline: around ten orders a day at 50 L each.
    for offset in 0..30 {
        let count = 9 + (offset % 3);
        for _ in 0..count {
            records.push(order("T1", "L5", start() + Duration::days(offset), 50.0, 2.5));
        }
    }
    // Spike day: two orders consuming ten times the usual daily water.
    for _ in 0..2 {
        records.push(order("T1", "L5", start() + Duration::days(30), 2500.0, 2.5));
    }

    let engine = AnalyticsEngine::new(OrderTable::from_records(records));
    let analysis = engine.facility_resources("L5").unwrap();

    let spike_date = start() + Duration::days(30);
    let spike = analysis
        .days
        .iter()
        .find(|d| d.date == spike_date)
        .expect("spike day missing from analysis");

    assert_eq!(spike.label, AnomalyLabel::Anomaly);
    assert_eq!(spike.label.to_string(), "Anomaly");
    assert!(spike.alert);
    assert_eq!(spike.alert_message(), Some("high usage on low order day"));

    // High-volume days never alert, anomalous or not.
    for day in &analysis.days {
        if day.order_count >= 5.0 {
            assert!(!day.alert);
        }
    }
}

#[test]
fn unknown_customer_returns_no_data_not_a_panic() {
    let records = vec![order("T1", "L1", start(), 40.0, 2.0)];
    let engine = AnalyticsEngine::new(OrderTable::from_records(records));

    match engine.customer_forecast("T999") {
        Err(AnalyticsError::UnknownCustomer(id)) => assert_eq!(id, "T999"),
        other => panic!("expected UnknownCustomer, got {other:?}"),
    }
}

#[test]
fn report_round_trips_byte_identically() {
    let mut records = Vec::new();
    for offset in 0..21 {
        records.push(order("T3", "L1", start() + Duration::days(offset), 40.0, 2.0));
    }
    let engine = AnalyticsEngine::new(OrderTable::from_records(records));

    let as_of = start() + Duration::days(30);
    let text = engine.customer_report("T3", as_of).unwrap();

    let dir = tempfile::tempdir().unwrap();
    report::save_report(dir.path(), "customer_T3_report.md", &text).unwrap();
    let loaded = report::load_report(dir.path(), "customer_T3_report.md")
        .unwrap()
        .expect("report should exist after saving");

    assert_eq!(loaded, text);
}

#[test]
fn csv_load_feeds_the_whole_pipeline() {
    let mut csv = String::from(
        "TenantID,LaundryID,StartDate,Item,Service,Water_Litres,Electricity_kWh,IsHoliday,IsWeekend\n",
    );
    for offset in 0..25i64 {
        let date = start() + Duration::days(offset);
        for _ in 0..2 {
            writeln!(csv, "T1,L1,{date},Shirts,Wash,42.0,2.1,0,0").unwrap();
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.csv");
    std::fs::write(&path, &csv).unwrap();

    let engine = AnalyticsEngine::from_csv_path(&path).unwrap();
    assert_eq!(engine.table().len(), 50);

    let forecast = engine.facility_forecast("L1", 14).unwrap();
    assert_eq!(forecast.horizon(), 14);

    let split = engine.facility_peaks("L1", 14, 2.0).unwrap();
    assert_eq!(split.peak.len() + split.low.len(), 14);

    let analysis = engine.facility_resources("L1").unwrap();
    assert_eq!(analysis.days.len(), 25);
    assert!((analysis.avg_water_per_order - 42.0).abs() < 1e-9);
}

#[test]
fn repeated_analyses_share_the_immutable_table() {
    let mut records = Vec::new();
    for offset in 0..20 {
        records.push(order("T1", "L1", start() + Duration::days(offset), 40.0, 2.0));
    }
    let engine = AnalyticsEngine::new(OrderTable::from_records(records));

    // Same request twice: identical output, untouched table.
    let a = engine.customer_forecast("T1").unwrap();
    let b = engine.customer_forecast("T1").unwrap();
    assert_eq!(a.rows(), b.rows());
    assert_eq!(engine.table().len(), 20);
}
