//! Order records and the immutable source table.

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// A single historical order row.
///
/// Loaded once per process from the source CSV and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Customer identifier, e.g. `"T1"`.
    pub tenant_id: String,
    /// Facility identifier, e.g. `"L3"`.
    pub laundry_id: String,
    /// Order start date (day granularity).
    pub start_date: NaiveDate,
    /// Item type, e.g. `"Shirts"`.
    pub item: String,
    /// Service type, e.g. `"Wash & Fold"`.
    pub service: String,
    /// Water consumed by the order, in litres.
    pub water_litres: f64,
    /// Electricity consumed by the order, in kWh.
    pub electricity_kwh: f64,
    /// 1 when the order date was a holiday.
    pub is_holiday: u8,
    /// 1 when the order date fell on a weekend.
    pub is_weekend: u8,
}

/// Raw CSV row before date parsing.
#[derive(Debug, Deserialize)]
struct RawOrder {
    #[serde(rename = "TenantID")]
    tenant_id: String,
    #[serde(rename = "LaundryID")]
    laundry_id: String,
    #[serde(rename = "StartDate")]
    start_date: String,
    #[serde(rename = "Item")]
    item: String,
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "Water_Litres")]
    water_litres: f64,
    #[serde(rename = "Electricity_kWh")]
    electricity_kwh: f64,
    #[serde(rename = "IsHoliday")]
    is_holiday: u8,
    #[serde(rename = "IsWeekend")]
    is_weekend: u8,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];

fn parse_start_date(value: &str) -> Result<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(date);
        }
    }
    Err(AnalyticsError::DateParse {
        column: "StartDate",
        value: value.to_string(),
    })
}

impl TryFrom<RawOrder> for OrderRecord {
    type Error = AnalyticsError;

    fn try_from(raw: RawOrder) -> Result<Self> {
        Ok(OrderRecord {
            start_date: parse_start_date(&raw.start_date)?,
            tenant_id: raw.tenant_id,
            laundry_id: raw.laundry_id,
            item: raw.item,
            service: raw.service,
            water_litres: raw.water_litres,
            electricity_kwh: raw.electricity_kwh,
            is_holiday: raw.is_holiday,
            is_weekend: raw.is_weekend,
        })
    }
}

/// The load-once, read-only table of order records plus the global holiday
/// calendar derived from it.
///
/// Every analysis borrows this table; nothing in the pipeline mutates it.
#[derive(Debug, Clone)]
pub struct OrderTable {
    records: Vec<OrderRecord>,
    holidays: BTreeSet<NaiveDate>,
}

impl OrderTable {
    /// Build a table from already-parsed records.
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        let holidays = records
            .iter()
            .filter(|r| r.is_holiday == 1)
            .map(|r| r.start_date)
            .collect();
        Self { records, holidays }
    }

    /// Load the table from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_csv_reader(file)?;
        tracing::info!(
            path = %path.display(),
            records = table.len(),
            holidays = table.holidays.len(),
            "loaded order table"
        );
        Ok(table)
    }

    /// Load the table from any CSV reader.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize::<RawOrder>() {
            records.push(OrderRecord::try_from(row?)?);
        }
        Ok(Self::from_records(records))
    }

    /// All records, in file order.
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dates flagged as holidays anywhere in the table.
    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Whether the given date is a known holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Rows belonging to one customer. Empty means unknown identifier.
    pub fn customer(&self, tenant_id: &str) -> Vec<&OrderRecord> {
        self.records
            .iter()
            .filter(|r| r.tenant_id == tenant_id)
            .collect()
    }

    /// Rows belonging to one facility. Empty means unknown identifier.
    pub fn facility(&self, laundry_id: &str) -> Vec<&OrderRecord> {
        self.records
            .iter()
            .filter(|r| r.laundry_id == laundry_id)
            .collect()
    }

    /// Distinct customer identifiers, sorted.
    pub fn customer_ids(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.tenant_id.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// Distinct facility identifiers, sorted.
    pub fn facility_ids(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.laundry_id.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tenant: &str, laundry: &str, date: &str, holiday: u8) -> OrderRecord {
        OrderRecord {
            tenant_id: tenant.to_string(),
            laundry_id: laundry.to_string(),
            start_date: date.parse().unwrap(),
            item: "Shirts".to_string(),
            service: "Wash".to_string(),
            water_litres: 30.0,
            electricity_kwh: 1.5,
            is_holiday: holiday,
            is_weekend: 0,
        }
    }

    #[test]
    fn loads_records_from_csv() {
        let data = "\
TenantID,LaundryID,StartDate,Item,Service,Water_Litres,Electricity_kWh,IsHoliday,IsWeekend
T1,L1,2025-03-01,Shirts,Wash,32.5,1.8,0,1
T2,L1,2025-03-02,Bedding,Dry Clean,55.0,3.2,1,1
";
        let table = OrderTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].tenant_id, "T1");
        assert_eq!(
            table.records()[1].start_date,
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
        assert!(table.is_holiday(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()));
        assert!(!table.is_holiday(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
    }

    #[test]
    fn rejects_malformed_dates() {
        let data = "\
TenantID,LaundryID,StartDate,Item,Service,Water_Litres,Electricity_kWh,IsHoliday,IsWeekend
T1,L1,first of March,Shirts,Wash,32.5,1.8,0,0
";
        let err = OrderTable::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyticsError::DateParse { .. }));
    }

    #[test]
    fn accepts_alternate_date_formats() {
        assert_eq!(
            parse_start_date("2025/03/01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(
            parse_start_date("01-03-2025").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn filters_by_customer_and_facility() {
        let table = OrderTable::from_records(vec![
            record("T1", "L1", "2025-03-01", 0),
            record("T1", "L2", "2025-03-02", 0),
            record("T2", "L1", "2025-03-03", 0),
        ]);

        assert_eq!(table.customer("T1").len(), 2);
        assert_eq!(table.facility("L1").len(), 2);
        assert!(table.customer("T999").is_empty());
        assert_eq!(table.customer_ids(), vec!["T1", "T2"]);
        assert_eq!(table.facility_ids(), vec!["L1", "L2"]);
    }
}
