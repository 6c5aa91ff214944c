//! The crate's only I/O boundary: reading the static budget JSON and the
//! auxiliary macroeconomic index CSV.
//!
//! Load-level failures (missing file, unreadable JSON, wrong root shape) are
//! hard errors carrying the path and a human-readable message, and nothing
//! partial escapes. A single corrupt record inside an otherwise valid
//! document is skipped with a warning instead of blocking the dashboard.

use crate::error::{DashboardError, Result};
use crate::schema::{BudgetEntry, QuarterKey, QuarterlyBudget, Subfunction};
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Reads and validates the quarterly budget document.
pub fn load_quarterly_budget(path: impl AsRef<Path>) -> Result<QuarterlyBudget> {
    let path = path.as_ref();
    let data_load = |details: String| DashboardError::DataLoad {
        path: path.display().to_string(),
        details,
    };

    let raw = fs::read_to_string(path).map_err(|e| data_load(e.to_string()))?;
    let document: Value =
        serde_json::from_str(&raw).map_err(|e| data_load(format!("invalid JSON: {}", e)))?;
    let object = document
        .as_object()
        .ok_or_else(|| data_load("expected a JSON object keyed by quarter".to_string()))?;

    let mut quarters = BTreeMap::new();
    for (key, quarter_value) in object {
        let quarter: QuarterKey = match key.parse() {
            Ok(q) => q,
            Err(_) => {
                warn!("Skipping quarter '{}': key is not in YYYYQn form", key);
                continue;
            }
        };

        let items = match quarter_value.as_array() {
            Some(items) => items,
            None => {
                warn!("Skipping quarter '{}': value is not an array", key);
                continue;
            }
        };

        let mut entries = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match validate_entry(item, quarter) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    warn!("Skipping record #{} in quarter {}: {}", idx, quarter, reason);
                }
            }
        }
        quarters.insert(quarter, entries);
    }

    if quarters.is_empty() {
        return Err(DashboardError::EmptyBudget);
    }

    info!(
        "Loaded {} quarters from {}",
        quarters.len(),
        path.display()
    );

    Ok(QuarterlyBudget { quarters })
}

fn validate_entry(item: &Value, quarter: QuarterKey) -> std::result::Result<BudgetEntry, String> {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or("missing or empty 'name'")?;

    let amount = validate_amount(item)?;

    let mut subfunctions = Vec::new();
    if let Some(raw_subs) = item.get("subfunctions") {
        let subs = raw_subs
            .as_array()
            .ok_or("'subfunctions' is not an array")?;
        for (idx, sub) in subs.iter().enumerate() {
            match validate_subfunction(sub) {
                Ok(subfunction) => subfunctions.push(subfunction),
                Err(reason) => {
                    warn!(
                        "Skipping subfunction #{} of '{}' in quarter {}: {}",
                        idx, name, quarter, reason
                    );
                }
            }
        }
    }

    Ok(BudgetEntry {
        name: name.to_string(),
        amount,
        subfunctions,
    })
}

fn validate_subfunction(item: &Value) -> std::result::Result<Subfunction, String> {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or("missing or empty 'name'")?;
    let amount = validate_amount(item)?;

    Ok(Subfunction {
        name: name.to_string(),
        amount,
    })
}

fn validate_amount(item: &Value) -> std::result::Result<f64, String> {
    let amount = item
        .get("amount")
        .and_then(Value::as_f64)
        .ok_or("missing or non-numeric 'amount'")?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("'amount' {} is not a non-negative number", amount));
    }
    Ok(amount)
}

/// One observation of the macroeconomic index overlaid on the event chart.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Reads a quarterly index CSV with a header row and two columns: a quarter
/// key and a numeric value. Malformed rows are skipped with a warning.
pub fn load_index_series(path: impl AsRef<Path>) -> Result<Vec<IndexPoint>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| DashboardError::DataLoad {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping index row #{}: {}", idx, e);
                continue;
            }
        };

        let quarter = record.get(0).and_then(|q| q.parse::<QuarterKey>().ok());
        let value = record.get(1).and_then(|v| v.trim().parse::<f64>().ok());

        match (quarter, value) {
            (Some(quarter), Some(value)) if value.is_finite() => points.push(IndexPoint {
                date: quarter.start_date(),
                value,
            }),
            _ => warn!("Skipping index row #{}: bad quarter key or value", idx),
        }
    }

    points.sort_by_key(|p| p.date);
    info!("Loaded {} index points from {}", points.len(), path.display());

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_document() {
        let file = write_temp(
            r#"{
                "2023Q1": [
                    {"name": "Health", "amount": 100.0,
                     "subfunctions": [{"name": "Medicare", "amount": 60.0}]},
                    {"name": "National Defense", "amount": 300.0}
                ],
                "2023Q2": [{"name": "Health", "amount": 200.0}]
            }"#,
            ".json",
        );

        let budget = load_quarterly_budget(file.path()).unwrap();
        assert_eq!(budget.quarters.len(), 2);

        let q1 = &budget.quarters[&"2023Q1".parse().unwrap()];
        assert_eq!(q1.len(), 2);
        assert_eq!(q1[0].subfunctions[0].name, "Medicare");
    }

    #[test]
    fn test_malformed_records_are_skipped_not_fatal() {
        let file = write_temp(
            r#"{
                "2023Q1": [
                    {"name": "Health", "amount": 100.0},
                    {"name": "", "amount": 5.0},
                    {"amount": 7.0},
                    {"name": "Bad Amount", "amount": "lots"},
                    {"name": "Negative", "amount": -3.0}
                ],
                "not-a-quarter": [{"name": "Health", "amount": 1.0}]
            }"#,
            ".json",
        );

        let budget = load_quarterly_budget(file.path()).unwrap();
        assert_eq!(budget.quarters.len(), 1);
        let q1 = &budget.quarters[&"2023Q1".parse().unwrap()];
        assert_eq!(q1.len(), 1);
        assert_eq!(q1[0].name, "Health");
    }

    #[test]
    fn test_malformed_subfunction_keeps_entry() {
        let file = write_temp(
            r#"{
                "2023Q1": [
                    {"name": "Health", "amount": 100.0,
                     "subfunctions": [
                        {"name": "Medicare", "amount": 60.0},
                        {"name": "Broken"}
                     ]}
                ]
            }"#,
            ".json",
        );

        let budget = load_quarterly_budget(file.path()).unwrap();
        let q1 = &budget.quarters[&"2023Q1".parse().unwrap()];
        assert_eq!(q1[0].subfunctions.len(), 1);
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let err = load_quarterly_budget("/no/such/budget.json").unwrap_err();
        match err {
            DashboardError::DataLoad { path, .. } => assert!(path.contains("budget.json")),
            other => panic!("expected DataLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_data_load_error() {
        let file = write_temp("{not json", ".json");
        assert!(matches!(
            load_quarterly_budget(file.path()),
            Err(DashboardError::DataLoad { .. })
        ));

        let file = write_temp(r#"[1, 2, 3]"#, ".json");
        assert!(matches!(
            load_quarterly_budget(file.path()),
            Err(DashboardError::DataLoad { .. })
        ));
    }

    #[test]
    fn test_all_quarters_invalid_is_empty_budget() {
        let file = write_temp(r#"{"bogus": []}"#, ".json");
        assert!(matches!(
            load_quarterly_budget(file.path()),
            Err(DashboardError::EmptyBudget)
        ));
    }

    #[test]
    fn test_load_index_series() {
        let file = write_temp(
            "quarter,CPIAUCSL\n2020Q1,258.8\n2020Q2,256.4\nbogus,1.0\n2020Q3,not-a-number\n",
            ".csv",
        );

        let points = load_index_series(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(points[0].value, 258.8);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
    }
}
