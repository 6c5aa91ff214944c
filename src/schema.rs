use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Identifier of a fiscal quarter, parsed from the `YYYYQn` form used as the
/// key set of the raw budget document. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuarterKey {
    year: u16,
    quarter: u8,
}

impl QuarterKey {
    pub fn new(year: u16, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(DashboardError::InvalidQuarterKey(format!(
                "{}Q{}",
                year, quarter
            )));
        }
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// First calendar day of the quarter, for plotting on a date axis.
    pub fn start_date(&self) -> NaiveDate {
        let month = (self.quarter as u32 - 1) * 3 + 1;
        // month is always 1, 4, 7 or 10 here
        NaiveDate::from_ymd_opt(self.year as i32, month, 1).unwrap()
    }
}

impl fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}Q{}", self.year, self.quarter)
    }
}

impl FromStr for QuarterKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DashboardError::InvalidQuarterKey(s.to_string());

        let (year_part, quarter_part) = s
            .split_once(|c| c == 'Q' || c == 'q')
            .ok_or_else(invalid)?;
        if year_part.len() != 4 {
            return Err(invalid());
        }

        let year: u16 = year_part.parse().map_err(|_| invalid())?;
        let quarter: u8 = quarter_part.parse().map_err(|_| invalid())?;

        Self::new(year, quarter).map_err(|_| invalid())
    }
}

impl Serialize for QuarterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QuarterKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| {
            D::Error::custom(format!("invalid quarter key '{}': expected YYYYQn", raw))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Subfunction {
    #[schemars(
        description = "The subfunction label, a finer-grained budget line within its parent category (e.g. 'Medicare' under 'Health')"
    )]
    pub name: String,

    #[schemars(description = "Spending for this subfunction in the quarter, in dollars. Non-negative.")]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BudgetEntry {
    #[schemars(
        description = "The top-level budget function category label (e.g. 'National Defense', 'Health')"
    )]
    pub name: String,

    #[schemars(description = "Spending for this category in the quarter, in dollars. Non-negative.")]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(
        description = "Optional finer-grained breakdown of this category. Subfunctions need not sum to the category amount when reporting is incomplete."
    )]
    pub subfunctions: Vec<Subfunction>,
}

impl BudgetEntry {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BudgetEntry)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// The raw loaded document: one ordered entry list per fiscal quarter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuarterlyBudget {
    pub quarters: BTreeMap<QuarterKey, Vec<BudgetEntry>>,
}

impl QuarterlyBudget {
    pub fn is_empty(&self) -> bool {
        self.quarters.is_empty()
    }

    /// Distinct fiscal years covered by the loaded quarters, ascending.
    pub fn years(&self) -> BTreeSet<u16> {
        self.quarters.keys().map(|q| q.year()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_key_parsing() {
        let key: QuarterKey = "2023Q1".parse().unwrap();
        assert_eq!(key.year(), 2023);
        assert_eq!(key.quarter(), 1);
        assert_eq!(key.to_string(), "2023Q1");

        assert_eq!(
            key.start_date(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        let q4: QuarterKey = "2023Q4".parse().unwrap();
        assert_eq!(
            q4.start_date(),
            NaiveDate::from_ymd_opt(2023, 10, 1).unwrap()
        );
    }

    #[test]
    fn test_quarter_key_rejects_malformed() {
        for bad in ["2023", "2023Q5", "2023Q0", "23Q1", "2023Qx", "Q1", ""] {
            assert!(bad.parse::<QuarterKey>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_quarter_key_ordering() {
        let mut keys: Vec<QuarterKey> = ["2023Q2", "2022Q4", "2023Q1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();
        let ordered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(ordered, vec!["2022Q4", "2023Q1", "2023Q2"]);
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = BudgetEntry::schema_as_json().unwrap();
        assert!(schema_json.contains("name"));
        assert!(schema_json.contains("amount"));
        assert!(schema_json.contains("subfunctions"));
    }

    #[test]
    fn test_entry_serialization() {
        let entry = BudgetEntry {
            name: "Health".to_string(),
            amount: 100.0,
            subfunctions: vec![Subfunction {
                name: "Medicare".to_string(),
                amount: 60.0,
            }],
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: BudgetEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Health");
        assert_eq!(back.subfunctions.len(), 1);

        // subfunctions are optional on the wire
        let bare: BudgetEntry = serde_json::from_str(r#"{"name":"Health","amount":1.0}"#).unwrap();
        assert!(bare.subfunctions.is_empty());
    }
}
