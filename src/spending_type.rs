//! Mandatory-vs-discretionary classification for the spending-split pie
//! view: a fixed category -> type table, per-type yearly totals, and the
//! per-type category detail lists the pie tooltips enumerate.

use crate::aggregate::{YearlyTotal, TOTAL_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingType {
    Mandatory,
    Discretionary,
}

impl fmt::Display for SpendingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpendingType::Mandatory => write!(f, "Mandatory"),
            SpendingType::Discretionary => write!(f, "Discretionary"),
        }
    }
}

/// Classifies a budget function category. Categories outside the table
/// (including the reporting artifacts) have no classification and are left
/// out of the split entirely.
pub fn classify(category: &str) -> Option<SpendingType> {
    use SpendingType::*;

    match category {
        "Social Security"
        | "Medicare"
        | "Medicaid"
        | "Net Interest"
        | "Veterans Benefits and Services" => Some(Mandatory),

        "National Defense"
        | "Transportation"
        | "Education, Training, Employment, and Social Services"
        | "International Affairs"
        | "General Science, Space, and Technology"
        | "Natural Resources and Environment"
        | "Community and Regional Development"
        | "Administration of Justice"
        | "Commerce and Housing Credit"
        | "General Government"
        | "Energy" => Some(Discretionary),

        _ => None,
    }
}

/// One category's contribution to a spending-type slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// One slice of the mandatory/discretionary pie: the type's total plus the
/// categories behind it, in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingTypeSlice {
    pub total: f64,
    pub details: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingTypeBreakdown {
    pub mandatory: SpendingTypeSlice,
    pub discretionary: SpendingTypeSlice,
}

/// Splits one year's totals into mandatory and discretionary slices. The
/// synthetic total entry and unclassified categories are skipped.
pub fn spending_type_totals(totals: &YearlyTotal) -> SpendingTypeBreakdown {
    let mut breakdown = SpendingTypeBreakdown::default();

    for (category, amount) in totals {
        if category == TOTAL_LABEL {
            continue;
        }
        let slice = match classify(category) {
            Some(SpendingType::Mandatory) => &mut breakdown.mandatory,
            Some(SpendingType::Discretionary) => &mut breakdown.discretionary,
            None => continue,
        };
        slice.total += amount;
        slice.details.push(CategoryAmount {
            category: category.clone(),
            amount: *amount,
        });
    }

    breakdown
}
