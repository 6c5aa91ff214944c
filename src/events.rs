//! Event-overlay analytics for the impactful-events view: for a window of
//! quarters around a world event, how far each category's spending rose from
//! its level when the event began.

use crate::aggregate::is_excluded;
use crate::delta::percent_change;
use crate::schema::{QuarterKey, QuarterlyBudget};
use std::collections::BTreeMap;

/// A span of quarters associated with a named event, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWindow {
    pub label: String,
    pub start: QuarterKey,
    pub end: QuarterKey,
}

impl EventWindow {
    pub fn new(label: &str, start: QuarterKey, end: QuarterKey) -> Self {
        Self {
            label: label.to_string(),
            start,
            end,
        }
    }

    pub fn contains(&self, quarter: QuarterKey) -> bool {
        self.start <= quarter && quarter <= self.end
    }
}

/// The event windows the dashboard ships with.
pub fn builtin_events() -> Vec<EventWindow> {
    let parse = |s: &str| s.parse::<QuarterKey>().unwrap();
    vec![
        EventWindow::new("COVID-19 Pandemic", parse("2020Q1"), parse("2023Q2")),
        EventWindow::new("Ukraine War", parse("2022Q1"), parse("2024Q4")),
    ]
}

/// Peak spending of one category inside an event window, compared against
/// its level in the window's first quarter.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryImpact {
    pub category: String,
    pub peak_quarter: QuarterKey,
    pub peak_amount: f64,
    /// Spending in the window's start quarter; 0.0 when the category has no
    /// entry there.
    pub pre_amount: f64,
    pub percent_change: f64,
    pub from_zero: bool,
}

/// Computes per-category impact figures for one event window. Categories with
/// no data inside the window, and the excluded reporting categories, are left
/// out. Ties on the peak resolve to the earliest quarter.
pub fn event_impact(budget: &QuarterlyBudget, window: &EventWindow) -> Vec<CategoryImpact> {
    let mut in_window: BTreeMap<String, Vec<(QuarterKey, f64)>> = BTreeMap::new();
    let mut pre_amounts: BTreeMap<String, f64> = BTreeMap::new();

    for (quarter, entries) in &budget.quarters {
        if !window.contains(*quarter) {
            continue;
        }
        for entry in entries {
            if is_excluded(&entry.name) {
                continue;
            }
            in_window
                .entry(entry.name.clone())
                .or_default()
                .push((*quarter, entry.amount));
            if *quarter == window.start {
                pre_amounts.insert(entry.name.clone(), entry.amount);
            }
        }
    }

    in_window
        .into_iter()
        .map(|(category, points)| {
            let (peak_quarter, peak_amount) = points
                .iter()
                .copied()
                .fold(points[0], |best, candidate| {
                    if candidate.1 > best.1 {
                        candidate
                    } else {
                        best
                    }
                });

            let pre_amount = pre_amounts.get(&category).copied().unwrap_or(0.0);
            let (percent, from_zero) = percent_change(pre_amount, peak_amount);

            CategoryImpact {
                category,
                peak_quarter,
                peak_amount,
                pre_amount,
                percent_change: percent,
                from_zero,
            }
        })
        .collect()
}
