use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The dashboard's tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    TotalSpending,
    BudgetCategories,
    SpendingChanges,
    ImpactfulEvents,
}

/// Which event overlays the impactful-events view draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    pub covid: bool,
    pub ukraine: bool,
    pub inflation: bool,
    pub all: bool,
}

impl EventFilters {
    pub fn any(&self) -> bool {
        self.covid || self.ukraine || self.inflation || self.all
    }
}

/// Current user selection. Mutated only through the validating setters, which
/// reject an invalid transition as a no-op with a warning so the previous
/// valid selection always survives. Each setter reports whether it applied.
#[derive(Debug, Clone)]
pub struct DashboardState {
    active_view: ViewKind,
    selected_year: u16,
    selected_category: String,
    selected_begin_year: u16,
    selected_end_year: u16,
    selected_events: EventFilters,

    years: BTreeSet<u16>,
    categories: BTreeSet<String>,
}

impl DashboardState {
    /// Builds the initial selection from the available years and categories:
    /// latest year selected, full year range, totals view.
    ///
    /// An empty year set yields a placeholder year-0 selection; data reaching
    /// this through the loader is never empty, since an empty document is
    /// rejected as a load error.
    pub fn new(years: BTreeSet<u16>, categories: BTreeSet<String>) -> Self {
        let latest = years.iter().next_back().copied().unwrap_or(0);
        let earliest = years.iter().next().copied().unwrap_or(0);

        Self {
            active_view: ViewKind::TotalSpending,
            selected_year: latest,
            selected_category: crate::aggregate::TOTAL_LABEL.to_string(),
            selected_begin_year: earliest,
            selected_end_year: latest,
            selected_events: EventFilters::default(),
            years,
            categories,
        }
    }

    pub fn active_view(&self) -> ViewKind {
        self.active_view
    }

    pub fn selected_year(&self) -> u16 {
        self.selected_year
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn selected_year_range(&self) -> (u16, u16) {
        (self.selected_begin_year, self.selected_end_year)
    }

    pub fn selected_events(&self) -> EventFilters {
        self.selected_events
    }

    pub fn available_years(&self) -> &BTreeSet<u16> {
        &self.years
    }

    pub fn set_active_view(&mut self, view: ViewKind) -> bool {
        self.active_view = view;
        true
    }

    pub fn set_selected_year(&mut self, year: u16) -> bool {
        if !self.years.contains(&year) {
            warn!("Rejecting year selection {}: no data for that year", year);
            return false;
        }
        self.selected_year = year;
        true
    }

    pub fn set_selected_category(&mut self, category: &str) -> bool {
        if category != crate::aggregate::TOTAL_LABEL && !self.categories.contains(category) {
            warn!("Rejecting category selection '{}': unknown category", category);
            return false;
        }
        self.selected_category = category.to_string();
        true
    }

    pub fn set_year_range(&mut self, begin: u16, end: u16) -> bool {
        if begin >= end {
            warn!(
                "Rejecting year range {}..{}: begin year must be less than end year",
                begin, end
            );
            return false;
        }
        if !self.years.contains(&begin) || !self.years.contains(&end) {
            warn!("Rejecting year range {}..{}: no data for those years", begin, end);
            return false;
        }
        self.selected_begin_year = begin;
        self.selected_end_year = end;
        true
    }

    pub fn set_event_filters(&mut self, filters: EventFilters) -> bool {
        self.selected_events = filters;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DashboardState {
        let years = [2019, 2020, 2021, 2022, 2023, 2024].into_iter().collect();
        let categories = ["Health", "National Defense"]
            .into_iter()
            .map(String::from)
            .collect();
        DashboardState::new(years, categories)
    }

    #[test]
    fn test_initial_selection() {
        let state = state();
        assert_eq!(state.active_view(), ViewKind::TotalSpending);
        assert_eq!(state.selected_year(), 2024);
        assert_eq!(state.selected_category(), "Total");
        assert_eq!(state.selected_year_range(), (2019, 2024));
        assert!(!state.selected_events().any());
    }

    #[test]
    fn test_inverted_year_range_is_rejected() {
        let mut state = state();
        assert!(!state.set_year_range(2024, 2019));
        assert_eq!(state.selected_year_range(), (2019, 2024));

        // equal years are also invalid
        assert!(!state.set_year_range(2022, 2022));
        assert_eq!(state.selected_year_range(), (2019, 2024));
    }

    #[test]
    fn test_valid_year_range_applies() {
        let mut state = state();
        assert!(state.set_year_range(2020, 2023));
        assert_eq!(state.selected_year_range(), (2020, 2023));
    }

    #[test]
    fn test_unknown_year_is_rejected() {
        let mut state = state();
        assert!(!state.set_selected_year(1999));
        assert_eq!(state.selected_year(), 2024);

        assert!(state.set_selected_year(2021));
        assert_eq!(state.selected_year(), 2021);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut state = state();
        assert!(!state.set_selected_category("Space Lasers"));
        assert_eq!(state.selected_category(), "Total");

        assert!(state.set_selected_category("Health"));
        assert_eq!(state.selected_category(), "Health");

        // the synthetic total is always selectable
        assert!(state.set_selected_category("Total"));
    }

    #[test]
    fn test_empty_year_set_falls_back_to_placeholder() {
        let mut state = DashboardState::new(BTreeSet::new(), BTreeSet::new());
        assert_eq!(state.selected_year(), 0);
        assert_eq!(state.selected_year_range(), (0, 0));

        // every year selection is rejected, so the placeholder never escapes
        assert!(!state.set_selected_year(2023));
        assert!(!state.set_year_range(0, 2023));
    }
}
