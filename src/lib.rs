//! # Budget Dashboard
//!
//! A library for aggregating a flat quarterly U.S. government spending series
//! into the derived, read-only views an interactive dashboard renders.
//!
//! ## Core Concepts
//!
//! - **Quarterly budget**: the raw input, a map from `YYYYQn` quarter keys to
//!   per-category spending entries with optional subfunction breakdowns
//! - **Yearly totals**: per-category sums across each year's quarters, plus a
//!   synthetic "Total" that excludes reporting artifacts
//! - **Breakdown tree**: the two-level category -> subfunction hierarchy with
//!   zero-safe percentages, consumed by treemap renderers
//! - **Time series & deltas**: the pivoted category-by-year view for bar and
//!   line charts, and year-over-year absolute/percentage changes
//! - **Controller**: single owner of data and selection state; fans applied
//!   changes out to registered renderers and remote panes over typed messages
//!
//! ## Example
//!
//! ```rust,ignore
//! use budget_dashboard::*;
//!
//! let data = load_dashboard("data/budget_by_function.json")?;
//! let mut controller = DashboardController::new(data);
//! controller.register_renderer(Box::new(my_bar_chart));
//! controller.select_year(2023);
//! ```

pub mod aggregate;
pub mod controller;
pub mod delta;
pub mod error;
pub mod events;
pub mod loader;
pub mod messages;
pub mod schema;
pub mod spending_type;
pub mod state;
pub mod utils;

pub use aggregate::{
    breakdown_trees, is_excluded, time_series, yearly_totals, BreakdownNode, BreakdownTree,
    CategoryTimeSeries, TreemapFrame, YearlyTotal, EXCLUDED_CATEGORIES, TOTAL_LABEL,
};
pub use controller::{DashboardController, MessagePort, Renderer};
pub use delta::{percent_change, year_over_year, DeltaEntry, YearDeltas};
pub use error::{DashboardError, Result};
pub use events::{builtin_events, event_impact, CategoryImpact, EventWindow};
pub use loader::{load_index_series, load_quarterly_budget, IndexPoint};
pub use messages::{ControllerMessage, PaneAction, PaneEvent};
pub use schema::{BudgetEntry, QuarterKey, QuarterlyBudget, Subfunction};
pub use spending_type::{
    classify, spending_type_totals, CategoryAmount, SpendingType, SpendingTypeBreakdown,
    SpendingTypeSlice,
};
pub use state::{DashboardState, EventFilters, ViewKind};
pub use utils::*;

use log::{debug, info};
use std::collections::BTreeMap;
use std::path::Path;

/// All derived views, built once from a successfully loaded budget and
/// immutable for the lifetime of the session. Only [`DashboardState`] changes
/// after this point.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// The raw quarterly series, kept for views that plot per-quarter data.
    pub budget: QuarterlyBudget,
    pub yearly_totals: BTreeMap<u16, YearlyTotal>,
    pub breakdowns: BTreeMap<u16, BreakdownTree>,
    pub series: CategoryTimeSeries,
    pub deltas: BTreeMap<u16, YearDeltas>,
}

impl DashboardData {
    pub fn build(budget: QuarterlyBudget) -> Self {
        info!(
            "Building dashboard views from {} quarters across {} years",
            budget.quarters.len(),
            budget.years().len()
        );

        let yearly_totals = yearly_totals(&budget);
        let breakdowns = breakdown_trees(&budget);
        let series = time_series(&yearly_totals);
        let deltas = year_over_year(&yearly_totals);

        debug!(
            "Derived {} categories over {} years",
            series.len(),
            yearly_totals.len()
        );

        Self {
            budget,
            yearly_totals,
            breakdowns,
            series,
            deltas,
        }
    }
}

pub struct DashboardProcessor;

impl DashboardProcessor {
    /// Loads the budget document and builds every derived view. On any load
    /// failure no derived state is produced.
    pub fn load(path: impl AsRef<Path>) -> Result<DashboardData> {
        let budget = load_quarterly_budget(path)?;
        Ok(DashboardData::build(budget))
    }
}

pub fn load_dashboard(path: impl AsRef<Path>) -> Result<DashboardData> {
    DashboardProcessor::load(path)
}
