use crate::schema::QuarterlyBudget;
use crate::utils::round1;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Label of the synthetic total entry added to every yearly view.
pub const TOTAL_LABEL: &str = "Total";

/// Categories excluded from the synthetic total. These are reporting
/// artifacts rather than spending and would distort the headline figure.
pub const EXCLUDED_CATEGORIES: [&str; 2] = ["Unreported Data", "Governmental Receipts"];

pub fn is_excluded(category: &str) -> bool {
    EXCLUDED_CATEGORIES.contains(&category)
}

/// Summed spending per category for one fiscal year, including the synthetic
/// [`TOTAL_LABEL`] entry.
pub type YearlyTotal = BTreeMap<String, f64>;

/// Pivoted view for bar/line charts: category (including [`TOTAL_LABEL`]) to
/// year to amount. Every category carries a value for every covered year;
/// years without data for a category hold 0.0 so chart lines stay continuous.
pub type CategoryTimeSeries = BTreeMap<String, BTreeMap<u16, f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownNode {
    pub label: String,
    pub value: f64,
    /// Share of the parent's value, in percent rounded to one decimal.
    /// 0.0 whenever the parent's value is 0.
    pub percent_of_parent: f64,
    pub children: Vec<BreakdownNode>,
}

/// Two-level category -> subfunction hierarchy for one year's treemap.
/// The root is the synthetic total; its children are the non-excluded
/// categories; grandchildren are subfunctions. Children need not sum to
/// their parent when subfunction reporting is incomplete.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownTree {
    pub root: BreakdownNode,
}

/// Parallel-array form of a [`BreakdownTree`], the shape treemap chart
/// libraries consume (labels/values/parents plus a percentage per node).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreemapFrame {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub parents: Vec<String>,
    pub percentages: Vec<f64>,
}

impl BreakdownTree {
    pub fn flatten(&self) -> TreemapFrame {
        let mut frame = TreemapFrame::default();
        Self::push_node(&self.root, "", &mut frame);
        frame
    }

    fn push_node(node: &BreakdownNode, parent: &str, frame: &mut TreemapFrame) {
        frame.labels.push(node.label.clone());
        frame.values.push(node.value);
        frame.parents.push(parent.to_string());
        frame.percentages.push(node.percent_of_parent);

        for child in &node.children {
            Self::push_node(child, &node.label, frame);
        }
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round1(part / whole * 100.0)
    }
}

/// Sums quarterly amounts into per-category yearly totals, grouped by the
/// year component of each quarter key, and adds the synthetic total entry.
pub fn yearly_totals(budget: &QuarterlyBudget) -> BTreeMap<u16, YearlyTotal> {
    let mut totals: BTreeMap<u16, YearlyTotal> = BTreeMap::new();

    for (key, entries) in &budget.quarters {
        let year = totals.entry(key.year()).or_default();
        for entry in entries {
            *year.entry(entry.name.clone()).or_insert(0.0) += entry.amount;
        }
    }

    for year_map in totals.values_mut() {
        let total: f64 = year_map
            .iter()
            .filter(|(name, _)| !is_excluded(name))
            .map(|(_, amount)| *amount)
            .sum();
        year_map.insert(TOTAL_LABEL.to_string(), total);
    }

    debug!(
        "Aggregated {} quarters into {} fiscal years",
        budget.quarters.len(),
        totals.len()
    );

    totals
}

struct CategoryAccum {
    amount: f64,
    subfunctions: BTreeMap<String, f64>,
}

/// Builds the per-year breakdown trees. Excluded categories are left out of
/// the hierarchy entirely; they remain visible in [`yearly_totals`] and the
/// pivoted series.
pub fn breakdown_trees(budget: &QuarterlyBudget) -> BTreeMap<u16, BreakdownTree> {
    let mut accum: BTreeMap<u16, BTreeMap<String, CategoryAccum>> = BTreeMap::new();

    for (key, entries) in &budget.quarters {
        let year = accum.entry(key.year()).or_default();
        for entry in entries {
            let category = year
                .entry(entry.name.clone())
                .or_insert_with(|| CategoryAccum {
                    amount: 0.0,
                    subfunctions: BTreeMap::new(),
                });
            category.amount += entry.amount;

            for sub in &entry.subfunctions {
                *category.subfunctions.entry(sub.name.clone()).or_insert(0.0) += sub.amount;
            }
        }
    }

    accum
        .into_iter()
        .map(|(year, categories)| {
            let total: f64 = categories
                .iter()
                .filter(|(name, _)| !is_excluded(name))
                .map(|(_, c)| c.amount)
                .sum();

            let children = categories
                .into_iter()
                .filter(|(name, _)| !is_excluded(name))
                .map(|(name, category)| {
                    let grandchildren = category
                        .subfunctions
                        .into_iter()
                        .map(|(sub_name, sub_amount)| {
                            // A subfunction named exactly like its parent would
                            // collide in hierarchical rendering; case-fold it,
                            // and mark it when the fold alone changes nothing.
                            let label = if sub_name == name {
                                let folded = sub_name.to_lowercase();
                                if folded == name {
                                    format!("{} (subfunction)", folded)
                                } else {
                                    folded
                                }
                            } else {
                                sub_name
                            };
                            BreakdownNode {
                                label,
                                value: sub_amount,
                                percent_of_parent: percent_of(sub_amount, category.amount),
                                children: Vec::new(),
                            }
                        })
                        .collect();

                    BreakdownNode {
                        percent_of_parent: percent_of(category.amount, total),
                        label: name,
                        value: category.amount,
                        children: grandchildren,
                    }
                })
                .collect();

            let tree = BreakdownTree {
                root: BreakdownNode {
                    label: TOTAL_LABEL.to_string(),
                    value: total,
                    percent_of_parent: 100.0,
                    children,
                },
            };
            (year, tree)
        })
        .collect()
}

/// Pivots the yearly totals into per-category series over the full year
/// range, filling 0.0 where a category has no data for a year.
pub fn time_series(totals: &BTreeMap<u16, YearlyTotal>) -> CategoryTimeSeries {
    let years: Vec<u16> = totals.keys().copied().collect();

    let categories: BTreeSet<&String> = totals.values().flat_map(|year| year.keys()).collect();

    categories
        .into_iter()
        .map(|category| {
            let per_year = years
                .iter()
                .map(|year| {
                    let amount = totals
                        .get(year)
                        .and_then(|t| t.get(category))
                        .copied()
                        .unwrap_or(0.0);
                    (*year, amount)
                })
                .collect();
            (category.clone(), per_year)
        })
        .collect()
}
