use crate::aggregate::YearlyTotal;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Change of one category between a year and the year before it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaEntry {
    pub absolute_change: f64,
    /// `(current - previous) / previous * 100` when the previous amount is
    /// nonzero. 0.0 when both amounts are 0. When spending appears from a
    /// zero base the value is the +100.0 sentinel and `from_zero` is set.
    pub percent_change: f64,
    /// Marks the zero-base sentinel so renderers can caption the entry as
    /// new spending instead of presenting the ratio as measured.
    pub from_zero: bool,
}

/// Per-category deltas for one year versus the prior year. Includes the
/// synthetic total since it is an ordinary entry of [`YearlyTotal`].
pub type YearDeltas = BTreeMap<String, DeltaEntry>;

pub fn percent_change(previous: f64, current: f64) -> (f64, bool) {
    if previous == 0.0 {
        if current == 0.0 {
            (0.0, false)
        } else {
            (100.0, true)
        }
    } else {
        ((current - previous) / previous * 100.0, false)
    }
}

/// Derives year-over-year deltas from the yearly totals. Every year except
/// the earliest gets an entry; categories absent from one side of a pair are
/// treated as 0 so a category dropping out shows as -100% rather than
/// disappearing.
pub fn year_over_year(totals: &BTreeMap<u16, YearlyTotal>) -> BTreeMap<u16, YearDeltas> {
    let mut deltas: BTreeMap<u16, YearDeltas> = BTreeMap::new();

    let years: Vec<u16> = totals.keys().copied().collect();
    for pair in years.windows(2) {
        let (prev_year, year) = (pair[0], pair[1]);
        let previous = &totals[&prev_year];
        let current = &totals[&year];

        let categories: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();

        let year_deltas = categories
            .into_iter()
            .map(|category| {
                let prev_amount = previous.get(category).copied().unwrap_or(0.0);
                let curr_amount = current.get(category).copied().unwrap_or(0.0);
                let (percent, from_zero) = percent_change(prev_amount, curr_amount);
                let entry = DeltaEntry {
                    absolute_change: curr_amount - prev_amount,
                    percent_change: percent,
                    from_zero,
                };
                (category.clone(), entry)
            })
            .collect();

        deltas.insert(year, year_deltas);
    }

    debug!("Computed year-over-year deltas for {} years", deltas.len());

    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TOTAL_LABEL;

    fn totals(years: Vec<(u16, Vec<(&str, f64)>)>) -> BTreeMap<u16, YearlyTotal> {
        years
            .into_iter()
            .map(|(year, entries)| {
                let map = entries
                    .into_iter()
                    .map(|(name, amount)| (name.to_string(), amount))
                    .collect();
                (year, map)
            })
            .collect()
    }

    #[test]
    fn test_basic_growth() {
        let totals = totals(vec![
            (2022, vec![("Health", 100.0), (TOTAL_LABEL, 100.0)]),
            (2023, vec![("Health", 150.0), (TOTAL_LABEL, 150.0)]),
        ]);

        let deltas = year_over_year(&totals);
        assert!(!deltas.contains_key(&2022), "earliest year has no delta");

        let health = &deltas[&2023]["Health"];
        assert_eq!(health.absolute_change, 50.0);
        assert_eq!(health.percent_change, 50.0);
        assert!(!health.from_zero);

        let total = &deltas[&2023][TOTAL_LABEL];
        assert_eq!(total.percent_change, 50.0);
    }

    #[test]
    fn test_zero_to_zero_is_zero_percent() {
        let totals = totals(vec![
            (2022, vec![("Dormant", 0.0)]),
            (2023, vec![("Dormant", 0.0)]),
        ]);

        let dormant = &year_over_year(&totals)[&2023]["Dormant"];
        assert_eq!(dormant.percent_change, 0.0);
        assert!(!dormant.from_zero);
        assert!(dormant.percent_change.is_finite());
    }

    #[test]
    fn test_zero_base_sentinel() {
        let totals = totals(vec![
            (2022, vec![("New Program", 0.0)]),
            (2023, vec![("New Program", 40.0)]),
        ]);

        let entry = &year_over_year(&totals)[&2023]["New Program"];
        assert_eq!(entry.absolute_change, 40.0);
        assert_eq!(entry.percent_change, 100.0);
        assert!(entry.from_zero);
    }

    #[test]
    fn test_category_dropping_out_reads_minus_100() {
        let totals = totals(vec![
            (2022, vec![("Sunset", 80.0)]),
            (2023, vec![]),
        ]);

        let entry = &year_over_year(&totals)[&2023]["Sunset"];
        assert_eq!(entry.absolute_change, -80.0);
        assert_eq!(entry.percent_change, -100.0);
        assert!(!entry.from_zero);
    }

    #[test]
    fn test_consecutive_pairs_only() {
        let totals = totals(vec![
            (2021, vec![("Health", 100.0)]),
            (2022, vec![("Health", 110.0)]),
            (2023, vec![("Health", 121.0)]),
        ]);

        let deltas = year_over_year(&totals);
        assert_eq!(deltas.len(), 2);
        assert!((deltas[&2022]["Health"].percent_change - 10.0).abs() < 1e-9);
        assert!((deltas[&2023]["Health"].percent_change - 10.0).abs() < 1e-9);
    }
}
