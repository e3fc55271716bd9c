use std::collections::BTreeSet;

use super::model::PaperTable;
use super::stats::value_counts;

// ---------------------------------------------------------------------------
// Filter predicate: year range plus the selected journals
// ---------------------------------------------------------------------------

/// Current selection of the filter widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive `(from, to)` publication year range.
    pub year_range: (i32, i32),
    /// Journals a row must belong to. Empty means nothing passes.
    pub journals: BTreeSet<String>,
}

/// What the filter widgets may offer for a given cleaned table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Smallest and largest selectable year.
    pub year_bounds: (i32, i32),
    /// Most frequent journals, most frequent first.
    pub journals: Vec<String>,
}

/// Compute the slider bounds and the journal choices.
///
/// An empty table has no years; the default range then doubles as bounds.
pub fn filter_options(
    table: &PaperTable,
    journal_options: usize,
    default_range: (i32, i32),
) -> FilterOptions {
    let year_bounds = table.year_bounds().unwrap_or(default_range);
    let journals = value_counts(table.papers.iter().filter_map(|p| p.journal.as_deref()))
        .into_iter()
        .take(journal_options)
        .map(|(journal, _)| journal)
        .collect();
    FilterOptions {
        year_bounds,
        journals,
    }
}

/// Initialise a [`FilterState`]: default year range clamped into the bounds,
/// every journal option selected.
pub fn init_filter_state(options: &FilterOptions, default_range: (i32, i32)) -> FilterState {
    let (lo, hi) = options.year_bounds;
    let clamp = |y: i32| y.clamp(lo, hi.max(lo));
    FilterState {
        year_range: (clamp(default_range.0), clamp(default_range.1)),
        journals: options.journals.iter().cloned().collect(),
    }
}

/// Return indices of papers that pass the filters, in table order.
///
/// A paper passes when its year lies in the inclusive range and its journal
/// is one of the selected ones. Papers without a journal never pass.
pub fn filtered_indices(table: &PaperTable, filters: &FilterState) -> Vec<usize> {
    let (from, to) = filters.year_range;
    table
        .papers
        .iter()
        .enumerate()
        .filter(|(_, paper)| {
            (from..=to).contains(&paper.year)
                && paper
                    .journal
                    .as_ref()
                    .is_some_and(|j| filters.journals.contains(j))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::model::{CellValue, RawRecord, RawTable, JOURNAL, PUBLISH_TIME, TITLE};

    fn table(rows: &[(&str, Option<&str>, &str)]) -> PaperTable {
        let rows = rows
            .iter()
            .map(|(title, journal, time)| {
                let mut r = RawRecord::new();
                r.insert(TITLE.into(), CellValue::String(title.to_string()));
                r.insert(
                    JOURNAL.into(),
                    journal.map_or(CellValue::Null, |j| CellValue::String(j.to_string())),
                );
                r.insert(PUBLISH_TIME.into(), CellValue::String(time.to_string()));
                r
            })
            .collect();
        clean(&RawTable {
            columns: vec![TITLE.into(), JOURNAL.into(), PUBLISH_TIME.into()],
            rows,
        })
    }

    fn journals(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn year_and_journal_both_apply() {
        let t = table(&[("A", Some("J1"), "2020-05-01"), ("B", Some("J2"), "2021-01-01")]);
        let filters = FilterState {
            year_range: (2020, 2020),
            journals: journals(&["J1"]),
        };
        let idx = filtered_indices(&t, &filters);
        assert_eq!(idx, vec![0]);
        assert_eq!(t.papers[idx[0]].title, "A");
    }

    #[test]
    fn every_result_satisfies_the_predicate() {
        let t = table(&[
            ("A", Some("J1"), "2019"),
            ("B", Some("J2"), "2020"),
            ("C", Some("J1"), "2021"),
            ("D", None, "2020"),
            ("E", Some("J3"), "2022"),
        ]);
        let filters = FilterState {
            year_range: (2020, 2022),
            journals: journals(&["J1", "J3"]),
        };
        let idx = filtered_indices(&t, &filters);
        assert_eq!(idx, vec![2, 4]);
        for i in idx {
            let p = &t.papers[i];
            assert!((2020..=2022).contains(&p.year));
            assert!(filters.journals.contains(p.journal.as_deref().unwrap()));
        }
    }

    #[test]
    fn empty_journal_selection_yields_nothing() {
        let t = table(&[("A", Some("J1"), "2020")]);
        let filters = FilterState {
            year_range: (1900, 2100),
            journals: BTreeSet::new(),
        };
        assert!(filtered_indices(&t, &filters).is_empty());
    }

    #[test]
    fn reversed_range_yields_nothing() {
        let t = table(&[("A", Some("J1"), "2020")]);
        let filters = FilterState {
            year_range: (2021, 2019),
            journals: journals(&["J1"]),
        };
        assert!(filtered_indices(&t, &filters).is_empty());
    }

    #[test]
    fn full_span_with_all_options_keeps_every_row() {
        let t = table(&[
            ("A", Some("J1"), "2018"),
            ("B", Some("J2"), "2020"),
            ("C", Some("J2"), "2023"),
        ]);
        let options = filter_options(&t, 20, (2020, 2021));
        let mut filters = init_filter_state(&options, (2020, 2021));
        filters.year_range = options.year_bounds;
        assert_eq!(filtered_indices(&t, &filters).len(), t.len());
    }

    #[test]
    fn options_rank_journals_and_clamp_default_range() {
        let t = table(&[
            ("A", Some("J1"), "2021"),
            ("B", Some("J2"), "2022"),
            ("C", Some("J2"), "2022"),
            ("D", Some("J3"), "2023"),
        ]);
        let options = filter_options(&t, 2, (2020, 2021));
        assert_eq!(options.year_bounds, (2021, 2023));
        assert_eq!(options.journals, vec!["J2", "J1"]);

        let state = init_filter_state(&options, (2020, 2021));
        assert_eq!(state.year_range, (2021, 2021));
        assert_eq!(state.journals, journals(&["J1", "J2"]));
    }

    #[test]
    fn empty_table_uses_default_range_as_bounds() {
        let t = table(&[]);
        let options = filter_options(&t, 20, (2020, 2021));
        assert_eq!(options.year_bounds, (2020, 2021));
        assert!(options.journals.is_empty());
    }
}
