use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::ExplorerConfig;
use crate::data::filter::{filter_options, filtered_indices, init_filter_state, FilterOptions, FilterState};
use crate::data::model::PaperTable;
use crate::data::stats::Report;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ExplorerConfig,

    /// File the current table came from.
    pub source_path: PathBuf,

    /// Cleaned dataset.
    pub table: PaperTable,

    /// Slider bounds and journal choices derived from `table`.
    pub options: FilterOptions,

    /// Current filter selection.
    pub filters: FilterState,

    /// Charts and summaries for the current selection (cached).
    pub report: Report,

    /// One colour per journal option.
    pub journal_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ExplorerConfig, source_path: PathBuf, table: PaperTable) -> Self {
        let mut state = Self {
            config,
            source_path: PathBuf::new(),
            table: PaperTable::default(),
            options: FilterOptions::default(),
            filters: FilterState {
                year_range: (0, 0),
                journals: Default::default(),
            },
            report: Report::default(),
            journal_colors: ColorMap::default(),
            status_message: None,
        };
        state.set_table(source_path, table);
        state
    }

    /// Ingest a newly loaded table, initialise filters and colours.
    pub fn set_table(&mut self, source_path: PathBuf, table: PaperTable) {
        let range = self.config.default_year_range;
        self.options = filter_options(&table, self.config.journal_options, range);
        self.filters = init_filter_state(&self.options, range);
        self.journal_colors = ColorMap::new(&self.options.journals);
        self.table = table;
        self.source_path = source_path;
        self.status_message = None;
        self.refilter();
    }

    /// Load another dataset; on failure keep the current one and report.
    pub fn open(&mut self, path: &Path) {
        match crate::data::load_dataset(path) {
            Ok(table) => self.set_table(path.to_path_buf(), table),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the filtered view and everything derived from it.
    pub fn refilter(&mut self) {
        let indices = filtered_indices(&self.table, &self.filters);
        log::debug!(
            "filters {:?} → {} of {} papers",
            self.filters.year_range,
            indices.len(),
            self.table.len()
        );
        self.report = Report::build(&self.table, indices, self.config.report_limits());
    }

    /// Set the inclusive year range, keeping `from <= to`.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        let range = if from <= to { (from, to) } else { (to, from) };
        if range != self.filters.year_range {
            self.filters.year_range = range;
            self.refilter();
        }
    }

    /// Toggle a single journal in the selection.
    pub fn toggle_journal(&mut self, journal: &str) {
        if !self.filters.journals.remove(journal) {
            self.filters.journals.insert(journal.to_string());
        }
        self.refilter();
    }

    /// Select every journal option.
    pub fn select_all_journals(&mut self) {
        self.filters.journals = self.options.journals.iter().cloned().collect();
        self.refilter();
    }

    /// Deselect every journal.
    pub fn select_no_journals(&mut self) {
        self.filters.journals.clear();
        self.refilter();
    }

    /// Back to the default year range and all journals.
    pub fn reset_filters(&mut self) {
        self.filters = init_filter_state(&self.options, self.config.default_year_range);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::model::{CellValue, RawRecord, RawTable, JOURNAL, PUBLISH_TIME, TITLE};

    fn state() -> AppState {
        let data = [
            ("A", "J1", "2019"),
            ("B", "J1", "2020"),
            ("C", "J2", "2021"),
            ("D", "J3", "2022"),
        ];
        let rows = data
            .iter()
            .map(|(t, j, y)| {
                let mut r = RawRecord::new();
                r.insert(TITLE.into(), CellValue::String(t.to_string()));
                r.insert(JOURNAL.into(), CellValue::String(j.to_string()));
                r.insert(PUBLISH_TIME.into(), CellValue::String(y.to_string()));
                r
            })
            .collect();
        let table = clean(&RawTable {
            columns: vec![TITLE.into(), JOURNAL.into(), PUBLISH_TIME.into()],
            rows,
        });
        AppState::new(ExplorerConfig::default(), PathBuf::from("test.csv"), table)
    }

    #[test]
    fn starts_with_default_selection() {
        let s = state();
        assert_eq!(s.options.year_bounds, (2019, 2022));
        assert_eq!(s.filters.year_range, (2020, 2021));
        assert_eq!(s.filters.journals.len(), 3);
        assert_eq!(s.report.len(), 2);
    }

    #[test]
    fn widening_the_range_shows_everything() {
        let mut s = state();
        s.set_year_range(2022, 2019);
        assert_eq!(s.filters.year_range, (2019, 2022));
        assert_eq!(s.report.len(), s.table.len());
    }

    #[test]
    fn journal_toggles_and_bulk_selection() {
        let mut s = state();
        s.set_year_range(2019, 2022);

        s.toggle_journal("J1");
        assert_eq!(s.report.len(), 2);
        s.toggle_journal("J1");
        assert_eq!(s.report.len(), 4);

        s.select_no_journals();
        assert!(s.report.is_empty());
        assert!(s.report.yearly.is_empty());

        s.select_all_journals();
        assert_eq!(s.report.len(), 4);

        s.reset_filters();
        assert_eq!(s.filters.year_range, (2020, 2021));
        assert_eq!(s.report.len(), 2);
    }

    #[test]
    fn failed_open_keeps_current_table() {
        let mut s = state();
        s.open(Path::new("/nonexistent/metadata.csv"));
        assert_eq!(s.table.len(), 4);
        assert_eq!(s.source_path, PathBuf::from("test.csv"));
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Error")));
    }
}
