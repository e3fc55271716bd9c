//! Explorer settings.
//! Read from cord19-explorer.toml in the current directory when present.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::stats::ReportLimits;

pub const CONFIG_FILE: &str = "cord19-explorer.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Dataset loaded at startup.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Initial `(from, to)` year selection, clamped to the data.
    #[serde(default = "default_year_range")]
    pub default_year_range: (i32, i32),
    /// Number of most frequent journals offered in the multi-select.
    #[serde(default = "default_twenty")]
    pub journal_options: usize,
    #[serde(default = "default_twenty")]
    pub preview_rows: usize,
    #[serde(default = "default_ten")]
    pub top_journals: usize,
    #[serde(default = "default_twenty")]
    pub top_words: usize,
    #[serde(default = "default_ten")]
    pub top_sources: usize,
}

fn default_data_path() -> PathBuf { PathBuf::from("metadata.csv") }
fn default_year_range() -> (i32, i32) { (2020, 2021) }
fn default_twenty() -> usize { 20 }
fn default_ten() -> usize { 10 }

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            default_year_range: default_year_range(),
            journal_options: default_twenty(),
            preview_rows: default_twenty(),
            top_journals: default_ten(),
            top_words: default_twenty(),
            top_sources: default_ten(),
        }
    }
}

impl ExplorerConfig {
    /// Load settings from [`CONFIG_FILE`]. A missing file means defaults;
    /// an unreadable one is logged and also falls back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(toml::from_str::<Self>(&content)?));
        match parsed {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn report_limits(&self) -> ReportLimits {
        ReportLimits {
            preview_rows: self.preview_rows,
            top_journals: self.top_journals,
            top_words: self.top_words,
            top_sources: self.top_sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_the_dashboard_layout() {
        let config = ExplorerConfig::default();
        assert_eq!(config.data_path, PathBuf::from("metadata.csv"));
        assert_eq!(config.default_year_range, (2020, 2021));
        assert_eq!(config.journal_options, 20);
        assert_eq!(config.preview_rows, 20);
        assert_eq!(config.top_journals, 10);
        assert_eq!(config.top_words, 20);
        assert_eq!(config.top_sources, 10);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: ExplorerConfig =
            toml::from_str("data_path = \"papers.parquet\"\ntop_words = 5\n").unwrap();
        assert_eq!(config.data_path, PathBuf::from("papers.parquet"));
        assert_eq!(config.top_words, 5);
        assert_eq!(config.top_journals, 10);
        assert_eq!(config.default_year_range, (2020, 2021));
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        assert_eq!(
            ExplorerConfig::load_from(Path::new("/nonexistent/cord19-explorer.toml")),
            ExplorerConfig::default()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"top_words = \"many\"").unwrap();
        assert_eq!(ExplorerConfig::load_from(file.path()), ExplorerConfig::default());
    }

    #[test]
    fn year_range_reads_as_array() {
        let config: ExplorerConfig = toml::from_str("default_year_range = [2019, 2022]").unwrap();
        assert_eq!(config.default_year_range, (2019, 2022));
    }
}
