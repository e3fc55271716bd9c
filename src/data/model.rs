use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column names with fixed meaning
// ---------------------------------------------------------------------------

pub const TITLE: &str = "title";
pub const AUTHORS: &str = "authors";
pub const JOURNAL: &str = "journal";
pub const PUBLISH_TIME: &str = "publish_time";
pub const ABSTRACT: &str = "abstract";
pub const SOURCE: &str = "source_x";
pub const YEAR: &str = "year";
pub const ABSTRACT_WORD_COUNT: &str = "abstract_word_count";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [TITLE, AUTHORS, JOURNAL, PUBLISH_TIME, ABSTRACT];

/// Columns that are always treated as text, whatever their cells look like.
pub const TEXT_COLUMNS: [&str; 5] = [TITLE, AUTHORS, JOURNAL, ABSTRACT, SOURCE];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes pandas infers from a CSV.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Try to interpret the value as an `f64` for numeric statistics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text form of a non-null cell. A JSON or Parquet title stored as a
    /// number is still a title.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// RawTable – the file as loaded, before cleaning
// ---------------------------------------------------------------------------

static NULL: CellValue = CellValue::Null;

/// One input row: column_name → value. Columns missing from a row are null.
pub type RawRecord = BTreeMap<String, CellValue>;

/// The loaded dataset with its original column order.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Value of `column` in row `row`, null when absent.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// Columns whose non-null cells are all numbers (at least one of them).
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| {
                let mut seen = false;
                for row in &self.rows {
                    match row.get(col.as_str()) {
                        None | Some(CellValue::Null) => {}
                        Some(v) if v.is_numeric() => seen = true,
                        Some(_) => return false,
                    }
                }
                seen
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Paper – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A cleaned paper record. Title and publication date are guaranteed.
#[derive(Debug, Clone)]
pub struct Paper {
    pub title: String,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub publish_time: NaiveDate,
    pub year: i32,
    pub abstract_text: Option<String>,
    pub abstract_word_count: usize,
    pub source_x: Option<String>,
    /// Every other input column, untouched.
    pub extra: BTreeMap<String, CellValue>,
}

impl Paper {
    /// Generic column access used by the summary tables.
    pub fn cell(&self, column: &str) -> CellValue {
        fn text(v: &Option<String>) -> CellValue {
            v.clone().map_or(CellValue::Null, CellValue::String)
        }
        match column {
            TITLE => CellValue::String(self.title.clone()),
            AUTHORS => text(&self.authors),
            JOURNAL => text(&self.journal),
            PUBLISH_TIME => CellValue::String(self.publish_time.to_string()),
            YEAR => CellValue::Integer(i64::from(self.year)),
            ABSTRACT => text(&self.abstract_text),
            ABSTRACT_WORD_COUNT => CellValue::Integer(self.abstract_word_count as i64),
            SOURCE => text(&self.source_x),
            other => self.extra.get(other).cloned().unwrap_or(CellValue::Null),
        }
    }
}

// ---------------------------------------------------------------------------
// PaperTable – the cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned table: surviving rows plus the column layout they came from.
#[derive(Debug, Clone, Default)]
pub struct PaperTable {
    pub papers: Vec<Paper>,
    /// Input columns in file order, then the derived ones.
    pub columns: Vec<String>,
    /// Subset of `columns` holding numbers, in column order.
    pub numeric_columns: Vec<String>,
}

impl PaperTable {
    /// Whether the input carried a `source_x` column.
    pub fn has_source(&self) -> bool {
        self.columns.iter().any(|c| c == SOURCE)
    }

    /// Smallest and largest publication year, if any row survived cleaning.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.papers.iter().map(|p| p.year).min()?;
        let max = self.papers.iter().map(|p| p.year).max()?;
        Some((min, max))
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn numeric_columns_require_every_value_to_be_a_number() {
        let table = RawTable {
            columns: vec!["pubmed_id".into(), "doi".into(), "empty".into()],
            rows: vec![
                record(&[
                    ("pubmed_id", CellValue::Integer(7)),
                    ("doi", CellValue::String("10.1/x".into())),
                    ("empty", CellValue::Null),
                ]),
                record(&[
                    ("pubmed_id", CellValue::Float(8.5)),
                    ("doi", CellValue::Integer(3)),
                ]),
            ],
        };
        assert_eq!(table.numeric_columns(), vec!["pubmed_id".to_string()]);
    }

    #[test]
    fn integer_cell_keeps_its_text_form() {
        assert_eq!(CellValue::Integer(1918).as_text().as_deref(), Some("1918"));
        assert_eq!(CellValue::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Null.as_text(), None);
    }

    #[test]
    fn missing_cell_reads_as_null() {
        let table = RawTable {
            columns: vec![TITLE.into()],
            rows: vec![RawRecord::new()],
        };
        assert!(table.cell(0, TITLE).is_null());
        assert!(table.cell(5, TITLE).is_null());
    }
}
