//! Aggregations behind the charts and the summary tables.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::PaperTable;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Count distinct values, most frequent first. Equal counts keep the order
/// in which values were first encountered.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut position: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for v in values {
        match position.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(v, counts.len());
                counts.push((v.to_string(), 1));
            }
        }
    }
    // Stable sort: ties stay in encounter order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// First `n` entries of [`value_counts`].
pub fn top_n<'a>(values: impl IntoIterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let mut counts = value_counts(values);
    counts.truncate(n);
    counts
}

/// Papers per year, ascending by year.
pub fn year_counts(years: impl IntoIterator<Item = i32>) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for y in years {
        *counts.entry(y).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Lowercase every title and split it into `\b\w+\b` tokens.
pub fn title_tokens<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    titles
        .into_iter()
        .flat_map(|t| {
            let lower = t.to_lowercase();
            WORD_RE
                .find_iter(&lower)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// The `n` most frequent title words.
pub fn top_title_words<'a>(
    titles: impl IntoIterator<Item = &'a str>,
    n: usize,
) -> Vec<(String, usize)> {
    let tokens = title_tokens(titles);
    top_n(tokens.iter().map(String::as_str), n)
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// `describe()` row for one numeric column. Moments are `None` when there
/// are not enough values to compute them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Count, mean, sample standard deviation, extremes and quartiles.
pub fn describe(column: &str, values: &[f64]) -> ColumnStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|m| {
        let ss: f64 = sorted.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    ColumnStats {
        column: column.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Quantile of sorted data with linear interpolation between neighbours.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Summary of a filtered view
// ---------------------------------------------------------------------------

/// The "Summary Statistics" section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub stats: Vec<ColumnStats>,
    /// Null cells per column, in column order.
    pub null_counts: Vec<(String, usize)>,
    pub columns: Vec<String>,
    pub rows: usize,
}

impl Summary {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }
}

pub fn summarize(table: &PaperTable, indices: &[usize]) -> Summary {
    let rows: Vec<_> = indices.iter().map(|&i| &table.papers[i]).collect();

    let stats = table
        .numeric_columns
        .iter()
        .map(|col| {
            let values: Vec<f64> = rows.iter().filter_map(|p| p.cell(col).as_f64()).collect();
            describe(col, &values)
        })
        .collect();

    let null_counts = table
        .columns
        .iter()
        .map(|col| {
            let nulls = rows.iter().filter(|p| p.cell(col).is_null()).count();
            (col.clone(), nulls)
        })
        .collect();

    Summary {
        stats,
        null_counts,
        columns: table.columns.clone(),
        rows: rows.len(),
    }
}

// ---------------------------------------------------------------------------
// Everything the presenter shows for one filter selection
// ---------------------------------------------------------------------------

/// How many entries each chart and the preview show.
#[derive(Debug, Clone, Copy)]
pub struct ReportLimits {
    pub preview_rows: usize,
    pub top_journals: usize,
    pub top_words: usize,
    pub top_sources: usize,
}

/// Derived data for one filtered view, recomputed whenever the filters move.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Indices into the cleaned table, in table order.
    pub indices: Vec<usize>,
    /// Indices of the preview rows (a prefix of `indices`).
    pub preview: Vec<usize>,
    pub yearly: Vec<(i32, usize)>,
    pub journals: Vec<(String, usize)>,
    pub words: Vec<(String, usize)>,
    /// `None` when the table has no `source_x` column.
    pub sources: Option<Vec<(String, usize)>>,
    pub summary: Summary,
}

impl Report {
    pub fn build(table: &PaperTable, indices: Vec<usize>, limits: ReportLimits) -> Self {
        let papers = || indices.iter().map(|&i| &table.papers[i]);

        let preview = indices.iter().copied().take(limits.preview_rows).collect();
        let yearly = year_counts(papers().map(|p| p.year));
        let journals = top_n(papers().filter_map(|p| p.journal.as_deref()), limits.top_journals);
        let words = top_title_words(papers().map(|p| p.title.as_str()), limits.top_words);
        let sources = table.has_source().then(|| {
            top_n(papers().filter_map(|p| p.source_x.as_deref()), limits.top_sources)
        });
        let summary = summarize(table, &indices);

        Report {
            indices,
            preview,
            yearly,
            journals,
            words,
            sources,
            summary,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
