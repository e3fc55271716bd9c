use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::{
    CellValue, Paper, PaperTable, RawTable, ABSTRACT, ABSTRACT_WORD_COUNT, AUTHORS, JOURNAL,
    PUBLISH_TIME, SOURCE, TEXT_COLUMNS, TITLE, YEAR,
};

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// ---------------------------------------------------------------------------
// Field derivations
// ---------------------------------------------------------------------------

/// Parse a publication timestamp. Anything unrecognised is `None`.
pub fn parse_publish_time(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // Partial dates: "2020" and "2020-05".
    let digits = |t: &str, len: std::ops::RangeInclusive<usize>| {
        len.contains(&t.len()) && t.bytes().all(|b| b.is_ascii_digit())
    };
    match s.split_once('-') {
        None if digits(s, 4..=4) => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        Some((y, m)) if digits(y, 4..=4) && digits(m, 1..=2) => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)
        }
        _ => None,
    }
}

/// Calendar year of a publication date; null stays null.
pub fn derive_year(date: Option<NaiveDate>) -> Option<i32> {
    date.map(|d| d.year())
}

/// Whitespace-delimited token count; a missing abstract counts as empty.
pub fn word_count(text: Option<&str>) -> usize {
    text.unwrap_or("").split_whitespace().count()
}

// ---------------------------------------------------------------------------
// Cleaning pass
// ---------------------------------------------------------------------------

/// Turn the loaded table into the cleaned table: derive `year` and
/// `abstract_word_count`, then drop rows without a title or a parseable
/// publication time.
pub fn clean(raw: &RawTable) -> PaperTable {
    let mut columns = raw.columns.clone();
    for derived in [YEAR, ABSTRACT_WORD_COUNT] {
        if !columns.iter().any(|c| c == derived) {
            columns.push(derived.to_string());
        }
    }

    // Column dtypes are decided over the whole file, before any row is dropped.
    let mut numeric_columns: Vec<String> = raw
        .numeric_columns()
        .into_iter()
        .filter(|c| !TEXT_COLUMNS.contains(&c.as_str()) && c != PUBLISH_TIME)
        .collect();
    for derived in [YEAR, ABSTRACT_WORD_COUNT] {
        if !numeric_columns.iter().any(|c| c == derived) {
            numeric_columns.push(derived.to_string());
        }
    }
    numeric_columns.sort_by_key(|c| columns.iter().position(|col| col == c));

    let papers: Vec<Paper> = (0..raw.len())
        .filter_map(|row| clean_row(raw, row))
        .collect();

    log::info!(
        "cleaned {} rows: kept {}, dropped {} without title or publish_time",
        raw.len(),
        papers.len(),
        raw.len() - papers.len()
    );

    PaperTable {
        papers,
        columns,
        numeric_columns,
    }
}

fn clean_row(raw: &RawTable, row: usize) -> Option<Paper> {
    let text = |col: &str| raw.cell(row, col).as_text();

    let publish_time = text(PUBLISH_TIME).and_then(|s| parse_publish_time(&s));
    let year = derive_year(publish_time);
    let abstract_text = text(ABSTRACT);
    let abstract_word_count = word_count(abstract_text.as_deref());

    let title = text(TITLE)?;
    let publish_time = publish_time?;
    let year = year?;

    let extra = raw.rows[row]
        .iter()
        .filter(|(col, _)| !is_modelled(col))
        .map(|(col, value): (&String, &CellValue)| (col.clone(), value.clone()))
        .collect();

    Some(Paper {
        title,
        authors: text(AUTHORS),
        journal: text(JOURNAL),
        publish_time,
        year,
        abstract_text,
        abstract_word_count,
        source_x: text(SOURCE),
        extra,
    })
}

fn is_modelled(col: &str) -> bool {
    TEXT_COLUMNS.contains(&col) || [PUBLISH_TIME, YEAR, ABSTRACT_WORD_COUNT].contains(&col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawRecord;

    fn raw(rows: &[&[(&str, CellValue)]]) -> RawTable {
        let columns = vec![
            "cord_uid".to_string(),
            TITLE.to_string(),
            AUTHORS.to_string(),
            JOURNAL.to_string(),
            PUBLISH_TIME.to_string(),
            ABSTRACT.to_string(),
            "pubmed_id".to_string(),
        ];
        let rows = rows
            .iter()
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect::<RawRecord>()
            })
            .collect();
        RawTable { columns, rows }
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn parses_common_timestamp_forms() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
        assert_eq!(parse_publish_time("2020-05-01"), d(2020, 5, 1));
        assert_eq!(parse_publish_time(" 2020-05-01 "), d(2020, 5, 1));
        assert_eq!(parse_publish_time("2020-05-01 13:45:00"), d(2020, 5, 1));
        assert_eq!(parse_publish_time("2020-05-01T13:45:00.25"), d(2020, 5, 1));
        assert_eq!(parse_publish_time("2020-05-01T13:45:00Z"), d(2020, 5, 1));
        assert_eq!(parse_publish_time("05/01/2020"), d(2020, 5, 1));
        assert_eq!(parse_publish_time("2020"), d(2020, 1, 1));
        assert_eq!(parse_publish_time("2020-07"), d(2020, 7, 1));
        assert_eq!(parse_publish_time("1 May 2020"), d(2020, 5, 1));
    }

    #[test]
    fn unparseable_timestamp_is_null() {
        assert_eq!(parse_publish_time(""), None);
        assert_eq!(parse_publish_time("spring 2020"), None);
        assert_eq!(parse_publish_time("2020-13-01"), None);
        assert_eq!(parse_publish_time("20201"), None);
        assert_eq!(derive_year(None), None);
    }

    #[test]
    fn word_count_treats_missing_as_empty() {
        assert_eq!(word_count(None), 0);
        assert_eq!(word_count(Some("")), 0);
        assert_eq!(word_count(Some("  two\twords\n")), 2);
    }

    #[test]
    fn drops_rows_without_title_or_time() {
        let table = raw(&[
            &[(TITLE, s("Kept")), (PUBLISH_TIME, s("2020-05-01"))],
            &[(PUBLISH_TIME, s("2020-05-01"))],
            &[(TITLE, s("Bad date")), (PUBLISH_TIME, s("unknown"))],
            &[(TITLE, s("No date"))],
            &[(TITLE, CellValue::Integer(1918)), (PUBLISH_TIME, CellValue::Integer(2019))],
        ]);
        let cleaned = clean(&table);

        let titles: Vec<&str> = cleaned.papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "1918"]);
        assert_eq!(cleaned.papers[1].year, 2019);
    }

    #[test]
    fn derives_year_and_word_count() {
        let table = raw(&[
            &[
                (TITLE, s("A")),
                (PUBLISH_TIME, s("2021-03-04")),
                (ABSTRACT, s("one two three")),
            ],
            &[(TITLE, s("B")), (PUBLISH_TIME, s("2019"))],
        ]);
        let cleaned = clean(&table);

        assert_eq!(cleaned.papers[0].year, 2021);
        assert_eq!(cleaned.papers[0].abstract_word_count, 3);
        assert_eq!(cleaned.papers[1].abstract_word_count, 0);
        for paper in &cleaned.papers {
            assert_eq!(
                paper.abstract_word_count,
                word_count(paper.abstract_text.as_deref())
            );
        }
    }

    #[test]
    fn derived_columns_are_appended_and_numeric() {
        let table = raw(&[&[
            ("cord_uid", s("u1")),
            (TITLE, s("A")),
            (PUBLISH_TIME, s("2020")),
            ("pubmed_id", CellValue::Integer(42)),
        ]]);
        let cleaned = clean(&table);

        assert_eq!(
            &cleaned.columns[cleaned.columns.len() - 2..],
            &[YEAR.to_string(), ABSTRACT_WORD_COUNT.to_string()]
        );
        assert_eq!(
            cleaned.numeric_columns,
            vec!["pubmed_id", YEAR, ABSTRACT_WORD_COUNT]
        );
        assert_eq!(
            cleaned.papers[0].extra.get("cord_uid"),
            Some(&CellValue::String("u1".into()))
        );
        assert!(!cleaned.has_source());
    }

    #[test]
    fn numeric_dtype_is_decided_before_dropping_rows() {
        let table = raw(&[
            &[(TITLE, s("A")), (PUBLISH_TIME, s("2020")), ("pubmed_id", CellValue::Integer(1))],
            &[(PUBLISH_TIME, s("2020")), ("pubmed_id", s("PMID:2"))],
        ]);
        let cleaned = clean(&table);
        assert_eq!(cleaned.len(), 1);
        assert!(!cleaned.numeric_columns.contains(&"pubmed_id".to_string()));
    }
}
