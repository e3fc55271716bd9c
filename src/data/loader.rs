use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{
    CellValue, RawRecord, RawTable, PUBLISH_TIME, REQUIRED_COLUMNS, TEXT_COLUMNS,
};

/// Cell texts pandas reads as missing values.
const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metadata table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one paper per record (CORD-19 `metadata.csv`)
/// * `.parquet` – the same columns written by pandas or polars
/// * `.json`    – `[{ "title": ..., "journal": ..., ... }, ...]`
///
/// The result must contain every column in [`REQUIRED_COLUMNS`].
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    for required in REQUIRED_COLUMNS {
        if !table.has_column(required) {
            return Err(LoadError::MissingColumn(required.to_string()).into());
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, then one record per paper. Short records
/// are padded with nulls; records longer than the header are rejected.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        if record.len() > columns.len() {
            return Err(LoadError::MalformedRecord {
                row: row_no,
                message: format!(
                    "expected {} fields, found {}",
                    columns.len(),
                    record.len()
                ),
            }
            .into());
        }

        let row: RawRecord = columns
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let value = record.get(col_idx).map_or(CellValue::Null, text_or_null);
                (name.clone(), value)
            })
            .collect();

        rows.push(row);
    }

    let mut table = RawTable { columns, rows };
    for column in table.columns.clone() {
        if !TEXT_COLUMNS.contains(&column.as_str()) && column != PUBLISH_TIME {
            infer_column_type(&mut table, &column);
        }
    }

    log::debug!("read {} CSV records from {}", table.len(), path.display());
    Ok(table)
}

/// Raw cell text, or null for the markers pandas reads as missing.
fn text_or_null(s: &str) -> CellValue {
    if NA_VALUES.contains(&s) {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

/// Give a column one dtype, decided over all of its cells: integer, then
/// float, then boolean. If any non-null cell fails a parse the column
/// stays text and every cell keeps its exact input.
fn infer_column_type(table: &mut RawTable, column: &str) {
    let cells = || {
        table.rows.iter().filter_map(|r| match r.get(column) {
            Some(CellValue::String(s)) => Some(s.as_str()),
            _ => None,
        })
    };

    let parse: fn(&str) -> Option<CellValue> = if cells().all(|s| s.parse::<i64>().is_ok()) {
        |s| s.parse().ok().map(CellValue::Integer)
    } else if cells().all(|s| s.parse::<f64>().is_ok()) {
        |s| s.parse().ok().map(CellValue::Float)
    } else if cells().all(|s| parse_bool(s).is_some()) {
        |s| parse_bool(s).map(CellValue::Bool)
    } else {
        return;
    };

    for row in &mut table.rows {
        if let Some(cell) = row.get_mut(column) {
            let typed = match cell {
                CellValue::String(s) => parse(s),
                _ => None,
            };
            if let Some(typed) = typed {
                *cell = typed;
            }
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Column order is the order keys are first seen.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| LoadError::MalformedRecord {
            row: i,
            message: "not a JSON object".to_string(),
        })?;

        let mut row = RawRecord::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the metadata columns.
///
/// Text, integer, float and boolean columns map directly onto [`CellValue`];
/// anything else (dates, timestamps, decimals) is cast to text first so the
/// cleaner can parse it like a CSV cell.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let mut batch_rows = vec![RawRecord::new(); batch.num_rows()];

        for (col_idx, name) in columns.iter().enumerate() {
            let cells = column_cells(batch.column(col_idx))
                .with_context(|| format!("converting parquet column '{name}'"))?;
            for (row, cell) in batch_rows.iter_mut().zip(cells) {
                row.insert(name.clone(), cell);
            }
        }
        rows.extend(batch_rows);
    }

    Ok(RawTable { columns, rows })
}

/// Convert one Arrow column into cells, row by row.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>> {
    let cells = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string::<i32>();
            (0..arr.len())
                .map(|i| text_cell(arr.is_null(i), || arr.value(i)))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            (0..arr.len())
                .map(|i| text_cell(arr.is_null(i), || arr.value(i)))
                .collect()
        }
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(CellValue::Null, CellValue::Bool))
            .collect(),
        dt if dt.is_integer() => {
            let widened = cast(col, &DataType::Int64)?;
            widened
                .as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Integer))
                .collect()
        }
        dt if dt.is_floating() => {
            let widened = cast(col, &DataType::Float64)?;
            widened
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| match v {
                    Some(f) if !f.is_nan() => CellValue::Float(f),
                    _ => CellValue::Null,
                })
                .collect()
        }
        _ => {
            let text = cast(col, &DataType::Utf8)?;
            let arr = text.as_string::<i32>();
            (0..arr.len())
                .map(|i| text_cell(arr.is_null(i), || arr.value(i)))
                .collect()
        }
    };
    Ok(cells)
}

fn text_cell<'a>(is_null: bool, value: impl FnOnce() -> &'a str) -> CellValue {
    if is_null {
        CellValue::Null
    } else {
        CellValue::String(value().to_string())
    }
}
