//! Data layer: loading, cleaning, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  metadata.csv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RawTable (original columns)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  clean    │  publish_time → date, year, abstract_word_count,
//!   └──────────┘  drop rows without title / publish_time → PaperTable
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year range + journal set → filtered indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  stats    │  counts, title words, describe() → Report
//!   └──────────┘
//! ```

pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};

use model::PaperTable;

/// Load a dataset file and clean it.
pub fn load_dataset(path: &Path) -> Result<PaperTable> {
    let raw = loader::load_file(path)
        .with_context(|| format!("loading dataset {}", path.display()))?;
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        raw.len(),
        raw.columns,
        path.display()
    );
    Ok(clean::clean(&raw))
}
