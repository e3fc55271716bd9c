use thiserror::Error;

/// Reasons a dataset file is rejected before cleaning.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    MalformedRecord { row: usize, message: String },

    #[error("expected a top-level JSON array of records")]
    NotAnArray,
}
