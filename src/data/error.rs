use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the data layer.
///
/// `Load`, `Schema` and `TypeCoercion` abort dashboard construction.
/// `GeoData` only disables the county map.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' is missing")]
    Schema(String),

    #[error("row {row}: column '{column}' value '{value}' is not a non-negative integer")]
    TypeCoercion {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("geographic boundaries unavailable: {0}")]
    GeoData(String),

    #[error("failed to export CSV: {0}")]
    Export(String),
}

impl DataError {
    /// Whether the rest of the dashboard can keep running after this error.
    pub fn is_contained(&self) -> bool {
        matches!(self, DataError::GeoData(_) | DataError::Export(_))
    }
}
