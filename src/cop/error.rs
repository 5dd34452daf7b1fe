use crate::units::error::UnitError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Column '{column}' not found in measurement table (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Column '{column}' holds {dtype} values, expected numbers")]
    NonNumericColumn { column: String, dtype: String },

    #[error("Index column '{0}' contains duplicate values")]
    DuplicateIndex(String),

    #[error("Failed to read measurement table from '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
