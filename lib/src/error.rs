use polars::error::PolarsError;
use polars::prelude::DataType;
use std::error::Error as StdError;
use std::io::Error as IoError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// The source was readable but is not valid delimited data.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A predicate or transform named a column the table does not have.
    #[error("Unknown column `{column}` referenced by `{option}`")]
    UnknownColumn { option: &'static str, column: String },

    #[error("Column `{column}` has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: DataType,
    },

    #[error("Column `{0}` has no values")]
    EmptyColumn(String),
}
