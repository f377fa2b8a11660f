use std::path::PathBuf;

use thiserror::Error;

/// A single row failed to produce a [`SalesRecord`](super::model::SalesRecord).
///
/// `row` is the 1-based data row (the header is not counted).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row}, column '{column}': {reason}")]
pub struct RowParseError {
    pub row: usize,
    pub column: &'static str,
    pub reason: String,
}

impl RowParseError {
    pub fn new(row: usize, column: &'static str, reason: impl Into<String>) -> Self {
        Self {
            row,
            column,
            reason: reason.into(),
        }
    }
}

/// Everything that can stop a dataset from loading. All variants are fatal
/// for that load: no partial dataset is ever handed back.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path}: required column '{column}' is missing")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}: malformed input: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("{path}: {source}")]
    Row {
        path: PathBuf,
        #[source]
        source: RowParseError,
    },
}

impl DataLoadError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DataLoadError::Malformed {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The offending row, when the load failed on a single record.
    pub fn row_error(&self) -> Option<&RowParseError> {
        match self {
            DataLoadError::Row { source, .. } => Some(source),
            _ => None,
        }
    }
}
