use std::io;

use thiserror::Error;

use crate::variable::Kind;

/// Convenience alias for data set operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors propagated by schema, row store, import and export operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("column '{0}' not found")]
    NotFound(String),
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("size mismatch for {context}: expected {expected} bytes, found {found}")]
    SizeMismatch {
        context: String,
        expected: usize,
        found: usize,
    },
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("value for column '{column}' is {len} bytes, column width is {width}")]
    FieldTooLong {
        column: String,
        len: usize,
        width: usize,
    },
    #[error("cannot determine type and width of column '{0}'")]
    UndeterminedSchema(String),
    #[error("column name '{0}' is already in use")]
    NameConflict(String),
    #[error("column '{column}' is not {expected}")]
    KindMismatch { column: String, expected: Kind },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DataError {
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        DataError::InvalidSchema(reason.into())
    }

    pub fn not_found(column: impl Into<String>) -> Self {
        DataError::NotFound(column.into())
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        DataError::OutOfRange { index, len }
    }

    pub fn size_mismatch(context: impl Into<String>, expected: usize, found: usize) -> Self {
        DataError::SizeMismatch {
            context: context.into(),
            expected,
            found,
        }
    }

    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        DataError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn field_too_long(column: impl Into<String>, len: usize, width: usize) -> Self {
        DataError::FieldTooLong {
            column: column.into(),
            len,
            width,
        }
    }

    pub fn kind_mismatch(column: impl Into<String>, expected: Kind) -> Self {
        DataError::KindMismatch {
            column: column.into(),
            expected,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map_or(0, |pos| pos.line());
        match error.into_kind() {
            csv::ErrorKind::Io(source) => DataError::Io(source),
            other => DataError::malformed(line, format!("{:?}", other)),
        }
    }
}
