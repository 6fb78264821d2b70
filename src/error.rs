//! Error type shared by both loading pipelines and the row accessors.

use thiserror::Error;

use crate::data::ValueKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading a table or reading from one.
///
/// Structural variants abort the whole load; no partial table is produced.
/// `TypeMismatch` and `FieldNotFound` are only raised by typed row access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("input is empty or has no header line")]
    EmptyInput,

    #[error("header column '{0}' appears more than once")]
    DuplicateHeader(String),

    #[error("header has no column for field '{0}'")]
    MissingHeader(String),

    #[error("line {line} has {actual} column(s) but the header has {expected}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("field '{field}' holds {actual}, not {requested}")]
    TypeMismatch {
        field: String,
        requested: ValueKind,
        actual: ValueKind,
    },

    #[error("field '{0}' is not part of this table")]
    FieldNotFound(String),

    #[error("invalid field set: {0}")]
    InvalidFieldSet(String),

    #[error("delimiter byte 0x{0:02x} is not a usable single-character delimiter")]
    InvalidDelimiter(u8),

    #[error("malformed field set definition: {0}")]
    FieldSetFormat(String),
}
