//! Error types for sqlset

use thiserror::Error;

/// The main error type for sqlset operations
///
/// Every rendering and extraction step returns the first error it runs
/// into; no partial SQL is ever handed back alongside an error.
#[derive(Error, Debug)]
pub enum Error {
    /// The statement has no FROM / target table
    #[error("No source found when generating {statement} sql")]
    NoSourceDefined { statement: &'static str },

    /// RETURNING was requested but the dialect cannot render it
    #[error("Dialect '{dialect}' does not support RETURNING clause")]
    UnsupportedReturning { dialect: String },

    /// A multi-row insert with rows of different widths
    #[error("Rows with different value length expected {expected} got {got}")]
    RowLengthMismatch { expected: usize, got: usize },

    /// A multi-row insert with rows keyed by different columns
    #[error("Rows with different keys expected {expected} got {got}")]
    KeyMismatch { expected: String, got: String },

    /// A batch mixing maps and records, or records of different types
    #[error("Rows must be all the same type expected {expected} got {got}")]
    TypeMismatch { expected: String, got: String },

    /// A row that is neither map-like nor record-like
    #[error("Unsupported row must be a record, a json object, or a model type got: {kind}")]
    UnsupportedInputType { kind: String },

    /// A value the dialect has no literal form for
    #[error("Unable to encode value {value}")]
    UnsupportedValueType { value: String },

    /// A conditioned join (INNER, LEFT, ...) without ON / USING
    #[error("Join condition required for conditioned join ({join})")]
    MissingJoinCondition { join: String },

    /// A comparison operator missing from the dialect's operator table
    #[error("Boolean operator '{operator}' not supported by dialect '{dialect}'")]
    UnsupportedOperator { operator: String, dialect: String },

    /// UPDATE (or ON CONFLICT DO UPDATE) without any assignment
    #[error("No update values provided")]
    NoUpdateValues,

    /// ON CONFLICT ... DO UPDATE ... WHERE on a dialect that cannot render it
    #[error("Dialect '{dialect}' does not support upsert with where clause")]
    UnsupportedConflictWhere { dialect: String },

    /// A field's custom value conversion failed
    #[error("Unable to convert value for column '{column}': {message}")]
    ValueConversion { column: String, message: String },

    /// Dialect configuration could not be decoded
    #[error("Invalid dialect configuration: {0}")]
    InvalidDialectConfig(#[from] serde_json::Error),

    /// A fetched row could not be decoded into the requested type
    #[error("Unable to decode row: {0}")]
    RowDecode(String),

    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience Result type for sqlset operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new missing source error
    pub fn no_source(statement: &'static str) -> Self {
        Self::NoSourceDefined { statement }
    }

    /// Create a new unsupported returning error
    pub fn unsupported_returning(dialect: impl Into<String>) -> Self {
        Self::UnsupportedReturning {
            dialect: dialect.into(),
        }
    }

    /// Create a new unsupported value error
    pub fn unsupported_value(value: impl Into<String>) -> Self {
        Self::UnsupportedValueType {
            value: value.into(),
        }
    }

    /// Create a new unsupported operator error
    pub fn unsupported_operator(operator: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
            dialect: dialect.into(),
        }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a new value conversion error
    pub fn value_conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValueConversion {
            column: column.into(),
            message: message.into(),
        }
    }
}
