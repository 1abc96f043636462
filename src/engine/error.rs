//! Error types for the join and aggregation layers.

use thiserror::Error;

/// Errors raised by `inner_join`.
///
/// A join that matches no rows is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoinError {
    #[error("Join key '{key}' not found in table '{table}'")]
    MissingKey { table: String, key: String },

    #[error("Join key '{key}' has type {left} on the left but {right} on the right")]
    KeyTypeMismatch {
        key: String,
        left: String,
        right: String,
    },
}

/// Errors raised by table operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Column '{column}' already exists in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Column '{column}' expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    #[error("Row in table '{table}' has {found} values, schema has {expected}")]
    ArityMismatch {
        table: String,
        expected: usize,
        found: usize,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
