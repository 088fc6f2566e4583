use thiserror::Error;

/// Errors raised by the validation core.
///
/// Only dataset-level structural problems are fatal; every row-level finding
/// is returned inside a [`crate::ValidationReport`] instead of erroring.
#[derive(Debug, Error)]
pub enum IamcError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required identity column(s): {0}")]
    MissingIdentityColumns(String),
    #[error("no parseable year columns found")]
    NoYearColumns,
    #[error("dataset reports no years; nothing to validate")]
    EmptyYearSet,
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, IamcError>;
