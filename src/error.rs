//! Error types for enrollment-db
//!
//! Construction errors (`ShapeError`, `DuplicateName`, `DuplicateCode`,
//! `ConsistencyError`) are fatal: the dataset cannot be built. Query errors
//! (`LookupError`, `EmptySet`) are recoverable and reported to the caller.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// enrollment-db error types
#[derive(Error, Debug)]
pub enum Error {
    /// Raw year rows do not reshape into (years, schools, grades)
    #[error("Shape error: {0}")]
    ShapeError(String),

    /// Position outside one of the tensor axes
    #[error("Index error: {axis} position {position} out of range ({axis} axis has {len} entries)")]
    IndexError {
        /// Axis name (year, school or grade)
        axis: &'static str,
        /// Requested position
        position: usize,
        /// Length of the axis
        len: usize,
    },

    /// One school name paired with two different codes
    #[error("Duplicate school name: {name} maps to both {first} and {second}")]
    DuplicateName {
        /// School name
        name: String,
        /// Code seen first
        first: i64,
        /// Conflicting code
        second: i64,
    },

    /// One school code paired with two different names
    #[error("Duplicate school code: {code} maps to both {first:?} and {second:?}")]
    DuplicateCode {
        /// School code
        code: i64,
        /// Name seen first
        first: String,
        /// Conflicting name
        second: String,
    },

    /// School metadata does not line up with the enrollment tensor
    #[error("Consistency error: {0}")]
    ConsistencyError(String),

    /// Identifier matches neither a school name nor a school code
    #[error("{0}")]
    LookupError(String),

    /// Statistic is undefined because no values qualify
    #[error("Empty set: {0}")]
    EmptySet(String),

    /// Invalid dataset configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Metadata loading error (CSV/Parquet/Arrow)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a query loop can report this error and keep going.
    ///
    /// Everything else means the dataset or its inputs are unusable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::LookupError(_) | Self::EmptySet(_))
    }
}
