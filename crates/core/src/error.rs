//! Error types for canopy

use thiserror::Error;

/// Main error type for canopy operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An image file could not be decoded. Recovered per image by the assembler.
    #[error("Cannot decode image '{id}': {reason}")]
    Decode { id: String, reason: String },

    /// A capture-order token is missing or malformed. Fatal for the run.
    #[error("Cannot determine capture order of '{id}': {reason}")]
    Ordering { id: String, reason: String },

    #[error("Growth analysis requires at least one record")]
    EmptySeries,

    #[error("Insufficient data: need at least {needed} records, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a decode failure on one sample.
    pub fn decode(id: impl Into<String>, reason: impl ToString) -> Self {
        Error::Decode {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    /// Shorthand for an ordering failure on one sample.
    pub fn ordering(id: impl Into<String>, reason: impl ToString) -> Self {
        Error::Ordering {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for canopy operations
pub type Result<T> = std::result::Result<T, Error>;
