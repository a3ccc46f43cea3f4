//! Error types for sheetcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Caller mistakes when naming cells and ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("invalid cell id: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("row {0} is past the last row ({1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("column {0} is past the last column ({1})")]
    ColumnOutOfBounds(u32, u16),
}
