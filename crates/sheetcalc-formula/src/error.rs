//! Formula error types

use sheetcalc_core::ErrorKind;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error at {position}: {message}")]
    Parse {
        /// Byte offset into the formula text
        position: usize,
        message: String,
    },

    /// A spreadsheet error raised while evaluating
    #[error("Evaluation raised {0}")]
    Raised(ErrorKind),
}

impl FormulaError {
    /// Map to the canonical error kind stored on a cell
    ///
    /// Parse failures have no kind of their own and become
    /// [`ErrorKind::Error`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::Parse { .. } => ErrorKind::Error,
            FormulaError::Raised(kind) => *kind,
        }
    }
}

impl From<ErrorKind> for FormulaError {
    fn from(kind: ErrorKind) -> Self {
        FormulaError::Raised(kind)
    }
}
