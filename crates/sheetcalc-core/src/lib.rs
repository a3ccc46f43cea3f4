//! # sheetcalc-core
//!
//! Core data structures for the sheetcalc formula engine.
//!
//! This crate provides the fundamental types used throughout sheetcalc:
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and column-major range iteration
//! - [`ErrorKind`] - The canonical spreadsheet error taxonomy
//! - [`Value`] - Computed cell values and coercion rules
//! - [`CellStore`] - Cell records plus dependency bookkeeping
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{CellAddress, CellRange};
//!
//! let addr = CellAddress::parse("$B$3").unwrap();
//! assert_eq!((addr.row, addr.col), (2, 1));
//! assert_eq!(addr.to_string(), "B3");
//!
//! // Ranges are normalized and iterated column by column
//! let ids: Vec<String> = CellRange::parse("B2:A1")
//!     .unwrap()
//!     .cells()
//!     .map(|a| a.to_string())
//!     .collect();
//! assert_eq!(ids, ["A1", "A2", "B1", "B2"]);
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{
    iterate_range, parse_numeric, CellAddress, CellPatch, CellRange, CellRecord, CellStore,
    ErrorKind, Value,
};
pub use error::{Error, Result};

/// Maximum number of rows in a sheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
