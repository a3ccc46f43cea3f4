//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")
//! - [`ErrorKind`] - Canonical error kinds and their display tokens
//! - [`Value`] - The computed value of a cell
//! - [`CellStore`] - The set of cell records and their dependency edges

mod address;
mod error;
mod store;
mod value;

pub use address::{iterate_range, CellAddress, CellRange, CellRangeIterator};
pub use error::ErrorKind;
pub use store::{CellPatch, CellRecord, CellStore};
pub use value::{parse_numeric, Value};
