//! # sheetcalc
//!
//! An incremental spreadsheet formula engine.
//!
//! A [`Sheet`] holds a sparse grid of cells. Each cell holds a literal or
//! a formula; formulas are parsed and evaluated as they are set, every
//! cell they read is recorded as a dependency, and setting a cell
//! re-evaluates everything downstream of it in dependency order. Circular
//! references end up as `#REF!` on every cell of the cycle.
//!
//! ## Features
//!
//! - A1-style references, `$` markers, and column-major ranges
//! - Arithmetic, comparison, and concatenation operators
//! - A builtin function catalog behind an allow-list
//! - Canonical spreadsheet errors that propagate through references
//! - Optional `serde` support for snapshots
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc::{ErrorKind, Sheet, Value};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("B1", "1").unwrap();
//! sheet.set_cell("B2", "2").unwrap();
//! sheet.set_cell("B3", "3").unwrap();
//! sheet.set_cell("A1", "=SUM(B1:B3)").unwrap();
//! assert_eq!(sheet.get_cell("A1").unwrap().value, Value::Number(6.0));
//!
//! sheet.set_cell("B2", "10").unwrap();
//! assert_eq!(sheet.get_cell("A1").unwrap().value, Value::Number(14.0));
//!
//! // Circular references
//! sheet.set_cell("C1", "=C2").unwrap();
//! sheet.set_cell("C2", "=C1").unwrap();
//! assert_eq!(sheet.get_cell("C1").unwrap().error, Some(ErrorKind::Ref));
//! ```

pub mod recalc;
pub mod sheet;

pub use recalc::RecalcStep;
pub use sheet::{CellOutcome, CellSnapshot, RecalcReport, Sheet};

// Re-export core types
pub use sheetcalc_core::{
    CellAddress, CellPatch, CellRange, CellRecord, CellStore, Error, ErrorKind, Result, Value,
};

// Re-export formula types
pub use sheetcalc_formula::{
    parse_formula, CellValueProvider, EvaluationOptions, FormulaError, FunctionDef,
    FunctionRegistry, MissingCellPolicy,
};
