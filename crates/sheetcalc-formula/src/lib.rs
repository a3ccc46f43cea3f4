//! # sheetcalc-formula
//!
//! Formula parser and evaluator for sheetcalc.
//!
//! This crate provides:
//! - A recursive-descent formula parser driving a [`FormulaHandler`]
//! - [`AstBuilder`], a handler that produces a [`FormulaExpr`] tree
//! - [`Evaluator`], a handler that computes values and records dependencies
//! - A registry of builtin spreadsheet functions behind an allow-list
//!
//! ## Example
//!
//! ```rust
//! use sheetcalc_core::{CellAddress, CellPatch, CellStore, Value};
//! use sheetcalc_formula::{Evaluator, FunctionRegistry};
//!
//! let mut store = CellStore::new();
//! let a1 = CellAddress::parse("A1").unwrap();
//! store.upsert(a1, CellPatch::new().literal(Value::Number(4.0)));
//!
//! let registry = FunctionRegistry::shared();
//! let b1 = CellAddress::parse("B1").unwrap();
//! let mut evaluator = Evaluator::new(b1, &mut store, &registry);
//! assert_eq!(evaluator.evaluate("=SQRT(A1) + 1"), Ok(Value::Number(3.0)));
//!
//! // B1 now reads A1
//! assert_eq!(store.direct_dependents(&a1).collect::<Vec<_>>(), [b1]);
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod functions;
pub mod handler;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use eval::{
    apply_arithmetic, apply_comparison, apply_concat, apply_unary, CellValueProvider,
    EvaluationOptions, Evaluator, MissingCellPolicy, DEFAULT_MAX_RANGE_CELLS,
};
pub use functions::{FunctionDef, FunctionImpl, FunctionRegistry, SUPPORTED_FUNCTIONS};
pub use handler::{AstBuilder, FormulaHandler};
pub use parser::{parse_formula, parse_with};
