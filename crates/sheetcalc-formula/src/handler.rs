//! The interface between the grammar and whatever consumes it
//!
//! The parser never builds values itself. Each grammar action calls one
//! method on a [`FormulaHandler`], in evaluation order, and threads the
//! returned outputs into the enclosing action. [`AstBuilder`] turns those
//! calls into a [`FormulaExpr`]; the evaluator computes values directly.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use sheetcalc_core::{CellAddress, CellRange, ErrorKind};

/// Grammar actions invoked by the parser
pub trait FormulaHandler {
    /// What each sub-expression produces
    type Output;

    /// Numeric literal
    fn number(&mut self, value: f64) -> Self::Output;

    /// String literal
    fn text(&mut self, value: String) -> Self::Output;

    /// `TRUE` / `FALSE`
    fn boolean(&mut self, value: bool) -> Self::Output;

    /// Error literal such as `#REF!`
    fn error(&mut self, kind: ErrorKind) -> Self::Output;

    /// Single cell reference
    fn cell(&mut self, address: CellAddress) -> Self::Output;

    /// Range reference, already normalized
    fn range(&mut self, range: CellRange) -> Self::Output;

    /// Function call. `name` is uppercase; a bare identifier arrives here
    /// with no arguments.
    fn call(&mut self, name: &str, args: Vec<Self::Output>) -> Self::Output;

    /// Prefix or postfix operator
    fn unary(&mut self, op: UnaryOperator, operand: Self::Output) -> Self::Output;

    /// Infix operator
    fn binary(
        &mut self,
        op: BinaryOperator,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output;
}

/// Handler that materializes the syntax tree
#[derive(Debug, Default, Clone, Copy)]
pub struct AstBuilder;

impl FormulaHandler for AstBuilder {
    type Output = FormulaExpr;

    fn number(&mut self, value: f64) -> FormulaExpr {
        FormulaExpr::Number(value)
    }

    fn text(&mut self, value: String) -> FormulaExpr {
        FormulaExpr::Text(value)
    }

    fn boolean(&mut self, value: bool) -> FormulaExpr {
        FormulaExpr::Boolean(value)
    }

    fn error(&mut self, kind: ErrorKind) -> FormulaExpr {
        FormulaExpr::Error(kind)
    }

    fn cell(&mut self, address: CellAddress) -> FormulaExpr {
        FormulaExpr::Cell(address)
    }

    fn range(&mut self, range: CellRange) -> FormulaExpr {
        FormulaExpr::Range(range)
    }

    fn call(&mut self, name: &str, args: Vec<FormulaExpr>) -> FormulaExpr {
        FormulaExpr::Function {
            name: name.to_string(),
            args,
        }
    }

    fn unary(&mut self, op: UnaryOperator, operand: FormulaExpr) -> FormulaExpr {
        FormulaExpr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    fn binary(&mut self, op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
        FormulaExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
