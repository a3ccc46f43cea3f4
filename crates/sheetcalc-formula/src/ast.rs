//! Formula Abstract Syntax Tree types

use sheetcalc_core::{CellAddress, CellRange, ErrorKind};

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal
    Text(String),
    /// Boolean literal
    Boolean(bool),
    /// Error literal
    Error(ErrorKind),

    // === References ===
    /// Single cell reference
    Cell(CellAddress),
    /// Range reference
    Range(CellRange),

    // === Operators ===
    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    // === Function call ===
    /// Function call; bare identifiers are calls with no arguments
    Function { name: String, args: Vec<FormulaExpr> },
}

impl FormulaExpr {
    /// Collect every cell the expression references, ranges expanded
    /// column by column, in the order they appear.
    pub fn references(&self) -> Vec<CellAddress> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<CellAddress>) {
        match self {
            FormulaExpr::Cell(addr) => out.push(*addr),
            FormulaExpr::Range(range) => out.extend(range.cells()),
            FormulaExpr::Binary { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            FormulaExpr::Unary { operand, .. } => operand.collect_references(out),
            FormulaExpr::Function { args, .. } => {
                for arg in args {
                    arg.collect_references(out);
                }
            }
            FormulaExpr::Number(_)
            | FormulaExpr::Text(_)
            | FormulaExpr::Boolean(_)
            | FormulaExpr::Error(_) => {}
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Text
    Concat,
}

impl BinaryOperator {
    /// `+ - * / ^`
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Power
        )
    }

    /// `= <> < <= > >=`
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterEqual
        )
    }

    /// Operator as written in a formula
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Concat => "&",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Prefix `+`
    Plus,
    /// Prefix `-`
    Negate,
    /// Postfix `%`
    Percent,
}
