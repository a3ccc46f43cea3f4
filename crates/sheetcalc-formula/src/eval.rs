//! Formula evaluation
//!
//! [`Evaluator`] is a [`FormulaHandler`] that computes values while the
//! parser walks the formula. It evaluates on behalf of one *current* cell
//! and records every cell the formula reads as a dependency of that cell
//! in the [`CellStore`].
//!
//! Failures travel as `Err(ErrorKind)` through the grammar actions rather
//! than aborting the parse, so a formula that fails on its first
//! reference still records edges for all the others.

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::handler::FormulaHandler;
use crate::parser::parse_with;
use sheetcalc_core::{CellAddress, CellPatch, CellRange, CellStore, ErrorKind, Value};
use std::cmp::Ordering;
use tracing::debug;

/// Default cap on the number of cells one range reference may cover
pub const DEFAULT_MAX_RANGE_CELLS: usize = 1_000_000;

/// How a reference to a cell with no value reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCellPolicy {
    /// Read as `0`
    #[default]
    Zero,
    /// Raise `#N/A!`
    NotAvailable,
}

/// Evaluation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Policy for single-cell references to missing or empty cells
    pub missing_cells: MissingCellPolicy,
    /// Largest range a formula may reference; bigger ranges raise `#REF!`
    pub max_range_cells: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            missing_cells: MissingCellPolicy::Zero,
            max_range_cells: DEFAULT_MAX_RANGE_CELLS,
        }
    }
}

/// Values for cells the store does not manage
///
/// Consulted only when a referenced cell has no record.
pub trait CellValueProvider {
    /// Read the value at 0-based coordinates, `None` when there is none
    fn read(&self, row: u32, col: u16) -> Option<Value>;
}

impl<F> CellValueProvider for F
where
    F: Fn(u32, u16) -> Option<Value>,
{
    fn read(&self, row: u32, col: u16) -> Option<Value> {
        self(row, col)
    }
}

/// Evaluates formulas for one cell
pub struct Evaluator<'a> {
    current: CellAddress,
    store: &'a mut CellStore,
    registry: &'a FunctionRegistry,
    provider: Option<&'a dyn CellValueProvider>,
    options: EvaluationOptions,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator for `current`
    pub fn new(
        current: CellAddress,
        store: &'a mut CellStore,
        registry: &'a FunctionRegistry,
    ) -> Self {
        Self {
            current,
            store,
            registry,
            provider: None,
            options: EvaluationOptions::default(),
        }
    }

    /// Consult `provider` for cells without a record
    pub fn with_provider(mut self, provider: &'a dyn CellValueProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the evaluation settings
    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    /// The cell being evaluated
    pub fn current(&self) -> CellAddress {
        self.current
    }

    /// Parse and evaluate `formula` (with or without a leading `=`).
    ///
    /// Dependency edges are recorded on the current cell as a side effect,
    /// whether or not evaluation succeeds. Existing edges are kept; callers
    /// that re-evaluate clear them first.
    pub fn evaluate(&mut self, formula: &str) -> FormulaResult<Value> {
        debug!(cell = %self.current, formula, "evaluating");

        let outcome = parse_with(formula, self)?;
        outcome.map_err(FormulaError::Raised)
    }

    fn record_dependencies<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = CellAddress>,
    {
        self.store
            .upsert(self.current, CellPatch::new().depend_on(cells));
    }

    /// Stored outcome of a referenced cell, `Ok(None)` when it has no value
    fn stored_value(&self, address: &CellAddress) -> Result<Option<Value>, ErrorKind> {
        if self.store.is_removed(address) {
            return Err(ErrorKind::Ref);
        }

        let Some(record) = self.store.get(address) else {
            return Ok(None);
        };

        // The referenced cell already reads this one
        if record.dependencies.contains(&self.current) {
            return Err(ErrorKind::Ref);
        }
        if let Some(kind) = record.error {
            return Err(kind);
        }
        if record.value.is_null() {
            return Ok(None);
        }

        Ok(Some(record.value.clone().coerce()))
    }

    /// Read a single cell reference
    pub fn resolve_scalar(&mut self, address: CellAddress) -> Result<Value, ErrorKind> {
        self.record_dependencies([address]);

        if let Some(value) = self.stored_value(&address)? {
            return Ok(value);
        }

        if !self.store.contains(&address) {
            let external = self
                .provider
                .and_then(|provider| provider.read(address.row, address.col));
            if let Some(value) = external {
                if !value.is_null() {
                    return Ok(value.coerce());
                }
            }
        }

        match self.options.missing_cells {
            MissingCellPolicy::Zero => Ok(Value::Number(0.0)),
            MissingCellPolicy::NotAvailable => Err(ErrorKind::NotAvailable),
        }
    }

    /// Read a range reference as a flat column-major array.
    ///
    /// Missing and empty cells are `Null`; the first error found is raised.
    pub fn resolve_range(&mut self, range: CellRange) -> Result<Value, ErrorKind> {
        if range.cell_count() > self.options.max_range_cells as u64 {
            debug!(range = %range, cells = range.cell_count(), "range too large");
            return Err(ErrorKind::Ref);
        }

        self.record_dependencies(range.cells());

        let mut values = Vec::new();
        for address in range.cells() {
            let value = match self.stored_value(&address)? {
                Some(value) => value,
                None if self.store.contains(&address) => Value::Null,
                None => self
                    .provider
                    .and_then(|provider| provider.read(address.row, address.col))
                    .map(Value::coerce)
                    .unwrap_or(Value::Null),
            };
            values.push(value);
        }

        Ok(Value::Array(values))
    }

    /// Call a function by name with evaluated arguments
    pub fn invoke_function(
        &self,
        name: &str,
        args: Vec<Result<Value, ErrorKind>>,
    ) -> Result<Value, ErrorKind> {
        let name = name.to_uppercase();
        let Some(def) = self.registry.lookup(&name) else {
            debug!(cell = %self.current, function = %name, "unknown function");
            return Err(ErrorKind::Name);
        };

        if !def.accepts(args.len()) {
            debug!(
                cell = %self.current,
                function = %name,
                args = args.len(),
                "wrong number of arguments"
            );
            return Err(ErrorKind::NotAvailable);
        }

        let args = args.into_iter().collect::<Result<Vec<_>, _>>()?;
        (def.implementation)(&args)
    }
}

/// `+ - * / ^` on two values
pub fn apply_arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, ErrorKind> {
    let l = left.to_number()?;
    let r = right.to_number()?;

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
        BinaryOperator::Power => l.powf(r),
        _ => return Err(ErrorKind::Value),
    };

    if result.is_nan() {
        return Err(ErrorKind::Value);
    }
    if result.is_infinite() {
        return Err(if op == BinaryOperator::Divide {
            ErrorKind::DivZero
        } else {
            ErrorKind::Num
        });
    }

    Ok(Value::Number(result))
}

/// Comparison operators; always yields a boolean
pub fn apply_comparison(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, ErrorKind> {
    let ordering = compare_values(left, right)?;

    let result = match op {
        BinaryOperator::Equal => ordering == Ordering::Equal,
        BinaryOperator::NotEqual => ordering != Ordering::Equal,
        BinaryOperator::LessThan => ordering == Ordering::Less,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        BinaryOperator::GreaterThan => ordering == Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        _ => return Err(ErrorKind::Value),
    };

    Ok(Value::Boolean(result))
}

/// `&` on two values
pub fn apply_concat(left: &Value, right: &Value) -> Result<Value, ErrorKind> {
    let mut text = left.to_text()?;
    text.push_str(&right.to_text()?);
    Ok(Value::Text(text))
}

/// Prefix `+`/`-` and postfix `%`
pub fn apply_unary(op: UnaryOperator, operand: Value) -> Result<Value, ErrorKind> {
    match op {
        UnaryOperator::Plus => Ok(operand),
        UnaryOperator::Negate => Ok(Value::Number(-operand.to_number()?)),
        UnaryOperator::Percent => Ok(Value::Number(operand.to_number()? / 100.0)),
    }
}

/// Sort rank of mixed kinds: numbers < text < booleans
fn rank(value: &Value) -> u8 {
    match value {
        Value::Null | Value::Number(_) | Value::Date(_) => 0,
        Value::Text(_) => 1,
        Value::Boolean(_) => 2,
        Value::Array(_) => 3,
    }
}

/// An empty cell compares as the blank value of the other side's kind
fn blank_like(other: &Value) -> Value {
    match other {
        Value::Text(_) => Value::Text(String::new()),
        Value::Boolean(_) => Value::Boolean(false),
        _ => Value::Number(0.0),
    }
}

fn compare_values(left: &Value, right: &Value) -> Result<Ordering, ErrorKind> {
    match (left, right) {
        (Value::Array(_), _) | (_, Value::Array(_)) => Err(ErrorKind::Value),
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Null, other) => compare_values(&blank_like(other), other),
        (other, Value::Null) => compare_values(other, &blank_like(other)),
        (Value::Number(l) | Value::Date(l), Value::Number(r) | Value::Date(r)) => {
            Ok(l.partial_cmp(r).unwrap_or(Ordering::Equal))
        }
        (Value::Text(l), Value::Text(r)) => Ok(l.to_lowercase().cmp(&r.to_lowercase())),
        (Value::Boolean(l), Value::Boolean(r)) => Ok(l.cmp(r)),
        (l, r) => Ok(rank(l).cmp(&rank(r))),
    }
}

impl FormulaHandler for Evaluator<'_> {
    type Output = Result<Value, ErrorKind>;

    fn number(&mut self, value: f64) -> Self::Output {
        Ok(Value::Number(value))
    }

    fn text(&mut self, value: String) -> Self::Output {
        Ok(Value::Text(value))
    }

    fn boolean(&mut self, value: bool) -> Self::Output {
        Ok(Value::Boolean(value))
    }

    fn error(&mut self, kind: ErrorKind) -> Self::Output {
        Err(kind)
    }

    fn cell(&mut self, address: CellAddress) -> Self::Output {
        self.resolve_scalar(address)
    }

    fn range(&mut self, range: CellRange) -> Self::Output {
        self.resolve_range(range)
    }

    fn call(&mut self, name: &str, args: Vec<Self::Output>) -> Self::Output {
        self.invoke_function(name, args)
    }

    fn unary(&mut self, op: UnaryOperator, operand: Self::Output) -> Self::Output {
        apply_unary(op, operand?)
    }

    fn binary(&mut self, op: BinaryOperator, left: Self::Output, right: Self::Output) -> Self::Output {
        let left = left?;
        let right = right?;

        if op.is_arithmetic() {
            apply_arithmetic(op, &left, &right)
        } else if op.is_comparison() {
            apply_comparison(op, &left, &right)
        } else {
            apply_concat(&left, &right)
        }
    }
}
