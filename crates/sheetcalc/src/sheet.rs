//! The spreadsheet engine surface

use crate::recalc::{self, RecalcStep};
use sheetcalc_core::{CellAddress, CellPatch, CellStore, ErrorKind, Result, Value};
use sheetcalc_formula::{CellValueProvider, EvaluationOptions, Evaluator, FunctionRegistry};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// The observable state of a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellOutcome {
    /// Last computed value; `Null` while `error` is set
    pub value: Value,
    /// Last raised error
    pub error: Option<ErrorKind>,
}

impl CellOutcome {
    /// Text shown for the cell. The error token wins over the value.
    pub fn display(&self) -> String {
        match self.error {
            Some(kind) => kind.token().to_string(),
            None => self.value.to_string(),
        }
    }

    /// Check if the cell holds an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// What a recalculation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecalcReport {
    /// Number of formula evaluations performed
    pub evaluated: usize,
    /// Number of touched cells left holding an error
    pub errors: usize,
    /// Cells marked `#REF!` because they sit on a circular reference
    pub circular: Vec<CellAddress>,
}

/// A serializable view of one cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSnapshot {
    /// A1-style id
    pub id: String,
    /// Raw input text
    pub formula: Option<String>,
    /// Last computed value
    pub value: Value,
    /// Last raised error
    pub error: Option<ErrorKind>,
    /// Ids the last evaluation read
    pub dependencies: Vec<String>,
}

/// One sheet: its cells, the functions formulas may call, and an optional
/// source for values the sheet does not hold itself.
///
/// Every mutating call evaluates the changed cell and then refreshes every
/// cell that depends on it before returning.
///
/// ```rust
/// use sheetcalc::{Sheet, Value};
///
/// let mut sheet = Sheet::new();
/// sheet.set_cell("A1", "5").unwrap();
/// sheet.set_cell("B1", "=A1+1").unwrap();
/// sheet.set_cell("A1", "7").unwrap();
///
/// assert_eq!(sheet.get_cell("B1").unwrap().value, Value::Number(8.0));
/// ```
pub struct Sheet {
    store: CellStore,
    registry: Arc<FunctionRegistry>,
    provider: Option<Arc<dyn CellValueProvider + Send + Sync>>,
    options: EvaluationOptions,
}

impl Sheet {
    /// Create an empty sheet with the builtin functions and default options
    pub fn new() -> Self {
        Self {
            store: CellStore::new(),
            registry: FunctionRegistry::shared(),
            provider: None,
            options: EvaluationOptions::default(),
        }
    }

    /// Use different evaluation settings
    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom function registry
    pub fn with_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Read cells the sheet holds no record for from `provider`
    pub fn with_provider<P>(mut self, provider: P) -> Self
    where
        P: CellValueProvider + Send + Sync + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Evaluation settings in effect
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Set a cell's input and recalculate everything that depends on it.
    ///
    /// Input starting with `=` is a formula. Anything else is a literal:
    /// numeric text becomes a number, empty input is null.
    pub fn set_cell(&mut self, id: &str, input: &str) -> Result<RecalcReport> {
        let address = CellAddress::parse(id)?;
        let mut report = RecalcReport::default();

        if input.trim_start().starts_with('=') {
            self.store.upsert(
                address,
                CellPatch::new().formula(input).clear_dependencies(),
            );
            self.evaluate_cell(address);
            report.evaluated += 1;
        } else {
            self.store.upsert(
                address,
                CellPatch::new()
                    .clear_dependencies()
                    .formula(input)
                    .outcome(Value::from_input(input), None),
            );
        }

        Ok(self.recalculate_from(address, report))
    }

    /// The value and error of a cell; unknown cells are null without error
    pub fn get_cell(&self, id: &str) -> Result<CellOutcome> {
        let address = CellAddress::parse(id)?;
        Ok(self
            .store
            .get(&address)
            .map(|record| CellOutcome {
                value: record.value.clone(),
                error: record.error,
            })
            .unwrap_or_default())
    }

    /// The raw input of a cell
    pub fn formula(&self, id: &str) -> Result<Option<&str>> {
        let address = CellAddress::parse(id)?;
        Ok(self
            .store
            .get(&address)
            .and_then(|record| record.formula.as_deref()))
    }

    /// Remove a cell. Cells that read it report `#REF!` until it is set
    /// again.
    pub fn remove_cell(&mut self, id: &str) -> Result<RecalcReport> {
        let address = CellAddress::parse(id)?;
        if self.store.remove(&address).is_none() {
            return Ok(RecalcReport::default());
        }
        debug!(cell = %address, "removed");

        Ok(self.recalculate_from(address, RecalcReport::default()))
    }

    /// Evaluate every formula cell from scratch in dependency order
    pub fn recalculate_all(&mut self) -> RecalcReport {
        let mut roots: Vec<CellAddress> = self
            .store
            .iter()
            .filter(|record| record.is_formula())
            .map(|record| record.address)
            .collect();
        roots.sort();

        let steps = recalc::plan(&self.store, &roots);
        self.run(steps, None, RecalcReport::default())
    }

    /// Every cell, in row-major order
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        let mut records: Vec<_> = self.store.iter().collect();
        records.sort_by_key(|record| record.address);

        records
            .into_iter()
            .map(|record| CellSnapshot {
                id: record.id.clone(),
                formula: record.formula.clone(),
                value: record.value.clone(),
                error: record.error,
                dependencies: record.dependencies.iter().map(|d| d.to_string()).collect(),
            })
            .collect()
    }

    /// The underlying cell store, for dependency inspection
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the sheet has no cells
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Refresh everything downstream of `changed`, which has already been
    /// brought up to date by the caller
    fn recalculate_from(&mut self, changed: CellAddress, report: RecalcReport) -> RecalcReport {
        let steps = recalc::plan(&self.store, &[changed]);
        self.run(steps, Some(changed), report)
    }

    fn run(
        &mut self,
        steps: Vec<RecalcStep>,
        skip: Option<CellAddress>,
        mut report: RecalcReport,
    ) -> RecalcReport {
        let mut touched: BTreeSet<CellAddress> = skip.into_iter().collect();

        for step in steps {
            match step {
                RecalcStep::Evaluate(cell) if Some(cell) == skip => {}
                RecalcStep::Evaluate(cell) => {
                    self.evaluate_cell(cell);
                    report.evaluated += 1;
                    touched.insert(cell);
                }
                RecalcStep::Circular(cells) => {
                    let ids: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                    warn!(cells = ?ids, "circular reference");

                    for &cell in &cells {
                        self.store
                            .upsert(cell, CellPatch::new().outcome(Value::Null, Some(ErrorKind::Ref)));
                        touched.insert(cell);
                    }
                    report.circular.extend(cells);
                }
            }
        }

        self.store.prune_tombstones();

        report.errors = touched
            .iter()
            .filter(|cell| self.store.get(cell).map_or(false, |r| r.error.is_some()))
            .count();
        report
    }

    /// Re-run a cell's formula with a fresh dependency set. Literal cells
    /// are left alone.
    fn evaluate_cell(&mut self, address: CellAddress) {
        let formula = match self.store.get(&address) {
            Some(record) if record.is_formula() => record.formula.clone().unwrap_or_default(),
            _ => return,
        };

        self.store
            .upsert(address, CellPatch::new().clear_dependencies());

        let result = {
            let mut evaluator = Evaluator::new(address, &mut self.store, &self.registry)
                .with_options(self.options);
            if let Some(provider) = &self.provider {
                evaluator = evaluator.with_provider(provider.as_ref());
            }
            evaluator.evaluate(&formula)
        };

        let patch = match result {
            Ok(value) => {
                debug!(cell = %address, value = %value, "evaluated");
                CellPatch::new().outcome(value, None)
            }
            Err(err) => {
                let kind = err.kind();
                debug!(cell = %address, error = %kind, reason = %err, "evaluation failed");
                CellPatch::new().outcome(Value::Null, Some(kind))
            }
        };
        self.store.upsert(address, patch);
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("cells", &self.store.len())
            .field("functions", &self.registry.len())
            .field("provider", &self.provider.is_some())
            .field("options", &self.options)
            .finish()
    }
}
