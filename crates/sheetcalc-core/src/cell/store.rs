//! Cell records and dependency bookkeeping

use super::address::CellAddress;
use super::error::ErrorKind;
use super::value::Value;
use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeSet, VecDeque};

/// A cell and the outcome of its last evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    /// A1-style id (always uppercase, without `$`)
    pub id: String,
    /// Coordinates, kept consistent with `id`
    pub address: CellAddress,
    /// Raw input text, absent for cells seeded with a bare value
    pub formula: Option<String>,
    /// Last computed value
    pub value: Value,
    /// Last raised error; takes display precedence over `value`
    pub error: Option<ErrorKind>,
    /// Cells read by the last evaluation
    pub dependencies: BTreeSet<CellAddress>,
}

impl CellRecord {
    /// Create an empty record for an address
    pub fn new(address: CellAddress) -> Self {
        Self {
            id: address.to_string(),
            address,
            formula: None,
            value: Value::Null,
            error: None,
            dependencies: BTreeSet::new(),
        }
    }

    /// Check if the record holds a formula (input starting with `=`)
    pub fn is_formula(&self) -> bool {
        self.formula
            .as_deref()
            .map_or(false, |f| f.trim_start().starts_with('='))
    }
}

/// A set of changes applied to one record by [`CellStore::upsert`]
///
/// Scalar fields overwrite, dependencies are added to the existing set.
/// Call [`CellPatch::clear_dependencies`] to drop the old set first.
#[derive(Debug, Clone, Default)]
pub struct CellPatch {
    formula: Option<Option<String>>,
    value: Option<Value>,
    error: Option<Option<ErrorKind>>,
    clear_dependencies: bool,
    dependencies: Vec<CellAddress>,
}

impl CellPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw input text
    pub fn formula<S: Into<String>>(mut self, text: S) -> Self {
        self.formula = Some(Some(text.into()));
        self
    }

    /// Turn the record into a plain data cell holding `value`
    pub fn literal(mut self, value: Value) -> Self {
        self.formula = Some(None);
        self.outcome(value, None)
    }

    /// Set the evaluation outcome
    pub fn outcome(mut self, value: Value, error: Option<ErrorKind>) -> Self {
        self.value = Some(value);
        self.error = Some(error);
        self
    }

    /// Drop all existing dependencies before adding new ones
    pub fn clear_dependencies(mut self) -> Self {
        self.clear_dependencies = true;
        self
    }

    /// Add dependencies
    pub fn depend_on<I>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = CellAddress>,
    {
        self.dependencies.extend(deps);
        self
    }
}

/// Storage for cell records plus a reverse dependency index
///
/// An edge `A -> B` means "A reads B" and lives in `A.dependencies`. The
/// reverse index maps `B` to every reader, so dependents can be found
/// without scanning all records.
#[derive(Debug, Default)]
pub struct CellStore {
    cells: AHashMap<CellAddress, CellRecord>,
    readers: AHashMap<CellAddress, BTreeSet<CellAddress>>,
    removed: AHashSet<CellAddress>,
}

impl CellStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a record
    pub fn get(&self, address: &CellAddress) -> Option<&CellRecord> {
        self.cells.get(address)
    }

    /// Check if a record exists
    pub fn contains(&self, address: &CellAddress) -> bool {
        self.cells.contains_key(address)
    }

    /// Check if the cell was removed and not set again since
    pub fn is_removed(&self, address: &CellAddress) -> bool {
        self.removed.contains(address)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all records (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &CellRecord> {
        self.cells.values()
    }

    /// Create or update a record. This is the only way records change.
    pub fn upsert(&mut self, address: CellAddress, patch: CellPatch) -> &CellRecord {
        self.removed.remove(&address);

        let record = self
            .cells
            .entry(address)
            .or_insert_with(|| CellRecord::new(address));

        if patch.clear_dependencies {
            for dep in std::mem::take(&mut record.dependencies) {
                if let Some(set) = self.readers.get_mut(&dep) {
                    set.remove(&address);
                    if set.is_empty() {
                        self.readers.remove(&dep);
                    }
                }
            }
        }

        for dep in patch.dependencies {
            if record.dependencies.insert(dep) {
                tracing::trace!(cell = %address, reads = %dep, "dependency edge");
                self.readers.entry(dep).or_default().insert(address);
            }
        }

        if let Some(formula) = patch.formula {
            record.formula = formula;
        }
        if let Some(value) = patch.value {
            record.value = value;
        }
        if let Some(error) = patch.error {
            record.error = error;
        }

        record
    }

    /// Remove a record.
    ///
    /// Its own outgoing edges are dropped; edges from cells that read it
    /// stay, and a tombstone marks the address until it is set again or
    /// [`CellStore::prune_tombstones`] finds nothing reading it.
    pub fn remove(&mut self, address: &CellAddress) -> Option<CellRecord> {
        let record = self.cells.remove(address)?;

        for dep in &record.dependencies {
            if let Some(set) = self.readers.get_mut(dep) {
                set.remove(address);
                if set.is_empty() {
                    self.readers.remove(dep);
                }
            }
        }

        self.removed.insert(*address);
        Some(record)
    }

    /// Forget removals that no cell reads any more, so a formula written
    /// later sees the address as never set.
    ///
    /// Only call this between evaluations: a reader being re-evaluated has
    /// its edges cleared before they are recorded again.
    pub fn prune_tombstones(&mut self) {
        let readers = &self.readers;
        self.removed.retain(|address| readers.contains_key(address));
    }

    /// Cells whose last evaluation read `address` directly
    pub fn direct_dependents(&self, address: &CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.readers.get(address).into_iter().flatten().copied()
    }

    /// Cells `address` read in its last evaluation
    pub fn precedents_of(&self, address: &CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.cells
            .get(address)
            .into_iter()
            .flat_map(|record| record.dependencies.iter().copied())
    }

    /// Transitive dependents of `address` in breadth-first discovery order.
    ///
    /// `address` itself appears in the result only when it reads itself
    /// through some chain, i.e. when it sits on a cycle.
    pub fn dependents_of(&self, address: &CellAddress) -> Vec<CellAddress> {
        let mut seen = AHashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<CellAddress> = self.direct_dependents(address).collect();

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            order.push(next);
            queue.extend(self.direct_dependents(&next).filter(|d| !seen.contains(d)));
        }

        order
    }
}
