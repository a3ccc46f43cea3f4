//! Recalculation planning
//!
//! Given the cells that changed, [`plan`] works out which formula cells
//! must be re-evaluated and in what order. The dependents subgraph is
//! split into strongly connected components (Tarjan, iterative so deep
//! chains cannot overflow the stack). Components come out in topological
//! order, precedents before the cells that read them. A component with
//! more than one cell, or a single cell that reads itself, is a circular
//! reference and is reported as a whole instead of being evaluated.

use ahash::AHashMap;
use sheetcalc_core::{CellAddress, CellStore};
use tracing::trace;

/// One step of a recalculation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecalcStep {
    /// Re-evaluate this cell
    Evaluate(CellAddress),
    /// These cells read each other; mark them `#REF!`
    Circular(Vec<CellAddress>),
}

/// Plan the re-evaluation of every cell reachable from `roots` through
/// reverse dependency edges, roots included.
pub fn plan(store: &CellStore, roots: &[CellAddress]) -> Vec<RecalcStep> {
    let mut tarjan = Tarjan::new(store);
    for &root in roots {
        tarjan.visit(root);
    }

    // Tarjan emits a component only after everything reachable from it,
    // i.e. readers first
    let mut components = tarjan.components;
    components.reverse();

    let steps: Vec<RecalcStep> = components
        .into_iter()
        .map(|mut cells| {
            let single_cell = cells.len() == 1;
            let reads_itself = single_cell
                && store
                    .direct_dependents(&cells[0])
                    .any(|reader| reader == cells[0]);

            if single_cell && !reads_itself {
                RecalcStep::Evaluate(cells[0])
            } else {
                cells.sort();
                RecalcStep::Circular(cells)
            }
        })
        .collect();

    trace!(steps = ?steps, "recalculation plan");
    steps
}

/// Cells of the graph explored so far, numbered in discovery order
struct Tarjan<'s> {
    store: &'s CellStore,
    ids: AHashMap<CellAddress, usize>,
    cells: Vec<CellAddress>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<CellAddress>>,
}

/// Explicit call frame: a cell and the readers still to visit
struct Frame {
    id: usize,
    readers: Vec<CellAddress>,
    cursor: usize,
}

impl<'s> Tarjan<'s> {
    fn new(store: &'s CellStore) -> Self {
        Self {
            store,
            ids: AHashMap::new(),
            cells: Vec::new(),
            lowlink: Vec::new(),
            on_stack: Vec::new(),
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Number a newly discovered cell and push it on the component stack
    fn open(&mut self, cell: CellAddress) -> Frame {
        let id = self.cells.len();
        self.ids.insert(cell, id);
        self.cells.push(cell);
        self.lowlink.push(id);
        self.on_stack.push(true);
        self.stack.push(id);

        Frame {
            id,
            readers: self.store.direct_dependents(&cell).collect(),
            cursor: 0,
        }
    }

    fn visit(&mut self, root: CellAddress) {
        if self.ids.contains_key(&root) {
            return;
        }

        let mut frames = vec![self.open(root)];

        while let Some(frame) = frames.last_mut() {
            if let Some(&reader) = frame.readers.get(frame.cursor) {
                frame.cursor += 1;
                let id = frame.id;

                match self.ids.get(&reader) {
                    None => {
                        let next = self.open(reader);
                        frames.push(next);
                    }
                    Some(&seen) if self.on_stack[seen] => {
                        // Discovery index equals the id
                        self.lowlink[id] = self.lowlink[id].min(seen);
                    }
                    Some(_) => {}
                }
                continue;
            }

            let id = frame.id;
            frames.pop();

            if let Some(parent) = frames.last() {
                self.lowlink[parent.id] = self.lowlink[parent.id].min(self.lowlink[id]);
            }

            if self.lowlink[id] == id {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack[member] = false;
                    component.push(self.cells[member]);
                    if member == id {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }
}
