//! Recalculation after cell edits
//!
//! The [`Watcher`] owns the dependency graph of a sheet. After every edit it
//! rebuilds the edited cell's edges, recomputes the cell and everything that
//! reads it in dependency order, and turns cells caught in a self reference
//! or a cycle into the error marker.

use std::collections::BTreeSet;

use cellflow_core::{CellReference, CellStorage};
use cellflow_formula::{DependencyGraph, FormulaError, RecalcOrder};
use tracing::debug;

use crate::cell::Cell;

/// Keeps formula cells consistent with the cells they read
#[derive(Debug, Default)]
pub struct Watcher {
    graph: DependencyGraph,
}

impl Watcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dependency graph as of the last update
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// React to `reference` having been replaced or removed in `cells`
    ///
    /// Returns every cell that was recomputed or marked errored.
    pub fn update(
        &mut self,
        reference: CellReference,
        cells: &mut CellStorage<Cell>,
    ) -> Vec<CellReference> {
        self.graph.clear_dependencies(reference);
        self.graph.clear_failed();

        let reads = cells
            .get(&reference)
            .and_then(Cell::expression)
            .map(|expression| expression.references())
            .unwrap_or_default();
        for read in reads {
            if let Err(e) = self.graph.add_dependency(read, reference) {
                return self.mark_self_reference(reference, e, cells);
            }
        }

        match self.graph.update_list(reference) {
            Ok(list) => {
                for &cell in &list {
                    recompute(cell, cells);
                }
                list
            }
            Err(e) => self.mark_failed(e, cells),
        }
    }

    /// Forget what `reference` reads without recomputing anything
    pub fn clear_dependencies(&mut self, reference: CellReference) {
        self.graph.clear_dependencies(reference);
    }

    /// Forget every dependency
    pub fn clear(&mut self) {
        self.graph.clear();
    }

    /// Rebuild the graph from every stored formula and recompute all of them
    ///
    /// Returns every cell that was recomputed or marked errored.
    pub fn recalculate_all(&mut self, cells: &mut CellStorage<Cell>) -> Vec<CellReference> {
        self.graph.clear();

        let mut self_referencing = BTreeSet::new();
        for (reference, cell) in cells.iter() {
            let Some(expression) = cell.expression() else {
                continue;
            };
            for read in expression.references() {
                if self.graph.add_dependency(read, reference).is_err() {
                    self_referencing.insert(reference);
                    break;
                }
            }
        }

        let RecalcOrder { order, blocked } = self.graph.recalc_order(cells.references());
        for &reference in &order {
            if self_referencing.contains(&reference) {
                mark_error(reference, FormulaError::SelfReference(reference), cells);
            } else {
                recompute(reference, cells);
            }
        }
        for &reference in &blocked {
            mark_error(reference, FormulaError::Cycle(blocked.clone()), cells);
        }

        debug!(
            recomputed = order.len(),
            blocked = blocked.len(),
            "recalculated sheet"
        );
        order.into_iter().chain(blocked).collect()
    }

    /// `reference` reads itself: it and everything downstream of it fail
    fn mark_self_reference(
        &mut self,
        reference: CellReference,
        error: FormulaError,
        cells: &mut CellStorage<Cell>,
    ) -> Vec<CellReference> {
        mark_error(reference, error.clone(), cells);
        match self.graph.update_list(reference) {
            Ok(list) => {
                for &cell in &list {
                    mark_error(cell, error.clone(), cells);
                }
                list
            }
            Err(cycle) => {
                let mut marked = vec![reference];
                marked.extend(self.mark_failed(cycle, cells));
                marked
            }
        }
    }

    /// Mark the members of the cycle the last traversal ran into
    fn mark_failed(
        &mut self,
        error: FormulaError,
        cells: &mut CellStorage<Cell>,
    ) -> Vec<CellReference> {
        let failed = self.graph.failed_cells().to_vec();
        for &cell in &failed {
            mark_error(cell, error.clone(), cells);
        }
        failed
    }
}

fn recompute(reference: CellReference, cells: &mut CellStorage<Cell>) {
    let result = {
        let accessor = |r: &CellReference| cells.get(r).and_then(Cell::value).cloned();
        match cells.get(&reference).and_then(|cell| cell.compute(&accessor)) {
            Some(result) => result,
            None => return,
        }
    };
    debug!(cell = %reference, ok = result.is_ok(), "recomputed");
    if let Some(cell) = cells.get_mut(&reference) {
        cell.set_result(result);
    }
}

fn mark_error(reference: CellReference, error: FormulaError, cells: &mut CellStorage<Cell>) {
    if let Some(cell) = cells.get_mut(&reference) {
        cell.mark_error(error);
    }
}
