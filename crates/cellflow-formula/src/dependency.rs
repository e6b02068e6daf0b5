//! Dependency tracking for formula calculation
//!
//! An edge `X → Y` means "Y's formula reads X", so X must be computed before
//! Y. Self-loops are rejected when added; longer cycles are only found while
//! traversing.

use std::collections::{BTreeSet, VecDeque};

use ahash::{AHashMap, AHashSet};
use cellflow_core::CellReference;
use tracing::{debug, warn};

use crate::error::{FormulaError, FormulaResult};

/// Dependency graph for formula cells
///
/// Tracks which cells depend on which other cells,
/// enabling efficient recalculation.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Cell → Cells that read it (dependents)
    dependents: AHashMap<CellReference, AHashSet<CellReference>>,
    /// Cell → Cells it reads (precedents)
    precedents: AHashMap<CellReference, AHashSet<CellReference>>,
    /// Cycle members found by the last failed traversal
    failed: Vec<CellReference>,
}

/// Recompute order for a whole sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecalcOrder {
    /// Cells in an order where every cell follows the cells it reads
    pub order: Vec<CellReference>,
    /// Cells on a cycle or reading one, in row-major order
    pub blocked: Vec<CellReference>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency: `reader` reads `read`
    pub fn add_dependency(
        &mut self,
        read: CellReference,
        reader: CellReference,
    ) -> FormulaResult<()> {
        if read == reader {
            warn!(cell = %reader, "self reference");
            return Err(FormulaError::SelfReference(reader));
        }
        self.dependents.entry(read).or_default().insert(reader);
        self.precedents.entry(reader).or_default().insert(read);
        Ok(())
    }

    /// Remove every edge recording what `reader` reads
    ///
    /// Cells that read `reader` keep their edges.
    pub fn clear_dependencies(&mut self, reader: CellReference) {
        if let Some(precedents) = self.precedents.remove(&reader) {
            for precedent in precedents {
                if let Some(deps) = self.dependents.get_mut(&precedent) {
                    deps.remove(&reader);
                    if deps.is_empty() {
                        self.dependents.remove(&precedent);
                    }
                }
            }
            debug!(cell = %reader, "cleared dependencies");
        }
    }

    /// Get cells that read the given cell
    pub fn dependents(&self, cell: CellReference) -> impl Iterator<Item = CellReference> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells that the given cell reads
    pub fn precedents(&self, cell: CellReference) -> impl Iterator<Item = CellReference> + '_ {
        self.precedents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Cycle members recorded by the last failed [`update_list`](Self::update_list)
    pub fn failed_cells(&self) -> &[CellReference] {
        &self.failed
    }

    /// Forget the recorded cycle members
    pub fn clear_failed(&mut self) {
        self.failed.clear();
    }

    fn sorted_dependents(&self, cell: CellReference) -> Vec<CellReference> {
        let mut cells: Vec<_> = self.dependents(cell).collect();
        cells.sort_unstable();
        cells
    }

    /// Cells to recompute after `start` changes, `start` first
    ///
    /// The result holds `start` and every cell reading it directly or
    /// transitively, each after all the cells it reads. Fails with
    /// [`FormulaError::Cycle`] when a cycle is reachable from `start`; the
    /// cycle members are then available from [`failed_cells`](Self::failed_cells).
    pub fn update_list(&mut self, start: CellReference) -> FormulaResult<Vec<CellReference>> {
        self.failed.clear();

        let mut visited = AHashSet::new();
        let mut visiting = AHashSet::new();
        let mut postorder = Vec::new();
        // Explicit DFS path: (cell, its dependents, next dependent to visit)
        let mut path: Vec<(CellReference, Vec<CellReference>, usize)> = Vec::new();

        visiting.insert(start);
        path.push((start, self.sorted_dependents(start), 0));

        while let Some((cell, children, next)) = path.last_mut() {
            let Some(&child) = children.get(*next) else {
                let cell = *cell;
                path.pop();
                visiting.remove(&cell);
                visited.insert(cell);
                postorder.push(cell);
                continue;
            };
            *next += 1;

            if visiting.contains(&child) {
                // Unwind the path back to the repeated cell
                let mut failed = Vec::new();
                while let Some((member, _, _)) = path.pop() {
                    failed.push(member);
                    if member == child {
                        break;
                    }
                }
                failed.reverse();
                warn!(
                    cells = ?failed.iter().map(CellReference::identifier).collect::<Vec<_>>(),
                    "circular reference"
                );
                self.failed = failed.clone();
                return Err(FormulaError::Cycle(failed));
            }
            if visited.contains(&child) {
                continue;
            }

            visiting.insert(child);
            path.push((child, self.sorted_dependents(child), 0));
        }

        postorder.reverse();
        Ok(postorder)
    }

    /// Order for recomputing every cell in the graph plus `cells`
    ///
    /// Cells that sit on a cycle, or read a cell that does, cannot be ordered
    /// and are returned as blocked.
    pub fn recalc_order(&self, cells: impl IntoIterator<Item = CellReference>) -> RecalcOrder {
        let mut nodes: BTreeSet<CellReference> = cells.into_iter().collect();
        nodes.extend(self.dependents.keys().copied());
        nodes.extend(self.precedents.keys().copied());

        let mut in_degree: AHashMap<CellReference, usize> = nodes
            .iter()
            .map(|&cell| (cell, self.precedents(cell).count()))
            .collect();

        let mut ready: VecDeque<CellReference> = nodes
            .iter()
            .copied()
            .filter(|cell| in_degree.get(cell) == Some(&0))
            .collect();

        let mut order = Vec::with_capacity(nodes.len());
        while let Some(cell) = ready.pop_front() {
            order.push(cell);
            for dependent in self.sorted_dependents(cell) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(dependent);
                    }
                }
            }
        }

        let blocked: Vec<_> = nodes
            .into_iter()
            .filter(|cell| in_degree.get(cell).is_some_and(|&d| d > 0))
            .collect();
        if !blocked.is_empty() {
            warn!(count = blocked.len(), "cells blocked by circular references");
        }

        RecalcOrder { order, blocked }
    }

    /// Clear the entire graph
    pub fn clear(&mut self) {
        self.dependents.clear();
        self.precedents.clear();
        self.failed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn cell(identifier: &str) -> CellReference {
        CellReference::parse(identifier).unwrap()
    }

    fn position(list: &[CellReference], identifier: &str) -> usize {
        list.iter()
            .position(|c| *c == cell(identifier))
            .unwrap_or_else(|| panic!("{identifier} missing from {list:?}"))
    }

    #[test]
    fn test_add_dependency() {
        let mut graph = DependencyGraph::new();

        graph.add_dependency(cell("A1"), cell("B1")).unwrap();

        assert!(graph.dependents(cell("A1")).any(|c| c == cell("B1")));
        assert!(graph.precedents(cell("B1")).any(|c| c == cell("A1")));
    }

    #[test]
    fn test_self_reference() {
        let mut graph = DependencyGraph::new();
        assert_eq!(
            graph.add_dependency(cell("A1"), cell("A1")),
            Err(FormulaError::SelfReference(cell("A1")))
        );
        assert_eq!(graph.dependents(cell("A1")).count(), 0);
    }

    #[test]
    fn test_square_update_list() {
        let mut graph = DependencyGraph::new();

        graph.add_dependency(cell("A1"), cell("B1")).unwrap();
        graph.add_dependency(cell("A1"), cell("C1")).unwrap();
        graph.add_dependency(cell("B1"), cell("A2")).unwrap();
        graph.add_dependency(cell("C1"), cell("A2")).unwrap();

        let list = graph.update_list(cell("A1")).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0], cell("A1"));
        assert!(position(&list, "B1") < position(&list, "A2"));
        assert!(position(&list, "C1") < position(&list, "A2"));

        let list = graph.update_list(cell("B1")).unwrap();
        assert_eq!(list, vec![cell("B1"), cell("A2")]);
    }

    #[test]
    fn test_unconnected_cell() {
        let mut graph = DependencyGraph::new();
        assert_eq!(graph.update_list(cell("Z9")).unwrap(), vec![cell("Z9")]);
    }

    #[test]
    fn test_circular_reference() {
        let mut graph = DependencyGraph::new();

        // A1 -> B1 -> C1 -> A1 (circular)
        graph.add_dependency(cell("A1"), cell("B1")).unwrap();
        graph.add_dependency(cell("B1"), cell("C1")).unwrap();
        graph.add_dependency(cell("C1"), cell("A1")).unwrap();

        for start in ["A1", "B1", "C1"] {
            let result = graph.update_list(cell(start));
            assert!(matches!(result, Err(FormulaError::Cycle(_))));

            let mut failed = graph.failed_cells().to_vec();
            failed.sort();
            assert_eq!(failed, vec![cell("A1"), cell("B1"), cell("C1")]);
        }

        graph.clear_failed();
        assert!(graph.failed_cells().is_empty());
    }

    #[test]
    fn test_cycle_excludes_lead_in() {
        let mut graph = DependencyGraph::new();

        // A1 -> A2 <-> A4
        graph.add_dependency(cell("A1"), cell("A2")).unwrap();
        graph.add_dependency(cell("A2"), cell("A4")).unwrap();
        graph.add_dependency(cell("A4"), cell("A2")).unwrap();

        assert!(graph.update_list(cell("A1")).is_err());
        assert_eq!(graph.failed_cells(), &[cell("A2"), cell("A4")]);
    }

    #[test]
    fn test_clear_dependencies() {
        let mut graph = DependencyGraph::new();

        graph.add_dependency(cell("A1"), cell("B1")).unwrap();
        graph.add_dependency(cell("B1"), cell("C1")).unwrap();
        graph.add_dependency(cell("C1"), cell("A1")).unwrap();

        // Breaking C1's reads removes the cycle but keeps C1's readers
        graph.clear_dependencies(cell("C1"));
        assert_eq!(graph.precedents(cell("C1")).count(), 0);
        assert_eq!(
            graph.update_list(cell("C1")).unwrap(),
            vec![cell("C1"), cell("A1"), cell("B1")]
        );
    }

    #[test]
    fn test_recalc_order() {
        let mut graph = DependencyGraph::new();

        graph.add_dependency(cell("A1"), cell("B1")).unwrap();
        graph.add_dependency(cell("B1"), cell("C1")).unwrap();
        graph.add_dependency(cell("C1"), cell("B1")).unwrap();
        graph.add_dependency(cell("C1"), cell("D1")).unwrap();
        graph.add_dependency(cell("A1"), cell("A2")).unwrap();

        let plan = graph.recalc_order([cell("E5")]);
        assert_eq!(plan.order, vec![cell("A1"), cell("E5"), cell("A2")]);
        assert_eq!(plan.blocked, vec![cell("B1"), cell("C1"), cell("D1")]);
    }

    #[test]
    fn test_clear() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(cell("A1"), cell("B1")).unwrap();
        graph.clear();
        assert_eq!(graph.dependents(cell("A1")).count(), 0);
        assert_eq!(graph.recalc_order([]), RecalcOrder::default());
    }

    proptest! {
        #[test]
        fn update_list_respects_edges(edges in prop::collection::vec((0u32..12, 0u32..12), 0..40)) {
            let mut graph = DependencyGraph::new();
            let at = |i: u32| CellReference::new(i, 1).unwrap();

            // Edges only point down the column, so the graph is acyclic
            let edges: Vec<_> = edges.into_iter().filter(|(a, b)| a < b).collect();
            for &(a, b) in &edges {
                graph.add_dependency(at(a), at(b)).unwrap();
            }

            let list = graph.update_list(at(0)).unwrap();
            prop_assert_eq!(list[0], at(0));

            let unique: AHashSet<_> = list.iter().collect();
            prop_assert_eq!(unique.len(), list.len());

            for &(a, b) in &edges {
                let pa = list.iter().position(|c| *c == at(a));
                let pb = list.iter().position(|c| *c == at(b));
                if let Some(pa) = pa {
                    // Everything reading a listed cell is listed after it
                    prop_assert!(pb.is_some_and(|pb| pa < pb));
                }
            }
        }
    }
}
