//! Cell storage implementation
//!
//! Sparse storage for grid cells. Only occupied positions are stored, using a
//! row-based BTreeMap structure so iteration is always row-major.

use std::collections::BTreeMap;

use super::CellReference;

/// Sparse storage for cell entries of type `T`
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u32, T>>,
}

impl<T> CellStorage<T> {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Get a cell entry
    pub fn get(&self, reference: &CellReference) -> Option<&T> {
        self.rows
            .get(&reference.row())
            .and_then(|r| r.get(&reference.column()))
    }

    /// Get a mutable cell entry
    pub fn get_mut(&mut self, reference: &CellReference) -> Option<&mut T> {
        self.rows
            .get_mut(&reference.row())
            .and_then(|r| r.get_mut(&reference.column()))
    }

    /// Check whether a position is occupied
    pub fn contains(&self, reference: &CellReference) -> bool {
        self.get(reference).is_some()
    }

    /// Store an entry, returning the one it replaced
    pub fn insert(&mut self, reference: CellReference, entry: T) -> Option<T> {
        self.rows
            .entry(reference.row())
            .or_default()
            .insert(reference.column(), entry)
    }

    /// Remove an entry
    pub fn remove(&mut self, reference: &CellReference) -> Option<T> {
        let row = reference.row();
        let result = self
            .rows
            .get_mut(&row)
            .and_then(|r| r.remove(&reference.column()));

        // Clean up empty rows
        if self.rows.get(&row).is_some_and(|r| r.is_empty()) {
            self.rows.remove(&row);
        }

        result
    }

    /// Clear all cells
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Get the number of stored cells
    pub fn len(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of used cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u32::MAX;
        let mut max_col = 0u32;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (CellReference, &T)> {
        self.rows.iter().flat_map(|(&row, cols)| {
            cols.iter().filter_map(move |(&col, entry)| {
                CellReference::new(row, col).ok().map(|r| (r, entry))
            })
        })
    }

    /// Iterate over the occupied positions in row order
    pub fn references(&self) -> impl Iterator<Item = CellReference> + '_ {
        self.iter().map(|(reference, _)| reference)
    }
}

impl<T> Default for CellStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(identifier: &str) -> CellReference {
        CellReference::parse(identifier).unwrap()
    }

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::new();

        // Set and get
        storage.insert(cell("A1"), 42);
        assert_eq!(storage.get(&cell("A1")), Some(&42));

        // Get non-existent
        assert!(storage.get(&cell("B2")).is_none());

        // Replace
        assert_eq!(storage.insert(cell("A1"), 7), Some(42));
        *storage.get_mut(&cell("A1")).unwrap() += 1;
        assert_eq!(storage.get(&cell("A1")), Some(&8));
    }

    #[test]
    fn test_remove_cleans_up() {
        let mut storage = CellStorage::new();

        storage.insert(cell("C3"), "x");
        assert_eq!(storage.len(), 1);

        assert_eq!(storage.remove(&cell("C3")), Some("x"));
        assert_eq!(storage.len(), 0);
        assert!(storage.is_empty());
        assert!(storage.remove(&cell("C3")).is_none());
    }

    #[test]
    fn test_used_bounds() {
        let mut storage = CellStorage::new();

        assert!(storage.used_bounds().is_none());

        storage.insert(CellReference::new(5, 3).unwrap(), 1);
        storage.insert(CellReference::new(10, 7).unwrap(), 2);
        storage.insert(CellReference::new(2, 1).unwrap(), 3);

        assert_eq!(storage.used_bounds(), Some((2, 1, 10, 7)));
    }

    #[test]
    fn test_iteration() {
        let mut storage = CellStorage::new();

        storage.insert(cell("A2"), 3);
        storage.insert(cell("B1"), 2);
        storage.insert(cell("A1"), 1);

        let cells: Vec<_> = storage
            .iter()
            .map(|(r, v)| (r.identifier(), *v))
            .collect();
        assert_eq!(
            cells,
            vec![("A1".to_string(), 1), ("B1".to_string(), 2), ("A2".to_string(), 3)]
        );

        storage.clear();
        assert_eq!(storage.references().count(), 0);
    }
}
