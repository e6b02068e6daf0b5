//! The sheet: cell storage, recalculation and persistence in one place
//!
//! # Example
//!
//! ```rust
//! use cellflow::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_data(0, 1, "10").unwrap();
//! sheet.set_data(1, 1, "=A1 * 2").unwrap();
//! assert_eq!(sheet.display_value(1, 1), "20");
//!
//! sheet.set_data(0, 1, "21").unwrap();
//! assert_eq!(sheet.display_value(1, 1), "42");
//! ```

use std::fmt;
use std::path::Path;

use cellflow_core::{CellReference, CellStorage, Value};
use cellflow_formula::CellAccessor;
use cellflow_json::{SheetReader, SheetRecord, SheetWriteOptions, SheetWriter};
use tracing::{debug, info};

use crate::cell::Cell;
use crate::error::Result;
use crate::listener::ChangeListener;
use crate::options::SheetOptions;
use crate::watcher::Watcher;

/// A single grid of cells kept consistent on every edit
pub struct Sheet {
    options: SheetOptions,
    cells: CellStorage<Cell>,
    watcher: Watcher,
    listener: Option<Box<dyn ChangeListener>>,
    rows: u32,
    columns: u32,
}

impl Sheet {
    /// Create an empty sheet with default options
    pub fn new() -> Self {
        Self::with_options(SheetOptions::default())
    }

    pub fn with_options(options: SheetOptions) -> Self {
        Self {
            rows: options.rows,
            columns: options.columns,
            options,
            cells: CellStorage::new(),
            watcher: Watcher::new(),
            listener: None,
        }
    }

    /// Load a `.sheets` file into a new sheet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, SheetOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: SheetOptions) -> Result<Self> {
        let records = SheetReader::read_file(path)?;
        let mut sheet = Self::with_options(options);
        sheet.import(records);
        Ok(sheet)
    }

    /// Save every non-empty cell to a `.sheets` file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        SheetWriter::write_file(&self.export_all(), path, &SheetWriteOptions::default())?;
        Ok(())
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Register the observer notified about changed cells
    pub fn set_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listener = Some(listener);
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn ChangeListener>> {
        self.listener.take()
    }

    /// Set the text of the cell at `row` (0-based), `column` (1-based)
    ///
    /// Only invalid coordinates are reported; formula failures turn the cell
    /// into the error marker.
    pub fn set_data(&mut self, row: u32, column: u32, text: &str) -> Result<()> {
        let reference = CellReference::new(row, column)?;
        self.set(reference, text);
        Ok(())
    }

    /// Set the text of a cell by identifier, e.g. `"B3"`
    pub fn set_cell(&mut self, identifier: &str, text: &str) -> Result<()> {
        let reference = CellReference::parse(identifier)?;
        self.set(reference, text);
        Ok(())
    }

    /// Set the text of a cell; empty text removes it
    pub fn set(&mut self, reference: CellReference, text: &str) {
        if text.is_empty() {
            self.cells.remove(&reference);
        } else {
            let cell = Cell::new(text, &*self);
            self.cells.insert(reference, cell);
            self.rows = self.rows.max(reference.row() + 1);
            self.columns = self.columns.max(reference.column());
        }
        debug!(cell = %reference, text, "set cell");

        let changed = self.watcher.update(reference, &mut self.cells);
        self.notify(reference);
        for other in changed {
            if other != reference {
                self.notify(other);
            }
        }
    }

    /// The cell at `row`, `column`, if present
    pub fn data(&self, row: u32, column: u32) -> Option<&Cell> {
        let reference = CellReference::new(row, column).ok()?;
        self.cells.get(&reference)
    }

    pub fn cell(&self, reference: &CellReference) -> Option<&Cell> {
        self.cells.get(reference)
    }

    /// Computed value of a cell; `None` when empty or errored
    pub fn cell_value(&self, reference: &CellReference) -> Option<&Value> {
        self.cells.get(reference).and_then(Cell::value)
    }

    /// The value as shown in the grid: empty for empty cells, `ERR` on error
    pub fn display_value(&self, row: u32, column: u32) -> String {
        self.data(row, column)
            .map(Cell::display_value)
            .unwrap_or_default()
    }

    /// Pretty-printed expression tree, available in debug mode
    pub fn expression_tree(&self, reference: &CellReference) -> Option<String> {
        if !self.options.debug {
            return None;
        }
        self.cells.get(reference).and_then(Cell::expression_tree)
    }

    /// Number of rows, grown to cover every written cell
    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// Number of data columns; valid columns are `1..=column_count()`
    pub fn column_count(&self) -> u32 {
        self.columns
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over non-empty cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (CellReference, &Cell)> {
        self.cells.iter()
    }

    /// Every non-empty cell as a record, literals before formulas
    ///
    /// Within each group cells are in row order, so a sequential reload
    /// sees most of the values a formula reads before the formula itself.
    pub fn export_all(&self) -> Vec<SheetRecord> {
        let (formulas, literals): (Vec<_>, Vec<_>) = self
            .cells
            .iter()
            .map(|(reference, cell)| SheetRecord::new(reference, cell.text()))
            .partition(SheetRecord::is_formula);
        literals.into_iter().chain(formulas).collect()
    }

    /// Remove every cell and dependency
    pub fn clear_all(&mut self) {
        let removed: Vec<_> = self.cells.references().collect();
        self.cells.clear();
        self.watcher.clear();
        self.rows = self.options.rows;
        self.columns = self.options.columns;
        for reference in removed {
            self.notify(reference);
        }
    }

    /// Replay records one by one, as if typed in order
    pub fn import(&mut self, records: impl IntoIterator<Item = SheetRecord>) {
        let mut count = 0;
        for record in records {
            self.set(record.reference, &record.text);
            count += 1;
        }
        info!(cells = count, "imported cells");

        if self.options.recalculate_after_import {
            self.recalculate_all();
        }
    }

    /// Rebuild all dependencies and recompute every formula
    ///
    /// Cells on a cycle, reading one, or reading themselves end up errored.
    pub fn recalculate_all(&mut self) {
        let changed = self.watcher.recalculate_all(&mut self.cells);
        for reference in changed {
            self.notify(reference);
        }
    }

    fn notify(&mut self, reference: CellReference) {
        if let Some(listener) = self.listener.as_mut() {
            listener.cell_changed(reference);
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl CellAccessor for Sheet {
    fn value(&self, reference: &CellReference) -> Option<Value> {
        self.cell_value(reference).cloned()
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("options", &self.options)
            .field("cells", &self.cells.len())
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}
