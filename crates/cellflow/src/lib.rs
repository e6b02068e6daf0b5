//! # cellflow
//!
//! A spreadsheet formula engine: cells hold literal text or `=` formulas,
//! and every edit recomputes exactly the cells that depend on it.
//!
//! ## Features
//!
//! - Operator-precedence formula parser with ranges and a fixed-arity function catalog
//! - Typed values with integer/double promotion
//! - Incremental recalculation in dependency order
//! - Cycle and self-reference detection; affected cells show `ERR`
//! - `.sheets` JSON persistence
//!
//! ## Example
//!
//! ```rust
//! use cellflow::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("A1", "1").unwrap();
//! sheet.set_cell("A2", "2").unwrap();
//! sheet.set_cell("B1", "=SUM(A1:A2) * 10").unwrap();
//! assert_eq!(sheet.cell_value(&"B1".parse().unwrap()), Some(&Value::Integer(30)));
//!
//! // A cycle turns its members into the error marker
//! sheet.set_cell("A1", "=B1").unwrap();
//! assert_eq!(sheet.display_value(0, 2), "ERR");
//!
//! // Save to file
//! // sheet.save("budget.sheets").unwrap();
//! ```

mod cell;
mod error;
mod listener;
mod options;
mod sheet;
mod watcher;

pub mod prelude;

pub use cell::{Cell, ERROR_MARKER};
pub use error::{Error, Result};
pub use listener::ChangeListener;
pub use options::SheetOptions;
pub use sheet::Sheet;
pub use watcher::Watcher;

// Re-export core types
pub use cellflow_core::{CellRange, CellReference, CellStorage, Value};

// Re-export formula types
pub use cellflow_formula::{
    evaluate, parse_formula, CellAccessor, DependencyGraph, Expression, FormulaError,
    FormulaResult, Function, NoCells, Operator,
};

// Re-export I/O types
pub use cellflow_json::{JsonError, SheetReader, SheetRecord, SheetWriteOptions, SheetWriter};
