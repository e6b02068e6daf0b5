//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Value`] - A runtime value produced by literals and formulas
//! - [`CellReference`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")
//! - [`CellStorage`] - Sparse row-major storage keyed by reference

mod address;
mod storage;
mod value;

pub use address::{CellRange, CellReference};
pub use storage::CellStorage;
pub use value::Value;
