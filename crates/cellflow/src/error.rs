//! Error types for the sheet facade

use thiserror::Error;

/// Errors surfaced by [`Sheet`](crate::Sheet) operations
///
/// Formula failures inside a cell never show up here; they turn the cell
/// into the error marker instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cellflow_core::Error),

    #[error(transparent)]
    Formula(#[from] cellflow_formula::FormulaError),

    #[error(transparent)]
    Json(#[from] cellflow_json::JsonError),
}

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, Error>;
