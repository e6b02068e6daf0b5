//! Formula error types

use cellflow_core::CellReference;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing, evaluation or dependency tracking
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula parse error at a character offset of the formula text
    #[error("Parse error at position {position}: {message}")]
    Parse { message: String, position: usize },

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Referenced cell has no value (never written, or errored)
    #[error("No value in cell {0}")]
    MissingValue(CellReference),

    /// A formula reads its own cell
    #[error("Cell {0} references itself")]
    SelfReference(CellReference),

    /// Circular reference between the listed cells
    #[error("Circular reference detected: {}", format_cells(.0))]
    Cycle(Vec<CellReference>),

    /// Value operation error
    #[error(transparent)]
    Core(#[from] cellflow_core::Error),
}

impl FormulaError {
    /// Create a parse error
    pub fn parse<S: Into<String>>(message: S, position: usize) -> Self {
        FormulaError::Parse {
            message: message.into(),
            position,
        }
    }
}

fn format_cells(cells: &[CellReference]) -> String {
    cells
        .iter()
        .map(CellReference::identifier)
        .collect::<Vec<_>>()
        .join(", ")
}
