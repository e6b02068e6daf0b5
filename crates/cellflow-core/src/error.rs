//! Error types for cellflow-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellflow-core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid cell address or coordinates
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Invalid cell range (empty or reversed)
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Operator not supported for the operand kinds
    #[error("Operation {operation} is not supported with {left} and {right} types")]
    TypeCast {
        operation: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Value cannot be represented as the requested kind
    #[error("Cannot cast {from} to {to}")]
    Cast {
        from: &'static str,
        to: &'static str,
    },

    /// Division (or remainder) with a zero divisor
    #[error("Division by zero")]
    DivisionByZero,
}
