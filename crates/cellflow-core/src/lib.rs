//! # cellflow-core
//!
//! Core data structures for the cellflow formula engine.
//!
//! This crate provides the fundamental types used throughout cellflow:
//! - [`Value`] - Runtime values (integers, doubles, booleans, strings, range lists)
//! - [`CellReference`] and [`CellRange`] - Cell addressing and ranges
//! - [`CellStorage`] - Sparse cell storage
//!
//! ## Example
//!
//! ```rust
//! use cellflow_core::{CellReference, Value};
//!
//! let reference: CellReference = "B3".parse().unwrap();
//! assert_eq!((reference.row(), reference.column()), (2, 2));
//!
//! let sum = Value::parse("2.5").add(&Value::parse("1.5")).unwrap();
//! assert_eq!(sum, Value::Integer(4));
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellRange, CellReference, CellStorage, Value};
pub use error::{Error, Result};
