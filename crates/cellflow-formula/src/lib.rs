//! # cellflow-formula
//!
//! Formula engine for cellflow.
//!
//! This crate provides:
//! - Tokenizing formula text
//! - Formula parsing (tokens → AST) with an operator-precedence parser
//! - Formula evaluation (AST → value) against a [`CellAccessor`]
//! - The fixed-arity built-in function catalog
//! - Dependency tracking with topological recompute order and cycle detection
//!
//! ## Example
//!
//! ```rust
//! use cellflow_core::Value;
//! use cellflow_formula::{evaluate, parse_formula, NoCells};
//!
//! let ast = parse_formula("=POW(2, 3) + 4 * 5").unwrap();
//! let result = evaluate(&ast, &NoCells).unwrap();
//! assert_eq!(result, Value::Integer(28));
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod tokenizer;

pub use ast::{Expression, Operator};
pub use dependency::{DependencyGraph, RecalcOrder};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, CellAccessor, NoCells};
pub use functions::Function;
pub use parser::parse_formula;
pub use tokenizer::{tokenize, Token, TokenKind};
