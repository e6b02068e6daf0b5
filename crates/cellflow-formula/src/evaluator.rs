//! Formula evaluator
//!
//! Evaluates formula ASTs to produce values.

use cellflow_core::{CellReference, Value};
use tracing::trace;

use crate::ast::Expression;
use crate::error::{FormulaError, FormulaResult};

/// Source of cell values during evaluation
///
/// Returns `None` for cells that were never written or whose value is the
/// error marker.
pub trait CellAccessor {
    fn value(&self, reference: &CellReference) -> Option<Value>;
}

/// Accessor for formulas evaluated outside of any sheet
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCells;

impl CellAccessor for NoCells {
    fn value(&self, _reference: &CellReference) -> Option<Value> {
        None
    }
}

impl<F> CellAccessor for F
where
    F: Fn(&CellReference) -> Option<Value>,
{
    fn value(&self, reference: &CellReference) -> Option<Value> {
        self(reference)
    }
}

fn cell_value(reference: &CellReference, cells: &dyn CellAccessor) -> FormulaResult<Value> {
    cells
        .value(reference)
        .ok_or(FormulaError::MissingValue(*reference))
}

/// Evaluate a formula expression
pub fn evaluate(expr: &Expression, cells: &dyn CellAccessor) -> FormulaResult<Value> {
    match expr {
        Expression::Literal(value) => Ok(value.clone()),

        Expression::CellRef(reference) => cell_value(reference, cells),

        Expression::Range(range) => range
            .cells()
            .map(|reference| cell_value(&reference, cells))
            .collect::<FormulaResult<Vec<_>>>()
            .map(Value::Iterable),

        Expression::Binary { op, left, right } => {
            let right = evaluate(right, cells)?;
            let left = evaluate(left, cells)?;
            op.apply(&left, &right)
        }

        Expression::Function { function, args } => {
            // A failed argument leaves an empty slot; the function decides
            // whether it can do without it
            let slots: Vec<Option<Value>> = args
                .iter()
                .map(|arg| match evaluate(arg, cells) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        trace!(function = function.name(), error = %e, "argument failed");
                        None
                    }
                })
                .collect();
            function.call(&slots)
        }
    }
}
