//! Cell contents: raw text, parsed formula and last computed value

use std::fmt;

use cellflow_core::Value;
use cellflow_formula::{
    evaluate, parse_formula, CellAccessor, Expression, FormulaError, FormulaResult,
};

/// Text shown in place of the value of a cell whose formula failed
pub const ERROR_MARKER: &str = "ERR";

/// A non-empty cell
///
/// Text starting with `=` is a formula; anything else is a literal whose
/// value is [`Value::parse`] of the text. A cell is replaced wholesale on
/// every edit and never knows which cells read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    text: String,
    expression: Option<Expression>,
    result: FormulaResult<Value>,
}

impl Cell {
    /// Build a cell from user text, evaluating formulas against `cells`
    ///
    /// Formula text that fails to parse still makes a formula cell; it just
    /// holds the parse error instead of a value.
    pub fn new(text: impl Into<String>, cells: &dyn CellAccessor) -> Self {
        let text = text.into();
        if !text.starts_with('=') {
            let result = Ok(Value::parse(&text));
            return Self {
                text,
                expression: None,
                result,
            };
        }

        match parse_formula(&text) {
            Ok(expression) => {
                let result = evaluate(&expression, cells);
                Self {
                    text,
                    expression: Some(expression),
                    result,
                }
            }
            Err(e) => Self {
                text,
                expression: None,
                result: Err(e),
            },
        }
    }

    /// The raw text as typed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_formula(&self) -> bool {
        self.text.starts_with('=')
    }

    /// Parsed formula, if the text is a formula that parsed
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// Computed value, `None` when the cell holds the error marker
    pub fn value(&self) -> Option<&Value> {
        self.result.as_ref().ok()
    }

    /// Why the cell holds the error marker
    pub fn error(&self) -> Option<&FormulaError> {
        self.result.as_ref().err()
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    /// The value as displayed in the grid
    pub fn display_value(&self) -> String {
        match &self.result {
            Ok(value) => value.to_string(),
            Err(_) => ERROR_MARKER.to_string(),
        }
    }

    /// Indented expression tree for formula cells
    pub fn expression_tree(&self) -> Option<String> {
        self.expression.as_ref().map(Expression::pretty_print)
    }

    /// Re-run the formula; `None` for literal cells
    pub(crate) fn compute(&self, cells: &dyn CellAccessor) -> Option<FormulaResult<Value>> {
        if !self.is_formula() {
            return None;
        }
        // Unparsed formulas keep their parse error
        let expression = self.expression.as_ref()?;
        Some(evaluate(expression, cells))
    }

    pub(crate) fn set_result(&mut self, result: FormulaResult<Value>) {
        if self.is_formula() {
            self.result = result;
        }
    }

    /// Turn a formula cell into the error marker; literals are left alone
    pub(crate) fn mark_error(&mut self, error: FormulaError) {
        self.set_result(Err(error));
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}
