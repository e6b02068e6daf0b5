//! Formula Abstract Syntax Tree types

use std::fmt;

use cellflow_core::{CellRange, CellReference, Value};

use crate::error::FormulaResult;
use crate::functions::Function;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// Single cell reference
    CellRef(CellReference),

    /// Binary operation
    Binary {
        op: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Function call with exactly `function.arity()` arguments
    Function {
        function: Function,
        args: Vec<Expression>,
    },

    /// Range reference
    Range(CellRange),
}

impl Expression {
    /// Create a binary node
    pub fn binary(op: Operator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Every cell this expression reads, ranges expanded, in reading order
    pub fn references(&self) -> Vec<CellReference> {
        let mut references = Vec::new();
        self.collect_references(&mut references);
        references
    }

    fn collect_references(&self, out: &mut Vec<CellReference>) {
        match self {
            Expression::Literal(_) => {}
            Expression::CellRef(reference) => out.push(*reference),
            Expression::Range(range) => out.extend(range.cells()),
            Expression::Binary { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            Expression::Function { args, .. } => {
                for arg in args {
                    arg.collect_references(out);
                }
            }
        }
    }

    /// Render the tree one node per line, indented by two dots per level
    ///
    /// ```rust
    /// use cellflow_formula::parse_formula;
    ///
    /// let ast = parse_formula("=POW(A1, 2) + 1").unwrap();
    /// assert_eq!(ast.pretty_print(), "+\n..POW\n....A1\n....2\n..1\n");
    /// ```
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        self.pretty_print_into(&mut out, 0);
        out
    }

    fn pretty_print_into(&self, out: &mut String, depth: usize) {
        out.push_str(&".".repeat(depth));
        match self {
            Expression::Literal(Value::String(s)) => out.push_str(&format!("\"{}\"", s)),
            Expression::Literal(value) => out.push_str(&value.to_string()),
            Expression::CellRef(reference) => out.push_str(&reference.identifier()),
            Expression::Range(range) => out.push_str(&range.to_string()),
            Expression::Binary { op, .. } => out.push_str(op.symbol()),
            Expression::Function { function, .. } => out.push_str(function.name()),
        }
        out.push('\n');

        match self {
            Expression::Binary { left, right, .. } => {
                left.pretty_print_into(out, depth + 2);
                right.pretty_print_into(out, depth + 2);
            }
            Expression::Function { args, .. } => {
                for arg in args {
                    arg.pretty_print_into(out, depth + 2);
                }
            }
            _ => {}
        }
    }

    fn fmt_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        parent: Operator,
        right_side: bool,
    ) -> fmt::Result {
        let needs_parens = match self {
            Expression::Binary { op, .. } => {
                op.precedence() < parent.precedence()
                    || (op.precedence() == parent.precedence()
                        && right_side != parent.is_right_associative())
            }
            _ => false,
        };
        if needs_parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Infix formula text without the leading `=`
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Value::String(s)) => write!(f, "\"{}\"", s),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::CellRef(reference) => write!(f, "{}", reference),
            Expression::Range(range) => write!(f, "{}", range),
            Expression::Binary { op, left, right } => {
                left.fmt_operand(f, *op, false)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_operand(f, *op, true)
            }
            Expression::Function { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Comparison
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

impl Operator {
    /// Look up an operator by its symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "<" => Operator::LessThan,
            ">" => Operator::GreaterThan,
            "<=" => Operator::LessEqual,
            ">=" => Operator::GreaterEqual,
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "%" => Operator::Remainder,
            "^" => Operator::Power,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Remainder => "%",
            Operator::Power => "^",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Equal
            | Operator::NotEqual
            | Operator::LessThan
            | Operator::GreaterThan
            | Operator::LessEqual
            | Operator::GreaterEqual => 1,
            Operator::Add | Operator::Subtract => 2,
            Operator::Multiply | Operator::Divide | Operator::Remainder => 3,
            Operator::Power => 4,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Power)
    }

    /// Apply the operator to evaluated operands
    pub fn apply(&self, left: &Value, right: &Value) -> FormulaResult<Value> {
        let result = match self {
            Operator::Equal => Ok(Value::Boolean(left == right)),
            Operator::NotEqual => Ok(Value::Boolean(left != right)),
            Operator::LessThan => left.less(right),
            Operator::GreaterThan => left.greater(right),
            Operator::LessEqual => left.less_or_equal(right),
            Operator::GreaterEqual => left.greater_or_equal(right),
            Operator::Add => left.add(right),
            Operator::Subtract => left.sub(right),
            Operator::Multiply => left.mul(right),
            Operator::Divide => left.div(right),
            Operator::Remainder => left.rem(right),
            Operator::Power => left.pow(right),
        };
        Ok(result?)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
