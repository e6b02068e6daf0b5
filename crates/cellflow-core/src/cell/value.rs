//! Runtime value types

use std::fmt;

use crate::error::{Error, Result};

/// A value produced by a literal, a cell or a formula
///
/// Numeric results are kept normalized: a finite `Double` with no fractional
/// part that fits in an `i64` is always stored as `Integer`.
#[derive(Debug, Clone)]
pub enum Value {
    /// Whole number
    Integer(i64),

    /// Floating point number
    Double(f64),

    /// Boolean value (true/false)
    Boolean(bool),

    /// String value
    String(String),

    /// Values of an expanded range, in row-major order
    Iterable(Vec<Value>),
}

impl Value {
    /// Parse literal text
    ///
    /// Tried in order: `true`/`false` (trimmed, case-insensitive), integer,
    /// double, and finally the text itself as a string.
    ///
    /// # Examples
    /// ```
    /// use cellflow_core::Value;
    ///
    /// assert!(matches!(Value::parse(" TRUE "), Value::Boolean(true)));
    /// assert!(matches!(Value::parse("5"), Value::Integer(5)));
    /// assert!(matches!(Value::parse("5.0"), Value::Integer(5)));
    /// assert!(matches!(Value::parse("2.5"), Value::Double(_)));
    /// assert!(matches!(Value::parse("hi"), Value::String(_)));
    /// ```
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Integer(n);
        }
        // f64::from_str also accepts "inf" and "NaN", which stay strings here
        if trimmed.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(d) = trimmed.parse::<f64>() {
                return Value::double(d);
            }
        }

        Value::String(text.to_string())
    }

    /// Create a normalized numeric value from a double
    pub fn double(d: f64) -> Self {
        // 2^63 is the first double past i64::MAX
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if d.is_finite() && d.fract() == 0.0 && d >= -LIMIT && d < LIMIT {
            Value::Integer(d as i64)
        } else {
            Value::Double(d)
        }
    }

    /// Create a string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        Value::String(s.into())
    }

    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Double(_) => "Double",
            Value::Boolean(_) => "Boolean",
            Value::String(_) => "String",
            Value::Iterable(_) => "Iterable",
        }
    }

    /// Check if this value is an Integer or a Double
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Double(_))
    }

    /// Cast to a double
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Double(d) => Ok(*d),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(other.cast_error("Double")),
        }
    }

    /// Cast to an integer, truncating doubles
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Value::Integer(n) => Ok(*n),
            Value::Double(d) => Ok(d.trunc() as i64),
            Value::Boolean(b) => Ok(i64::from(*b)),
            other => Err(other.cast_error("Integer")),
        }
    }

    /// Cast to a boolean; numbers are true when non-zero
    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Value::Integer(n) => Ok(*n != 0),
            Value::Double(d) => Ok(*d != 0.0),
            Value::Boolean(b) => Ok(*b),
            other => Err(other.cast_error("Boolean")),
        }
    }

    /// Render as a string; always succeeds
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    fn cast_error(&self, to: &'static str) -> Error {
        Error::Cast {
            from: self.type_name(),
            to,
        }
    }

    fn unsupported(&self, operation: &'static str, other: &Value) -> Error {
        Error::TypeCast {
            operation,
            left: self.type_name(),
            right: other.type_name(),
        }
    }

    /// Apply a numeric operator, using checked integer arithmetic when both
    /// sides are integers and falling back to doubles on overflow
    fn numeric(
        &self,
        other: &Value,
        operation: &'static str,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(match int_op(*a, *b) {
                Some(n) => Value::Integer(n),
                None => Value::double(float_op(*a as f64, *b as f64)),
            }),
            (a, b) if a.is_number() && b.is_number() => {
                Ok(Value::double(float_op(a.as_double()?, b.as_double()?)))
            }
            (a, b) => Err(a.unsupported(operation, b)),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Integer(n) => *n == 0,
            Value::Double(d) => *d == 0.0,
            _ => false,
        }
    }

    /// `+`; on two booleans this is logical OR
    pub fn add(&self, other: &Value) -> Result<Value> {
        if let (Value::Boolean(a), Value::Boolean(b)) = (self, other) {
            return Ok(Value::Boolean(*a || *b));
        }
        self.numeric(other, "+", i64::checked_add, |a, b| a + b)
    }

    /// `-`
    pub fn sub(&self, other: &Value) -> Result<Value> {
        self.numeric(other, "-", i64::checked_sub, |a, b| a - b)
    }

    /// `*`; on two booleans this is logical AND
    pub fn mul(&self, other: &Value) -> Result<Value> {
        if let (Value::Boolean(a), Value::Boolean(b)) = (self, other) {
            return Ok(Value::Boolean(*a && *b));
        }
        self.numeric(other, "*", i64::checked_mul, |a, b| a * b)
    }

    /// `/`; integer division truncates
    pub fn div(&self, other: &Value) -> Result<Value> {
        if self.is_number() && other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        self.numeric(other, "/", i64::checked_div, |a, b| a / b)
    }

    /// `%`; remainder with the sign of the dividend
    pub fn rem(&self, other: &Value) -> Result<Value> {
        if self.is_number() && other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        self.numeric(other, "%", i64::checked_rem, |a, b| a % b)
    }

    /// `^`; always computed in floating point
    pub fn pow(&self, other: &Value) -> Result<Value> {
        if !(self.is_number() && other.is_number()) {
            return Err(self.unsupported("^", other));
        }
        Ok(Value::double(self.as_double()?.powf(other.as_double()?)))
    }

    fn ordered(
        &self,
        other: &Value,
        operation: &'static str,
        cmp: fn(f64, f64) -> bool,
    ) -> Result<Value> {
        match (self.as_double(), other.as_double()) {
            (Ok(a), Ok(b)) => Ok(Value::Boolean(cmp(a, b))),
            _ => Err(self.unsupported(operation, other)),
        }
    }

    /// `<`
    pub fn less(&self, other: &Value) -> Result<Value> {
        self.ordered(other, "<", |a, b| a < b)
    }

    /// `>`
    pub fn greater(&self, other: &Value) -> Result<Value> {
        self.ordered(other, ">", |a, b| a > b)
    }

    /// `<=`
    pub fn less_or_equal(&self, other: &Value) -> Result<Value> {
        self.ordered(other, "<=", |a, b| a <= b)
    }

    /// `>=`
    pub fn greater_or_equal(&self, other: &Value) -> Result<Value> {
        self.ordered(other, ">=", |a, b| a >= b)
    }
}

/// Numeric pairs compare by value (`Integer(1) == Double(1.0)`), everything
/// else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Integer(a), Value::Double(b)) | (Value::Double(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Iterable(a), Value::Iterable(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Iterable(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Iterable(values)
    }
}
