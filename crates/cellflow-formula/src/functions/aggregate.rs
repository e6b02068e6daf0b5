//! Range aggregation functions
//!
//! Each takes a single range argument and only looks at its Integer and
//! Double elements; booleans and text inside the range are skipped.

use cellflow_core::{Error, Value};

use super::arg;
use crate::error::{FormulaError, FormulaResult};

fn range<'a>(args: &'a [Option<Value>], function: &str) -> FormulaResult<&'a [Value]> {
    match arg(args, 0, function)? {
        Value::Iterable(values) => Ok(values),
        other => Err(FormulaError::Evaluation(format!(
            "{} expects a range argument, got {}",
            function,
            other.type_name()
        ))),
    }
}

fn numbers(values: &[Value]) -> impl Iterator<Item = &Value> {
    values.iter().filter(|v| v.is_number())
}

fn sum(values: &[Value]) -> FormulaResult<Value> {
    numbers(values).try_fold(Value::Integer(0), |acc, v| Ok(acc.add(v)?))
}

/// SUM function
pub fn fn_sum(args: &[Option<Value>]) -> FormulaResult<Value> {
    sum(range(args, "SUM")?)
}

/// COUNT function
pub fn fn_count(args: &[Option<Value>]) -> FormulaResult<Value> {
    let values = range(args, "COUNT")?;
    Ok(Value::Integer(numbers(values).count() as i64))
}

/// AVERAGE function: the sum divided by the count with `/`, so an
/// all-integer range truncates
pub fn fn_average(args: &[Option<Value>]) -> FormulaResult<Value> {
    let values = range(args, "AVERAGE")?;
    let count = numbers(values).count();
    if count == 0 {
        return Err(Error::DivisionByZero.into());
    }
    Ok(sum(values)?.div(&Value::Integer(count as i64))?)
}
