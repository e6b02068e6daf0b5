//! Text functions

use cellflow_core::Value;

use super::arg;
use crate::error::{FormulaError, FormulaResult};

/// Longest string REPEAT may produce, in bytes
pub const MAX_REPEAT_LEN: usize = 1 << 20;

/// CONTAINS function: whether the first argument's text contains the second's
pub fn fn_contains(args: &[Option<Value>]) -> FormulaResult<Value> {
    let haystack = arg(args, 0, "CONTAINS")?.as_string();
    let needle = arg(args, 1, "CONTAINS")?.as_string();
    Ok(Value::Boolean(haystack.contains(&needle)))
}

/// CONCAT function
pub fn fn_concat(args: &[Option<Value>]) -> FormulaResult<Value> {
    let mut result = arg(args, 0, "CONCAT")?.as_string();
    result.push_str(&arg(args, 1, "CONCAT")?.as_string());
    Ok(Value::String(result))
}

/// REPEAT function
pub fn fn_repeat(args: &[Option<Value>]) -> FormulaResult<Value> {
    let text = arg(args, 0, "REPEAT")?.as_string();
    let count = arg(args, 1, "REPEAT")?.as_integer()?;
    let count = usize::try_from(count).map_err(|_| {
        FormulaError::Evaluation(format!("REPEAT: count must not be negative, got {}", count))
    })?;
    match text.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Value::String(text.repeat(count))),
        _ => Err(FormulaError::Evaluation(format!(
            "REPEAT: result longer than {} bytes",
            MAX_REPEAT_LEN
        ))),
    }
}

/// LENGTH function (number of characters)
pub fn fn_length(args: &[Option<Value>]) -> FormulaResult<Value> {
    let text = arg(args, 0, "LENGTH")?.as_string();
    Ok(Value::Integer(text.chars().count() as i64))
}

/// STRING function
pub fn fn_string(args: &[Option<Value>]) -> FormulaResult<Value> {
    Ok(Value::String(arg(args, 0, "STRING")?.as_string()))
}
