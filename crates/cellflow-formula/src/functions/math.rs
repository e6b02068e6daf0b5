//! Math functions

use cellflow_core::{Error, Value};

use super::arg;
use crate::error::FormulaResult;

fn number(args: &[Option<Value>], index: usize, function: &str) -> FormulaResult<f64> {
    Ok(arg(args, index, function)?.as_double()?)
}

fn unary(args: &[Option<Value>], function: &str, op: fn(f64) -> f64) -> FormulaResult<Value> {
    Ok(Value::double(op(number(args, 0, function)?)))
}

/// PI function
pub fn fn_pi(_args: &[Option<Value>]) -> FormulaResult<Value> {
    Ok(Value::double(std::f64::consts::PI))
}

/// E function
pub fn fn_e(_args: &[Option<Value>]) -> FormulaResult<Value> {
    Ok(Value::double(std::f64::consts::E))
}

/// POW function
pub fn fn_pow(args: &[Option<Value>]) -> FormulaResult<Value> {
    let base = number(args, 0, "POW")?;
    let exponent = number(args, 1, "POW")?;
    Ok(Value::double(base.powf(exponent)))
}

pub fn fn_sin(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "SIN", f64::sin)
}

pub fn fn_cos(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "COS", f64::cos)
}

pub fn fn_tan(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "TAN", f64::tan)
}

/// CTG function (cotangent)
pub fn fn_ctg(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "CTG", |x| 1.0 / x.tan())
}

pub fn fn_asin(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "ASIN", f64::asin)
}

pub fn fn_acos(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "ACOS", f64::acos)
}

pub fn fn_atan(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "ATAN", f64::atan)
}

/// LN function (natural logarithm)
pub fn fn_ln(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "LN", f64::ln)
}

/// LOG function: `LOG(base, x)`
pub fn fn_log(args: &[Option<Value>]) -> FormulaResult<Value> {
    let base = number(args, 0, "LOG")?;
    let x = number(args, 1, "LOG")?;
    Ok(Value::double(x.ln() / base.ln()))
}

pub fn fn_abs(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "ABS", f64::abs)
}

/// CBRT function (cube root)
pub fn fn_cbrt(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "CBRT", f64::cbrt)
}

pub fn fn_sqrt(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "SQRT", f64::sqrt)
}

/// MIN function (two numbers)
pub fn fn_min(args: &[Option<Value>]) -> FormulaResult<Value> {
    let a = number(args, 0, "MIN")?;
    let b = number(args, 1, "MIN")?;
    Ok(Value::double(a.min(b)))
}

/// MAX function (two numbers)
pub fn fn_max(args: &[Option<Value>]) -> FormulaResult<Value> {
    let a = number(args, 0, "MAX")?;
    let b = number(args, 1, "MAX")?;
    Ok(Value::double(a.max(b)))
}

pub fn fn_ceiling(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "CEILING", f64::ceil)
}

pub fn fn_floor(args: &[Option<Value>]) -> FormulaResult<Value> {
    unary(args, "FLOOR", f64::floor)
}

/// MOD function: integer remainder of the truncated arguments
pub fn fn_mod(args: &[Option<Value>]) -> FormulaResult<Value> {
    let dividend = arg(args, 0, "MOD")?.as_integer()?;
    let divisor = arg(args, 1, "MOD")?.as_integer()?;
    if divisor == 0 {
        return Err(Error::DivisionByZero.into());
    }
    // i64::MIN % -1 is the only overflowing case and its remainder is 0
    Ok(Value::Integer(dividend.checked_rem(divisor).unwrap_or(0)))
}
