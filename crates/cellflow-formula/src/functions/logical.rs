//! Logical functions

use cellflow_core::Value;

use super::arg;
use crate::error::FormulaResult;

/// IF function
///
/// Only the chosen branch must have a value; the other may have failed.
pub fn fn_if(args: &[Option<Value>]) -> FormulaResult<Value> {
    let condition = arg(args, 0, "IF")?.as_boolean()?;
    let branch = if condition { 1 } else { 2 };
    Ok(arg(args, branch, "IF")?.clone())
}

/// IFERROR function: the first argument, or the fallback when it failed
pub fn fn_iferror(args: &[Option<Value>]) -> FormulaResult<Value> {
    match args.first() {
        Some(Some(value)) => Ok(value.clone()),
        _ => Ok(arg(args, 1, "IFERROR")?.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;

    #[test]
    fn test_if() {
        let args = [
            Some(Value::Integer(1)),
            Some(Value::string("yes")),
            None,
        ];
        assert_eq!(fn_if(&args).unwrap(), Value::string("yes"));

        let args = [
            Some(Value::Boolean(false)),
            Some(Value::string("yes")),
            None,
        ];
        assert!(matches!(fn_if(&args), Err(FormulaError::Evaluation(_))));
    }

    #[test]
    fn test_iferror() {
        let args = [Some(Value::Integer(1)), Some(Value::Integer(2))];
        assert_eq!(fn_iferror(&args).unwrap(), Value::Integer(1));

        let args = [None, Some(Value::Integer(2))];
        assert_eq!(fn_iferror(&args).unwrap(), Value::Integer(2));

        let args = [None, None];
        assert!(fn_iferror(&args).is_err());
    }
}
