//! Built-in functions
//!
//! Every function has a fixed arity, checked by the parser when the call is
//! built. Implementations receive one slot per argument; a slot is `None`
//! when evaluating that argument failed.

pub mod aggregate;
pub mod logical;
pub mod math;
pub mod text;

use std::fmt;

use cellflow_core::Value;

use crate::error::{FormulaError, FormulaResult};

/// Function implementation signature
pub type FunctionImpl = fn(&[Option<Value>]) -> FormulaResult<Value>;

/// The built-in function catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    // Constants
    Pi,
    E,

    // Math
    Pow,
    Sin,
    Cos,
    Tan,
    Ctg,
    Asin,
    Acos,
    Atan,
    Ln,
    Log,
    Abs,
    Cbrt,
    Sqrt,
    Min,
    Max,
    Ceiling,
    Floor,
    Mod,

    // Text
    Contains,
    Concat,
    Repeat,
    Length,
    String,

    // Range aggregations
    Sum,
    Average,
    Count,

    // Conditionals
    If,
    IfError,
}

impl Function {
    /// All catalog entries
    pub const ALL: [Function; 30] = [
        Function::Pi,
        Function::E,
        Function::Pow,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Ctg,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Ln,
        Function::Log,
        Function::Abs,
        Function::Cbrt,
        Function::Sqrt,
        Function::Min,
        Function::Max,
        Function::Ceiling,
        Function::Floor,
        Function::Mod,
        Function::Contains,
        Function::Concat,
        Function::Repeat,
        Function::Length,
        Function::String,
        Function::Sum,
        Function::Average,
        Function::Count,
        Function::If,
        Function::IfError,
    ];

    /// Look up a function by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            Function::Pi => "PI",
            Function::E => "E",
            Function::Pow => "POW",
            Function::Sin => "SIN",
            Function::Cos => "COS",
            Function::Tan => "TAN",
            Function::Ctg => "CTG",
            Function::Asin => "ASIN",
            Function::Acos => "ACOS",
            Function::Atan => "ATAN",
            Function::Ln => "LN",
            Function::Log => "LOG",
            Function::Abs => "ABS",
            Function::Cbrt => "CBRT",
            Function::Sqrt => "SQRT",
            Function::Min => "MIN",
            Function::Max => "MAX",
            Function::Ceiling => "CEILING",
            Function::Floor => "FLOOR",
            Function::Mod => "MOD",
            Function::Contains => "CONTAINS",
            Function::Concat => "CONCAT",
            Function::Repeat => "REPEAT",
            Function::Length => "LENGTH",
            Function::String => "STRING",
            Function::Sum => "SUM",
            Function::Average => "AVERAGE",
            Function::Count => "COUNT",
            Function::If => "IF",
            Function::IfError => "IFERROR",
        }
    }

    /// Exact number of arguments
    pub fn arity(&self) -> usize {
        match self {
            Function::Pi | Function::E => 0,
            Function::Pow
            | Function::Log
            | Function::Min
            | Function::Max
            | Function::Mod
            | Function::Contains
            | Function::Concat
            | Function::Repeat
            | Function::IfError => 2,
            Function::If => 3,
            _ => 1,
        }
    }

    fn implementation(&self) -> FunctionImpl {
        match self {
            Function::Pi => math::fn_pi,
            Function::E => math::fn_e,
            Function::Pow => math::fn_pow,
            Function::Sin => math::fn_sin,
            Function::Cos => math::fn_cos,
            Function::Tan => math::fn_tan,
            Function::Ctg => math::fn_ctg,
            Function::Asin => math::fn_asin,
            Function::Acos => math::fn_acos,
            Function::Atan => math::fn_atan,
            Function::Ln => math::fn_ln,
            Function::Log => math::fn_log,
            Function::Abs => math::fn_abs,
            Function::Cbrt => math::fn_cbrt,
            Function::Sqrt => math::fn_sqrt,
            Function::Min => math::fn_min,
            Function::Max => math::fn_max,
            Function::Ceiling => math::fn_ceiling,
            Function::Floor => math::fn_floor,
            Function::Mod => math::fn_mod,
            Function::Contains => text::fn_contains,
            Function::Concat => text::fn_concat,
            Function::Repeat => text::fn_repeat,
            Function::Length => text::fn_length,
            Function::String => text::fn_string,
            Function::Sum => aggregate::fn_sum,
            Function::Average => aggregate::fn_average,
            Function::Count => aggregate::fn_count,
            Function::If => logical::fn_if,
            Function::IfError => logical::fn_iferror,
        }
    }

    /// Run the function against resolved argument slots
    pub fn call(&self, args: &[Option<Value>]) -> FormulaResult<Value> {
        if args.len() != self.arity() {
            return Err(FormulaError::Arity {
                function: self.name().to_string(),
                expected: self.arity(),
                actual: args.len(),
            });
        }
        (self.implementation())(args)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetch a resolved argument, failing if its evaluation failed
pub(crate) fn arg<'a>(
    args: &'a [Option<Value>],
    index: usize,
    function: &str,
) -> FormulaResult<&'a Value> {
    args.get(index).and_then(Option::as_ref).ok_or_else(|| {
        FormulaError::Evaluation(format!(
            "{}: argument {} has no value",
            function,
            index + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Function::from_name("pow"), Some(Function::Pow));
        assert_eq!(Function::from_name("IfError"), Some(Function::IfError));
        assert_eq!(Function::from_name("UNKNOWN"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for function in Function::ALL {
            assert_eq!(Function::from_name(function.name()), Some(function));
        }
    }

    #[test]
    fn test_arities() {
        assert_eq!(Function::Pi.arity(), 0);
        assert_eq!(Function::Sqrt.arity(), 1);
        assert_eq!(Function::Sum.arity(), 1);
        assert_eq!(Function::Log.arity(), 2);
        assert_eq!(Function::If.arity(), 3);
    }

    #[test]
    fn test_call_checks_arity() {
        let result = Function::Pow.call(&[Some(Value::Integer(2))]);
        assert!(matches!(
            result,
            Err(FormulaError::Arity {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }
}
