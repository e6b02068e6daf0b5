//! Formula parser
//!
//! An operator-precedence (shunting-yard) parser. Operands go on an expression
//! stack; operators share a single stack with the open-paren, function, comma
//! and colon markers that delimit groups, argument lists and ranges.

use cellflow_core::{CellRange, CellReference, Value};

use crate::ast::{Expression, Operator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::Function;
use crate::tokenizer::{tokenize, Token, TokenKind};

/// Deepest expression tree the parser builds
///
/// Evaluation and the other tree walks recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// Parse formula text into an AST
///
/// The first character is the formula sigil and is not inspected. Formulas
/// nesting deeper than [`MAX_DEPTH`] are rejected.
///
/// # Example
/// ```rust
/// use cellflow_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=IF(A1 > 0, \"Yes\", \"No\")").unwrap();
/// assert!(parse_formula("=POW(2)").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Expression> {
    let tokens = tokenize(formula)?;
    Parser::new(&tokens, formula.chars().count()).parse()
}

/// Items of the operator stack
#[derive(Debug)]
enum StackItem {
    Operator(Operator),
    /// `(`; `base` is the expression stack height when it was opened
    OpenParen { base: usize },
    /// Pending function call; its `(` sits right above it
    Function { function: Function },
    /// Argument separator; `base` is the expression stack height after the
    /// preceding argument was reduced
    Comma { base: usize },
    /// Pending `:` of a range
    Colon,
}

struct Parser<'a> {
    tokens: &'a [Token],
    /// Position reported for errors at end of input
    end: usize,
    /// Operands with the depth of their tree
    expressions: Vec<(Expression, usize)>,
    operators: Vec<StackItem>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], end: usize) -> Self {
        Self {
            tokens,
            end,
            expressions: Vec::new(),
            operators: Vec::new(),
        }
    }

    fn parse(mut self) -> FormulaResult<Expression> {
        let tokens = self.tokens;
        let mut index = 0;
        let mut previous: Option<TokenKind> = None;

        while let Some(token) = tokens.get(index) {
            match token.kind {
                TokenKind::Number => self.number(token)?,
                TokenKind::String => {
                    self.push_leaf(Expression::Literal(Value::String(token.literal.clone())))
                }
                TokenKind::Reference => {
                    if self.is_kind(index + 1, TokenKind::OpenParen) {
                        if self.is_kind(index + 2, TokenKind::CloseParen) {
                            self.empty_call(token)?;
                            previous = Some(TokenKind::CloseParen);
                            index += 3;
                            continue;
                        }
                        let function = lookup(token)?;
                        self.operators.push(StackItem::Function { function });
                    } else {
                        self.reference(token)?;
                    }
                }
                TokenKind::Colon => self.operators.push(StackItem::Colon),
                TokenKind::Operator => self.operator(token, previous)?,
                TokenKind::Comma => self.comma(token)?,
                TokenKind::OpenParen => self.operators.push(StackItem::OpenParen {
                    base: self.expressions.len(),
                }),
                TokenKind::CloseParen => self.close_paren(token)?,
            }

            previous = Some(token.kind);
            index += 1;
        }

        self.finish()
    }

    fn push_leaf(&mut self, expression: Expression) {
        self.expressions.push((expression, 1));
    }

    fn push_node(
        &mut self,
        expression: Expression,
        depth: usize,
        position: usize,
    ) -> FormulaResult<()> {
        if depth > MAX_DEPTH {
            return Err(FormulaError::parse(
                format!("formula nested deeper than {} levels", MAX_DEPTH),
                position,
            ));
        }
        self.expressions.push((expression, depth));
        Ok(())
    }

    fn is_kind(&self, index: usize, kind: TokenKind) -> bool {
        self.tokens.get(index).is_some_and(|t| t.kind == kind)
    }

    fn number(&mut self, token: &Token) -> FormulaResult<()> {
        let value = Value::parse(&token.literal);
        if !value.is_number() {
            return Err(FormulaError::parse(
                format!("invalid number '{}'", token.literal),
                token.position,
            ));
        }
        self.push_leaf(Expression::Literal(value));
        Ok(())
    }

    /// `NAME()` is built directly, without going through the marker stack
    fn empty_call(&mut self, token: &Token) -> FormulaResult<()> {
        let function = lookup(token)?;
        if function.arity() != 0 {
            return Err(arity_error(function, 0));
        }
        self.push_leaf(Expression::Function {
            function,
            args: Vec::new(),
        });
        Ok(())
    }

    fn reference(&mut self, token: &Token) -> FormulaResult<()> {
        let reference = CellReference::parse(&token.literal).map_err(|e| {
            FormulaError::parse(format!("'{}': {}", token.literal, e), token.position)
        })?;

        if !matches!(self.operators.last(), Some(StackItem::Colon)) {
            self.push_leaf(Expression::CellRef(reference));
            return Ok(());
        }

        self.operators.pop();
        let from = match self.expressions.pop() {
            Some((Expression::CellRef(from), _)) => from,
            _ => {
                return Err(FormulaError::parse(
                    "range must start with a cell reference",
                    token.position,
                ))
            }
        };
        let range = CellRange::new(from, reference)
            .map_err(|e| FormulaError::parse(e.to_string(), token.position))?;
        self.push_leaf(Expression::Range(range));
        Ok(())
    }

    fn operator(&mut self, token: &Token, previous: Option<TokenKind>) -> FormulaResult<()> {
        let op = Operator::from_symbol(&token.literal).ok_or_else(|| {
            FormulaError::parse(
                format!("unknown operator '{}'", token.literal),
                token.position,
            )
        })?;

        let expects_operand = matches!(
            previous,
            None | Some(TokenKind::OpenParen)
                | Some(TokenKind::Comma)
                | Some(TokenKind::Operator)
                | Some(TokenKind::Colon)
        );

        if expects_operand {
            if op != Operator::Subtract {
                return Err(FormulaError::parse(
                    format!("missing left operand for '{}'", op),
                    token.position,
                ));
            }
            // Unary minus: -x becomes -1 * x
            self.push_leaf(Expression::Literal(Value::Integer(-1)));
            self.operators.push(StackItem::Operator(Operator::Multiply));
            return Ok(());
        }

        while let Some(StackItem::Operator(top)) = self.operators.last() {
            let top = *top;
            let binds_tighter = top.precedence() > op.precedence()
                || (top.precedence() == op.precedence() && !op.is_right_associative());
            if !binds_tighter {
                break;
            }
            self.operators.pop();
            self.reduce(top, token.position)?;
        }

        self.operators.push(StackItem::Operator(op));
        Ok(())
    }

    fn comma(&mut self, token: &Token) -> FormulaResult<()> {
        self.reduce_pending(token.position)?;
        match self.operators.last() {
            Some(StackItem::OpenParen { .. }) | Some(StackItem::Comma { .. }) => {
                self.operators.push(StackItem::Comma {
                    base: self.expressions.len(),
                });
                Ok(())
            }
            _ => Err(FormulaError::parse("unexpected ','", token.position)),
        }
    }

    fn close_paren(&mut self, token: &Token) -> FormulaResult<()> {
        self.reduce_pending(token.position)?;

        let mut commas = Vec::new();
        let base = loop {
            match self.operators.pop() {
                Some(StackItem::Comma { base }) => commas.push(base),
                Some(StackItem::OpenParen { base }) => break base,
                Some(StackItem::Colon) => {
                    return Err(FormulaError::parse("incomplete range", token.position))
                }
                _ => {
                    return Err(FormulaError::parse(
                        "unmatched parenthesis",
                        token.position,
                    ))
                }
            }
        };
        commas.reverse();

        let count = self.expressions.len() - base;

        if let Some(StackItem::Function { function }) = self.operators.last() {
            let function = *function;
            self.operators.pop();

            let well_formed = count == commas.len() + 1
                && commas
                    .iter()
                    .enumerate()
                    .all(|(i, &comma)| comma == base + i + 1);
            if !well_formed {
                return Err(FormulaError::parse(
                    format!("empty argument in call to {}", function),
                    token.position,
                ));
            }
            if count != function.arity() {
                return Err(arity_error(function, count));
            }

            let (args, depths): (Vec<_>, Vec<_>) =
                self.expressions.split_off(base).into_iter().unzip();
            let depth = depths.into_iter().max().unwrap_or(0) + 1;
            let call = Expression::Function { function, args };
            return self.push_node(call, depth, token.position);
        }

        if !commas.is_empty() {
            return Err(FormulaError::parse(
                "unexpected ',' outside of a function call",
                token.position,
            ));
        }
        match count {
            1 => Ok(()),
            0 => Err(FormulaError::parse("empty parentheses", token.position)),
            _ => Err(FormulaError::parse("dangling expressions", token.position)),
        }
    }

    /// Reduce every operator above the nearest marker
    fn reduce_pending(&mut self, position: usize) -> FormulaResult<()> {
        while let Some(StackItem::Operator(op)) = self.operators.last() {
            let op = *op;
            self.operators.pop();
            self.reduce(op, position)?;
        }
        Ok(())
    }

    /// Expression stack height owned by the innermost open group
    fn group_base(&self) -> usize {
        self.operators
            .iter()
            .rev()
            .find_map(|item| match item {
                StackItem::OpenParen { base } | StackItem::Comma { base } => Some(*base),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn reduce(&mut self, op: Operator, position: usize) -> FormulaResult<()> {
        if self.expressions.len() < self.group_base() + 2 {
            return Err(FormulaError::parse(
                format!("missing operand for '{}'", op),
                position,
            ));
        }
        match (self.expressions.pop(), self.expressions.pop()) {
            (Some((right, right_depth)), Some((left, left_depth))) => {
                let depth = left_depth.max(right_depth) + 1;
                self.push_node(Expression::binary(op, left, right), depth, position)
            }
            _ => Err(FormulaError::parse(
                format!("missing operand for '{}'", op),
                position,
            )),
        }
    }

    fn finish(mut self) -> FormulaResult<Expression> {
        while let Some(item) = self.operators.pop() {
            match item {
                StackItem::Operator(op) => self.reduce(op, self.end)?,
                StackItem::OpenParen { .. } => {
                    return Err(FormulaError::parse("unmatched parenthesis", self.end))
                }
                StackItem::Function { function } => {
                    return Err(FormulaError::parse(
                        format!("unclosed call to {}", function),
                        self.end,
                    ))
                }
                StackItem::Comma { .. } => {
                    return Err(FormulaError::parse("unexpected ','", self.end))
                }
                StackItem::Colon => return Err(FormulaError::parse("incomplete range", self.end)),
            }
        }

        match self.expressions.len() {
            0 => Err(FormulaError::parse("empty formula", self.end)),
            1 => self
                .expressions
                .pop()
                .map(|(expression, _)| expression)
                .ok_or_else(|| FormulaError::parse("empty formula", self.end)),
            _ => Err(FormulaError::parse("dangling expressions", self.end)),
        }
    }
}

fn lookup(token: &Token) -> FormulaResult<Function> {
    Function::from_name(&token.literal)
        .ok_or_else(|| FormulaError::UnknownFunction(token.literal.to_uppercase()))
}

fn arity_error(function: Function, actual: usize) -> FormulaError {
    FormulaError::Arity {
        function: function.name().to_string(),
        expected: function.arity(),
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn int(n: i64) -> Expression {
        Expression::Literal(Value::Integer(n))
    }

    fn text(s: &str) -> Expression {
        Expression::Literal(Value::string(s))
    }

    fn cell(identifier: &str) -> Expression {
        Expression::CellRef(CellReference::parse(identifier).unwrap())
    }

    fn range(s: &str) -> Expression {
        Expression::Range(CellRange::parse(s).unwrap())
    }

    fn call(function: Function, args: Vec<Expression>) -> Expression {
        Expression::Function { function, args }
    }

    fn bin(op: Operator, left: Expression, right: Expression) -> Expression {
        Expression::binary(op, left, right)
    }

    fn neg(e: Expression) -> Expression {
        bin(Operator::Multiply, int(-1), e)
    }

    #[test]
    fn test_parse_precedence() {
        use Operator::*;
        assert_eq!(
            parse_formula("=2 + 3 * 4 - 5 / 2").unwrap(),
            bin(
                Subtract,
                bin(Add, int(2), bin(Multiply, int(3), int(4))),
                bin(Divide, int(5), int(2))
            )
        );
        assert_eq!(
            parse_formula("=1 + 2 < 3 * 4").unwrap(),
            bin(
                LessThan,
                bin(Add, int(1), int(2)),
                bin(Multiply, int(3), int(4))
            )
        );
        assert_eq!(
            parse_formula("=7 % 4 + 1").unwrap(),
            bin(Add, bin(Remainder, int(7), int(4)), int(1))
        );
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        use Operator::*;
        assert_eq!(
            parse_formula("=2 ^ 3 ^ 2").unwrap(),
            bin(Power, int(2), bin(Power, int(3), int(2)))
        );
        assert_eq!(
            parse_formula("=2 ^ 5 + (3 * E()) / (4 - 7)").unwrap(),
            bin(
                Add,
                bin(Power, int(2), int(5)),
                bin(
                    Divide,
                    bin(Multiply, int(3), call(Function::E, vec![])),
                    bin(Subtract, int(4), int(7))
                )
            )
        );
    }

    #[test]
    fn test_parse_unary_minus() {
        use Operator::*;
        assert_eq!(
            parse_formula("=-5 + 10").unwrap(),
            bin(Add, neg(int(5)), int(10))
        );
        assert_eq!(
            parse_formula("=2 * -(1 + 1)").unwrap(),
            bin(Multiply, int(2), neg(bin(Add, int(1), int(1))))
        );
    }

    #[test]
    fn test_parse_functions() {
        use Operator::*;
        assert_eq!(
            parse_formula("=pow(-2, A1 - 3) * (42 + B2)").unwrap(),
            bin(
                Multiply,
                call(
                    Function::Pow,
                    vec![neg(int(2)), bin(Subtract, cell("A1"), int(3))]
                ),
                bin(Add, int(42), cell("B2"))
            )
        );
        assert_eq!(
            parse_formula("=CONCAT(\"2\", \"3\")").unwrap(),
            call(Function::Concat, vec![text("2"), text("3")])
        );
        assert_eq!(
            parse_formula("=PI() + E()").unwrap(),
            bin(
                Add,
                call(Function::Pi, vec![]),
                call(Function::E, vec![])
            )
        );
        assert_eq!(
            parse_formula("=IF(A1 > 0, POW(2, 2), \"no\")").unwrap(),
            call(
                Function::If,
                vec![
                    bin(GreaterThan, cell("A1"), int(0)),
                    call(Function::Pow, vec![int(2), int(2)]),
                    text("no"),
                ]
            )
        );
    }

    #[test]
    fn test_parse_ranges() {
        use Operator::*;
        assert_eq!(
            parse_formula("=sum(A1:F4) * (42 + B2)").unwrap(),
            bin(
                Multiply,
                call(Function::Sum, vec![range("A1:F4")]),
                bin(Add, int(42), cell("B2"))
            )
        );
        assert_eq!(
            parse_formula("=sum(A1:F4) < 5").unwrap(),
            bin(LessThan, call(Function::Sum, vec![range("A1:F4")]), int(5))
        );
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_formula("=2.5").unwrap(), Expression::Literal(Value::Double(2.5)));
        assert_eq!(parse_formula("=4.0").unwrap(), int(4));
        assert_eq!(parse_formula("=\"hi\"").unwrap(), text("hi"));
        assert_eq!(parse_formula("=a1").unwrap(), cell("A1"));
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "=POW(2,, 3)",
            "=POW((2, 3)",
            "=POW(2, 3))",
            "=2 * )(2)",
            "=2 + (3 * 4",
            "=2 + 3) * 4",
            "=2 + 3 & 4",
            "=2 2 + 3",
            "=2 3 + 4",
            "=POW(,)",
            "=POW(2, ",
            "=POW(2, )",
            "=2 + / 3",
            "=* 2 * 3",
            "=2 * 3 +",
            "=POW 2, 3)",
            "=CONCAT(\"2\", \"3)",
            "=1.2.3",
            "=A1:A1",
            "=B2:A1",
            "=A1:",
            "=()",
            "=(1, 2)",
            "=",
            "",
        ];
        for formula in cases {
            assert!(
                matches!(parse_formula(formula), Err(FormulaError::Parse { .. })),
                "{formula:?} should fail to parse, got {:?}",
                parse_formula(formula)
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let chain = |terms: usize| format!("={}1", "1+".repeat(terms - 1));
        assert!(parse_formula(&chain(100)).is_ok());
        assert!(matches!(
            parse_formula(&chain(MAX_DEPTH + 50)),
            Err(FormulaError::Parse { .. })
        ));

        let nested = format!("={}1{}", "ABS(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse_formula(&nested), Err(FormulaError::Parse { .. })));
    }

    #[test]
    fn test_parse_function_errors() {
        assert_eq!(
            parse_formula("=UNKNOWN(2, 3)"),
            Err(FormulaError::UnknownFunction("UNKNOWN".into()))
        );
        assert_eq!(
            parse_formula("=POW(2)"),
            Err(FormulaError::Arity {
                function: "POW".into(),
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            parse_formula("=POW(2, 3, 4)"),
            Err(FormulaError::Arity { actual: 3, .. })
        ));
        assert!(matches!(
            parse_formula("=POW()"),
            Err(FormulaError::Arity { actual: 0, .. })
        ));
        assert!(matches!(
            parse_formula("=PI(1)"),
            Err(FormulaError::Arity { expected: 0, .. })
        ));
    }

    #[test]
    fn test_display_reparses() {
        for formula in [
            "=2 + 3 * 4 - 5 / 2",
            "=(1 - 2) - (3 - 4)",
            "=SUM(A1:B3) / COUNT(A1:B3)",
            "=IF(A1 >= 2, \"big\", CONCAT(\"x\", B1))",
        ] {
            let ast = parse_formula(formula).unwrap();
            let reparsed = parse_formula(&format!("={}", ast)).unwrap();
            assert_eq!(reparsed, ast);
        }
    }

    const OPERATORS: [Operator; 12] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Remainder,
        Operator::Power,
    ];

    fn arb_expression() -> impl Strategy<Value = Expression> {
        let leaf = prop_oneof![
            (0i64..1000).prop_map(int),
            (0u32..50, 1u32..30).prop_map(|(row, column)| {
                Expression::CellRef(CellReference::new(row, column).unwrap())
            }),
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                (prop::sample::select(OPERATORS.to_vec()), inner.clone(), inner.clone())
                    .prop_map(|(op, left, right)| bin(op, left, right)),
                (inner.clone(), inner).prop_map(|(a, b)| call(Function::Pow, vec![a, b])),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_display_reparses(ast in arb_expression()) {
            let reparsed = parse_formula(&format!("={}", ast)).unwrap();
            prop_assert_eq!(reparsed, ast);
        }
    }
}
