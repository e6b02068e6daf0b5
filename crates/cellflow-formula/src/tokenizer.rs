//! Formula tokenizer
//!
//! Turns formula text into a flat token stream. The first character (the `=`
//! sigil) is always discarded; positions are character offsets into the
//! original text, sigil included.

use crate::error::{FormulaError, FormulaResult};

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Numeric literal (digits and dots)
    Number,
    /// Arithmetic or comparison operator
    Operator,
    /// Cell identifier or function name
    Reference,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    /// String literal, quotes excluded
    String,
}

/// A single token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// Character offset in the formula text
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, literal: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }

    /// Check kind and literal at once
    pub fn is(&self, kind: TokenKind, literal: &str) -> bool {
        self.kind == kind && self.literal == literal
    }
}

/// Tokenize formula text
///
/// # Example
/// ```rust
/// use cellflow_formula::{tokenize, TokenKind};
///
/// let tokens = tokenize("=SUM(A1:B2) >= 10").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds[0], TokenKind::Reference);
/// assert_eq!(tokens[6].literal, ">=");
/// ```
pub fn tokenize(text: &str) -> FormulaResult<Vec<Token>> {
    Tokenizer::new(text).run()
}

struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Tokenizer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            // Skip the sigil
            pos: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> FormulaResult<Vec<Token>> {
        while let Some(c) = self.peek() {
            let start = self.pos;

            match c {
                c if c.is_whitespace() => self.pos += 1,
                '=' | '!' | '<' | '>' => self.comparison(c, start)?,
                '+' | '-' | '*' | '/' | '^' | '%' => {
                    self.pos += 1;
                    self.push(TokenKind::Operator, c.to_string(), start);
                }
                '(' => self.single(TokenKind::OpenParen, c, start),
                ')' => self.single(TokenKind::CloseParen, c, start),
                ',' => self.single(TokenKind::Comma, c, start),
                ':' => self.single(TokenKind::Colon, c, start),
                '"' => self.string(start)?,
                c if c.is_ascii_digit() => {
                    let literal = self.take_while(|c| c.is_ascii_digit() || c == '.');
                    self.push(TokenKind::Number, literal, start);
                }
                c if c.is_ascii_alphabetic() => {
                    let literal = self.take_while(|c| c.is_ascii_alphanumeric());
                    self.push(TokenKind::Reference, literal, start);
                }
                other => {
                    return Err(FormulaError::parse(
                        format!("unexpected symbol '{}'", other),
                        start,
                    ))
                }
            }
        }

        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn push(&mut self, kind: TokenKind, literal: String, position: usize) {
        self.tokens.push(Token::new(kind, literal, position));
    }

    fn single(&mut self, kind: TokenKind, c: char, start: usize) {
        self.pos += 1;
        self.push(kind, c.to_string(), start);
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// `==`, `!=`, `<=`, `>=` by lookahead; bare `<` and `>` stand alone
    fn comparison(&mut self, c: char, start: usize) -> FormulaResult<()> {
        self.pos += 1;
        if self.peek() == Some('=') {
            self.pos += 1;
            self.push(TokenKind::Operator, format!("{}=", c), start);
            return Ok(());
        }
        match c {
            '<' | '>' => {
                self.push(TokenKind::Operator, c.to_string(), start);
                Ok(())
            }
            _ => Err(FormulaError::parse(
                format!("unexpected symbol '{}'", c),
                start,
            )),
        }
    }

    fn string(&mut self, start: usize) -> FormulaResult<()> {
        // Opening quote
        self.pos += 1;
        let literal = self.take_while(|c| c != '"');
        if self.peek().is_none() {
            return Err(FormulaError::parse("unterminated string literal", start));
        }
        // Closing quote
        self.pos += 1;
        self.push(TokenKind::String, literal, start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literals(text: &str) -> Vec<(TokenKind, String)> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.literal))
            .collect()
    }

    fn token(kind: TokenKind, literal: &str) -> (TokenKind, String) {
        (kind, literal.to_string())
    }

    #[test]
    fn test_arithmetic() {
        use TokenKind::*;
        assert_eq!(
            literals("=pow(-2, A1 - 3) * (42.5 + B2)"),
            vec![
                token(Reference, "pow"),
                token(OpenParen, "("),
                token(Operator, "-"),
                token(Number, "2"),
                token(Comma, ","),
                token(Reference, "A1"),
                token(Operator, "-"),
                token(Number, "3"),
                token(CloseParen, ")"),
                token(Operator, "*"),
                token(OpenParen, "("),
                token(Number, "42.5"),
                token(Operator, "+"),
                token(Reference, "B2"),
                token(CloseParen, ")"),
            ]
        );
    }

    #[test]
    fn test_comparisons() {
        use TokenKind::*;
        assert_eq!(
            literals("=1<2>3<=4>=5==6!=7"),
            vec![
                token(Number, "1"),
                token(Operator, "<"),
                token(Number, "2"),
                token(Operator, ">"),
                token(Number, "3"),
                token(Operator, "<="),
                token(Number, "4"),
                token(Operator, ">="),
                token(Number, "5"),
                token(Operator, "=="),
                token(Number, "6"),
                token(Operator, "!="),
                token(Number, "7"),
            ]
        );
    }

    #[test]
    fn test_strings_and_ranges() {
        use TokenKind::*;
        assert_eq!(
            literals("=CONCAT(\"a b\", SUM(A1:B2))"),
            vec![
                token(Reference, "CONCAT"),
                token(OpenParen, "("),
                token(String, "a b"),
                token(Comma, ","),
                token(Reference, "SUM"),
                token(OpenParen, "("),
                token(Reference, "A1"),
                token(Colon, ":"),
                token(Reference, "B2"),
                token(CloseParen, ")"),
                token(CloseParen, ")"),
            ]
        );
    }

    #[test]
    fn test_empty_formula() {
        assert!(tokenize("=").unwrap().is_empty());
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("=  12 + A1").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![3, 6, 8]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            tokenize("=2 & 3"),
            Err(FormulaError::parse("unexpected symbol '&'", 3))
        );
        assert!(matches!(
            tokenize("=PI() .3"),
            Err(FormulaError::Parse { position: 6, .. })
        ));
        assert!(tokenize("=1 = 2").is_err());
        assert!(tokenize("=1 ! 2").is_err());
        assert!(tokenize("=\"open").is_err());
    }
}
