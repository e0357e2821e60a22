//! A recursive descent parser for algebraic expressions.
//!
//! The parser operates on the token stream produced by the
//! [`tokenizer`](crate::tokenizer), and builds an abstract syntax tree (AST) of the expression.
//! Operator precedence and associativity are resolved here, including implicit multiplication
//! (`2x`, `3(x + 1)`), prefix signs, and postfix operators. Parenthesized groups do not get a
//! node of their own; the inner expression simply has its span widened to cover the
//! parentheses.

pub mod binary;
pub mod error;
pub mod expr;
pub mod fmt;
pub mod iter;
pub mod literal;
pub mod token;
pub mod unary;

use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use error::{kind, Error};
use stepcheck_error::ErrorKind;
use std::ops::Range;

/// The maximum nesting depth accepted by the parser.
///
/// Parsing is recursive, so input that nests groups or prefix operators deeper than this would
/// otherwise overflow the stack. Inputs beyond the limit fail with [`kind::NestingTooDeep`].
pub const MAX_DEPTH: usize = 64;

/// The associativity of an operation.
///
/// Operations with the same precedence level are evaluated from left-to-right, or right-to-left,
/// depending on their associativity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    /// The operation is left-associative.
    Left,

    /// The operation is right-associative.
    Right,
}

/// The precedence levels of the grammar, from loosest to tightest binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precedence {
    /// Any precedence. This is the starting context for a full expression.
    Any,

    /// Precedence of addition and subtraction.
    Term,

    /// Precedence of multiplication, division, and remainder, including implicit
    /// multiplication.
    Factor,

    /// Precedence of exponentiation.
    Exp,

    /// Precedence of unary operators. These bind tighter than every binary operator, so `-2^2`
    /// parses as `(-2)^2` and `√9^3` parses as `(√9)^3`.
    Unary,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (*self as u8).partial_cmp(&(*other as u8))
    }
}

/// Any type that can be parsed from a stream of [`Token`]s.
pub trait Parse: Sized {
    /// Parses a value from the given stream.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// A parser over a stream of tokens.
#[derive(Clone, Debug)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The current nesting depth, used to enforce [`MAX_DEPTH`].
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Creates a new parser for the given source string.
    pub fn new(input: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(input),
            cursor: 0,
            depth: 0,
        }
    }

    /// Creates a non-fatal error at the current position with the given kind.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error at the current position with the given kind. Fatal errors abort
    /// parsing instead of letting the parser backtrack and try something else.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// The span pointing at the end of the source string.
    pub fn eof_span(&self) -> Range<usize> {
        let end = self
            .tokens
            .last()
            .map(|token| token.span.end)
            .unwrap_or(0);
        end..end
    }

    /// The span of the token at the cursor, or the end of the source string if there are no
    /// tokens left.
    pub fn span(&self) -> Range<usize> {
        self.current_token()
            .map(|token| token.span.clone())
            .unwrap_or_else(|| self.eof_span())
    }

    /// Returns the token at the cursor without advancing.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Advances the cursor past whitespace and returns the next meaningful token.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while let Some(token) = self.tokens.get(self.cursor) {
            self.cursor += 1;
            if !token.kind.is_whitespace() {
                return Ok(token.clone());
            }
        }
        Err(Error::new(vec![self.eof_span()], kind::UnexpectedEof))
    }

    /// Moves the cursor to match the given parser's position.
    pub(crate) fn set_cursor(&mut self, other: &Parser<'source>) {
        self.cursor = other.cursor;
        self.depth = other.depth;
    }

    /// Enters one level of nesting, failing if the nesting limit is exceeded.
    pub(crate) fn descend(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(self.error_fatal(kind::NestingTooDeep))
        } else {
            Ok(())
        }
    }

    /// Leaves one level of nesting.
    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Attempts to parse a value of the given type, rolling the cursor back on failure.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Attempts to parse a value using the given function, rolling the cursor back on failure.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        let result = f(self);
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Attempts to parse a value of the given type, then validates it with the given predicate.
    /// The cursor is rolled back if either step fails.
    pub fn try_parse_then<T: Parse, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser<'source>) -> Result<(), Error>,
    {
        let start = self.cursor;
        let result = T::parse(self).and_then(|value| f(&value, self).map(|_| value));
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Parses a value of the given type, requiring the whole token stream to be consumed.
    ///
    /// If meaningful tokens remain after the value, the leftover token is reported with the most
    /// specific error kind available.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let result = self.try_parse::<T>()?;
        match self.next_token() {
            Err(_) => Ok(result),
            Ok(token) => Err(match token.kind {
                TokenKind::Unknown => Error::new_fatal(
                    vec![token.span],
                    kind::UnknownCharacter {
                        symbol: token.lexeme.to_owned(),
                    },
                ),
                TokenKind::CloseParen => {
                    Error::new_fatal(vec![token.span], kind::UnclosedParenthesis { opening: false })
                },
                _ => Error::new_fatal(vec![token.span], kind::ExpectedEof),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::binary::Binary;
    use super::expr::Expr;
    use super::literal::{LitNum, LitSym, Literal};
    use super::token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};
    use super::unary::Unary;

    use pretty_assertions::assert_eq;

    /// Parses the input to completion, panicking on failure.
    fn parse(input: &str) -> Expr {
        Parser::new(input).try_parse_full::<Expr>().unwrap()
    }

    /// Parses the input, expecting it to fail, and returns the error.
    fn parse_err(input: &str) -> Error {
        Parser::new(input).try_parse_full::<Expr>().unwrap_err()
    }

    /// Returns true if the error has the given kind.
    fn is_kind<T: 'static>(err: &Error) -> bool {
        err.kind.as_any().downcast_ref::<T>().is_some()
    }

    #[test]
    fn literal_int() {
        assert_eq!(
            parse("16"),
            Expr::Literal(Literal::Number(LitNum {
                value: 16.0,
                span: 0..2,
            }))
        );
    }

    #[test]
    fn literal_float() {
        assert_eq!(
            parse("3.14"),
            Expr::Literal(Literal::Number(LitNum {
                value: 3.14,
                span: 0..4,
            }))
        );
    }

    #[test]
    fn literal_scientific() {
        assert_eq!(
            parse("2.5e3"),
            Expr::Literal(Literal::Number(LitNum {
                value: 2500.0,
                span: 0..5,
            }))
        );
    }

    #[test]
    fn literal_symbol() {
        assert_eq!(
            parse("pi"),
            Expr::Literal(Literal::Symbol(LitSym {
                name: String::from("pi"),
                span: 0..2,
            }))
        );
    }

    #[test]
    fn binary_left_associativity() {
        assert_eq!(
            parse("3 * x * 5"),
            Expr::Binary(Binary {
                lhs: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 3.0,
                        span: 0..1,
                    }))),
                    op: BinOp {
                        kind: BinOpKind::Mul,
                        implicit: false,
                        span: 2..3,
                    },
                    rhs: Box::new(Expr::Literal(Literal::Symbol(LitSym {
                        name: String::from("x"),
                        span: 4..5,
                    }))),
                    span: 0..5,
                })),
                op: BinOp {
                    kind: BinOpKind::Mul,
                    implicit: false,
                    span: 6..7,
                },
                rhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                    value: 5.0,
                    span: 8..9,
                }))),
                span: 0..9,
            })
        );
    }

    #[test]
    fn binary_right_associativity() {
        assert_eq!(
            parse("2 ^ 3 ^ 2"),
            Expr::Binary(Binary {
                lhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                    value: 2.0,
                    span: 0..1,
                }))),
                op: BinOp {
                    kind: BinOpKind::Exp,
                    implicit: false,
                    span: 2..3,
                },
                rhs: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 3.0,
                        span: 4..5,
                    }))),
                    op: BinOp {
                        kind: BinOpKind::Exp,
                        implicit: false,
                        span: 6..7,
                    },
                    rhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 2.0,
                        span: 8..9,
                    }))),
                    span: 4..9,
                })),
                span: 0..9,
            })
        );
    }

    #[test]
    fn mixed_precedence() {
        let expected = Expr::binary(
            BinOpKind::Add,
            Expr::number(2.0),
            Expr::binary(BinOpKind::Mul, Expr::number(3.0), Expr::number(4.0)),
        );
        assert!(parse("2 + 3 * 4").strict_eq(&expected));
    }

    #[test]
    fn unary_binds_tighter_than_exp() {
        assert_eq!(
            parse("-2^2"),
            Expr::Binary(Binary {
                lhs: Box::new(Expr::Unary(Unary {
                    operand: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 2.0,
                        span: 1..2,
                    }))),
                    op: UnaryOp {
                        kind: UnaryOpKind::Neg,
                        span: 0..1,
                    },
                    span: 0..2,
                })),
                op: BinOp {
                    kind: BinOpKind::Exp,
                    implicit: false,
                    span: 2..3,
                },
                rhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                    value: 2.0,
                    span: 3..4,
                }))),
                span: 0..4,
            })
        );
    }

    #[test]
    fn prefix_sqrt_binds_tighter_than_exp() {
        // the radical sign is three bytes long, so the spans below are byte offsets
        let expected = Expr::binary(
            BinOpKind::Exp,
            Expr::unary(UnaryOpKind::Sqrt, Expr::number(9.0)),
            Expr::number(3.0),
        );
        let expr = parse("√9^3");
        assert!(expr.strict_eq(&expected));
        assert_eq!(expr.span(), 0..6);
    }

    #[test]
    fn postfix_factorial_nests() {
        assert_eq!(
            parse("3!!"),
            Expr::Unary(Unary {
                operand: Box::new(Expr::Unary(Unary {
                    operand: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 3.0,
                        span: 0..1,
                    }))),
                    op: UnaryOp {
                        kind: UnaryOpKind::Factorial,
                        span: 1..2,
                    },
                    span: 0..2,
                })),
                op: UnaryOp {
                    kind: UnaryOpKind::Factorial,
                    span: 2..3,
                },
                span: 0..3,
            })
        );
    }

    #[test]
    fn postfix_square_glyph() {
        let expected = Expr::unary(UnaryOpKind::Square, Expr::symbol("x"));
        assert!(parse("x²").strict_eq(&expected));
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(
            parse("2(3 + 4)"),
            Expr::Binary(Binary {
                lhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                    value: 2.0,
                    span: 0..1,
                }))),
                op: BinOp {
                    kind: BinOpKind::Mul,
                    implicit: true,
                    span: 1..1,
                },
                rhs: Box::new(Expr::Binary(Binary {
                    lhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 3.0,
                        span: 2..3,
                    }))),
                    op: BinOp {
                        kind: BinOpKind::Add,
                        implicit: false,
                        span: 4..5,
                    },
                    rhs: Box::new(Expr::Literal(Literal::Number(LitNum {
                        value: 4.0,
                        span: 6..7,
                    }))),
                    // the parentheses fold into the span of the inner expression
                    span: 1..8,
                })),
                span: 0..8,
            })
        );
    }

    #[test]
    fn implicit_multiplication_precedence() {
        // `4x^2` must parse as `4 * (x^2)`, not `(4x)^2`
        let expected = Expr::binary(
            BinOpKind::Add,
            Expr::binary(
                BinOpKind::Add,
                Expr::implicit_mul(
                    Expr::number(4.0),
                    Expr::binary(BinOpKind::Exp, Expr::symbol("x"), Expr::number(2.0)),
                ),
                Expr::implicit_mul(Expr::number(5.0), Expr::symbol("x")),
            ),
            Expr::number(1.0),
        );
        assert!(parse("4x^2 + 5x + 1").strict_eq(&expected));
    }

    #[test]
    fn implicit_multiplication_whitespace() {
        let expected = Expr::implicit_mul(Expr::number(3.0), Expr::symbol("x"));
        assert!(parse("3      x").strict_eq(&expected));
    }

    #[test]
    fn signs_in_sequence() {
        let expected = Expr::binary(
            BinOpKind::Sub,
            Expr::number(3.0),
            Expr::unary(UnaryOpKind::Neg, Expr::number(4.0)),
        );
        assert!(parse("3 - -4").strict_eq(&expected));
    }

    #[test]
    fn unicode_operators() {
        let expected = Expr::binary(
            BinOpKind::Mul,
            Expr::binary(BinOpKind::Div, Expr::number(10.0), Expr::number(2.0)),
            Expr::number(3.0),
        );
        assert!(parse("10 ÷ 2 × 3").strict_eq(&expected));
    }

    #[test]
    fn paren_span_widening() {
        let expr = parse("(x + 1)");
        assert_eq!(expr.span(), 0..7);
        assert!(matches!(&expr, Expr::Binary(binary) if binary.op.kind == BinOpKind::Add));
    }

    #[test]
    fn empty_parens() {
        let err = parse_err("()");
        assert!(is_kind::<kind::EmptyParenthesis>(&err));
        assert!(err.fatal);
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_err("(1 + 2");
        assert!(is_kind::<kind::UnclosedParenthesis>(&err));
    }

    #[test]
    fn unopened_paren() {
        let err = parse_err("1 + 2)");
        assert!(is_kind::<kind::UnclosedParenthesis>(&err));
    }

    #[test]
    fn trailing_operator() {
        let err = parse_err("10 +");
        assert!(is_kind::<kind::TrailingOperator>(&err));
        assert!(err.fatal);
    }

    #[test]
    fn trailing_operator_inside_parens() {
        let err = parse_err("(2 +)");
        assert!(is_kind::<kind::TrailingOperator>(&err));
    }

    #[test]
    fn doubled_operator() {
        let err = parse_err("2 + * 3");
        assert!(is_kind::<kind::UnexpectedOperator>(&err));
    }

    #[test]
    fn postfix_without_operand() {
        let err = parse_err("!5");
        assert!(is_kind::<kind::MissingOperand>(&err));
    }

    #[test]
    fn unknown_character() {
        let err = parse_err("2 $ 3");
        assert!(is_kind::<kind::UnknownCharacter>(&err));
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}x{}", "(".repeat(MAX_DEPTH + 8), ")".repeat(MAX_DEPTH + 8));
        let err = parse_err(&deep);
        assert!(is_kind::<kind::NestingTooDeep>(&err));

        let fine = format!("{}x{}", "(".repeat(MAX_DEPTH / 2), ")".repeat(MAX_DEPTH / 2));
        assert!(Parser::new(&fine).try_parse_full::<Expr>().is_ok());
    }

    #[test]
    fn empty_input() {
        let err = parse_err("");
        assert!(is_kind::<kind::UnexpectedEof>(&err));
    }
}
