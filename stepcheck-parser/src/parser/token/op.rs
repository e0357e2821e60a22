//! Binary and unary operators, with their precedence and associativity.

use super::super::{
    error::{kind, Error},
    Associativity, Parse, Parser, Precedence,
};
use crate::tokenizer::TokenKind;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a unary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    /// A leading `+`, which leaves its operand unchanged.
    Pos,

    /// Negation.
    Neg,

    /// Square root, written `√` or `sqrt`.
    Sqrt,

    /// The postfix `²` operator.
    Square,

    /// The postfix `³` operator.
    Cube,

    /// The postfix `!` operator.
    Factorial,
}

impl UnaryOpKind {
    /// The precedence of this operator. Every unary operator shares the tightest tier.
    pub fn precedence(&self) -> Precedence {
        Precedence::Unary
    }

    /// The associativity of this operator. Prefix operators are right-associative; postfix
    /// operators are left-associative.
    pub fn associativity(&self) -> Associativity {
        match self {
            UnaryOpKind::Pos | UnaryOpKind::Neg | UnaryOpKind::Sqrt => Associativity::Right,
            UnaryOpKind::Square | UnaryOpKind::Cube | UnaryOpKind::Factorial => {
                Associativity::Left
            },
        }
    }
}

/// A unary operator that appeared in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of operator.
    pub kind: UnaryOpKind,

    /// The region of the source string that this operator originated from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// The precedence of this operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// The associativity of this operator.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }

    /// Parses a prefix operator: a sign in operand position, or a radical.
    ///
    /// Sign tokens are only accepted here when the tokenizer classified them as prefix signs;
    /// see [`Token::prefix_sign`](crate::tokenizer::Token::prefix_sign).
    pub fn parse_prefix(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Add if token.prefix_sign => UnaryOpKind::Pos,
            TokenKind::Sub if token.prefix_sign => UnaryOpKind::Neg,
            TokenKind::Sqrt => UnaryOpKind::Sqrt,
            _ => {
                return Err(Error::new(
                    vec![token.span],
                    kind::UnexpectedToken {
                        expected: &[TokenKind::Add, TokenKind::Sub, TokenKind::Sqrt],
                        found: token.kind,
                    },
                ))
            },
        };
        Ok(Self {
            kind,
            span: token.span,
        })
    }

    /// Parses a postfix operator.
    pub fn parse_postfix(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Square => UnaryOpKind::Square,
            TokenKind::Cube => UnaryOpKind::Cube,
            TokenKind::Factorial => UnaryOpKind::Factorial,
            _ => {
                return Err(Error::new(
                    vec![token.span],
                    kind::UnexpectedToken {
                        expected: &[TokenKind::Square, TokenKind::Cube, TokenKind::Factorial],
                        found: token.kind,
                    },
                ))
            },
        };
        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

/// The kind of a binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    /// Exponentiation.
    Exp,

    /// Multiplication.
    Mul,

    /// Division.
    Div,

    /// Remainder.
    Mod,

    /// Addition.
    Add,

    /// Subtraction.
    Sub,
}

impl BinOpKind {
    /// The precedence of this operator.
    pub fn precedence(&self) -> Precedence {
        match self {
            BinOpKind::Exp => Precedence::Exp,
            BinOpKind::Mul | BinOpKind::Div | BinOpKind::Mod => Precedence::Factor,
            BinOpKind::Add | BinOpKind::Sub => Precedence::Term,
        }
    }

    /// The associativity of this operator.
    pub fn associativity(&self) -> Associativity {
        match self {
            BinOpKind::Exp => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// The canonical ASCII spelling of this operator.
    pub fn surface(&self) -> &'static str {
        match self {
            BinOpKind::Exp => "^",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Mod => "%",
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
        }
    }

    /// The Unicode spelling of this operator, falling back to the ASCII spelling for operators
    /// that only have one form.
    pub fn surface_unicode(&self) -> &'static str {
        match self {
            BinOpKind::Mul => "·",
            BinOpKind::Div => "÷",
            BinOpKind::Sub => "−",
            other => other.surface(),
        }
    }
}

/// A binary operator that appeared in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of operator.
    pub kind: BinOpKind,

    /// True if this operator was implied by adjacency, as in `2x` or `3(x + 1)`, rather than
    /// written out. Implicit operators have an empty span at the boundary between the operands.
    pub implicit: bool,

    /// The region of the source string that this operator originated from.
    pub span: Range<usize>,
}

impl BinOp {
    /// The precedence of this operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// The associativity of this operator.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Exp => BinOpKind::Exp,
            TokenKind::Mul => BinOpKind::Mul,
            TokenKind::Div => BinOpKind::Div,
            TokenKind::Mod => BinOpKind::Mod,
            TokenKind::Add if !token.prefix_sign => BinOpKind::Add,
            TokenKind::Sub if !token.prefix_sign => BinOpKind::Sub,
            _ => {
                return Err(Error::new(
                    vec![token.span],
                    kind::UnexpectedToken {
                        expected: &[
                            TokenKind::Exp,
                            TokenKind::Mul,
                            TokenKind::Div,
                            TokenKind::Mod,
                            TokenKind::Add,
                            TokenKind::Sub,
                        ],
                        found: token.kind,
                    },
                ))
            },
        };
        Ok(Self {
            kind,
            implicit: false,
            span: token.span,
        })
    }
}
