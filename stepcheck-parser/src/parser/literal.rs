use super::{
    error::{kind, Error},
    Parse, Parser,
};
use crate::tokenizer::TokenKind;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A numeric literal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNum {
    /// The value of the literal.
    pub value: f64,

    /// The region of the source string that this literal originated from.
    pub span: Range<usize>,
}

/// A symbol literal: a variable, or a named constant such as `pi`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source string that this literal originated from.
    pub span: Range<usize>,
}

/// Represents a literal value in an expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// A numeric literal.
    Number(LitNum),

    /// A symbol literal.
    Symbol(LitSym),
}

impl Literal {
    /// The region of the source string that this literal originated from.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Int | TokenKind::Float => Ok(Literal::Number(LitNum {
                // the number patterns only admit valid floating-point syntax
                value: token.lexeme.parse().unwrap(),
                span: token.span,
            })),
            TokenKind::Name => Ok(Literal::Symbol(LitSym {
                name: token.lexeme.to_owned(),
                span: token.span,
            })),
            _ => Err(Error::new(
                vec![token.span],
                kind::UnexpectedToken {
                    expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name],
                    found: token.kind,
                },
            )),
        }
    }
}
