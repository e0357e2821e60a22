//! Parse targets for single tokens.
//!
//! Each token kind gets a small struct that implements [`Parse`] by matching exactly one token
//! of that kind, recording its span. These are the leaves of the grammar.

pub mod op;

use super::{
    error::{kind, Error},
    Parse, Parser,
};
use crate::tokenizer::TokenKind;
use std::ops::Range;

macro_rules! token_kinds {
    ($($(#[$attr:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Debug, PartialEq, Eq)]
            pub struct $name {
                /// The region of the source string that this token originated from.
                pub span: Range<usize>,
            }

            impl Parse for $name {
                fn parse(input: &mut Parser) -> Result<Self, Error> {
                    let token = input.next_token()?;
                    if token.kind == TokenKind::$name {
                        Ok(Self { span: token.span })
                    } else {
                        Err(Error::new(
                            vec![token.span],
                            kind::UnexpectedToken {
                                expected: &[TokenKind::$name],
                                found: token.kind,
                            },
                        ))
                    }
                }
            }
        )*
    };
}

token_kinds!(
    /// The `+` operator.
    Add,
    /// The `-` operator.
    Sub,
    /// The `*` operator.
    Mul,
    /// The `/` operator.
    Div,
    /// The `%` operator.
    Mod,
    /// The `^` operator.
    Exp,
    /// The `√` operator.
    Sqrt,
    /// The postfix `²` operator.
    Square,
    /// The postfix `³` operator.
    Cube,
    /// The postfix `!` operator.
    Factorial,
    /// A variable or constant name.
    Name,
    /// An opening parenthesis.
    OpenParen,
    /// A closing parenthesis.
    CloseParen,
    /// An integer literal.
    Int,
    /// A floating-point literal.
    Float,
);
