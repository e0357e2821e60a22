use logos::Logos;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{OpEntry, OPERATORS};

/// The different kinds of tokens that can be produced by the tokenizer.
///
/// Several operators accept multiple spellings; the Unicode forms lex to the same kind as their
/// ASCII counterparts, so the parser never has to care which one appeared in the source.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    #[token("−")]
    Sub,

    #[token("*")]
    #[token("·")]
    #[token("×")]
    Mul,

    #[token("/")]
    #[token("÷")]
    Div,

    #[token("%")]
    Mod,

    #[token("^")]
    Exp,

    #[token("√")]
    #[token("sqrt")]
    Sqrt,

    #[token("²")]
    Square,

    #[token("³")]
    Cube,

    #[token("!")]
    Factorial,

    #[regex(r"[a-zA-Z_]+")]
    Name,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r"[0-9]+\.?")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*")]
    #[regex(r"[0-9]+(\.[0-9]+)?[eE][+-]?[0-9]+")]
    Float,

    /// Any character no other pattern matches. The tokenizer reports these as errors but keeps
    /// scanning so that one stray character does not hide everything after it.
    #[regex(r".", priority = 0)]
    Unknown,
}

impl TokenKind {
    /// Returns true if this token is whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// Returns true if a token of this kind can end an operand, meaning a `+` or `-` directly
    /// after it must be the binary operator rather than a sign.
    pub(crate) fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Name
                | TokenKind::CloseParen
                | TokenKind::Square
                | TokenKind::Cube
                | TokenKind::Factorial
        )
    }
}

/// A token produced by the tokenizer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token<'source> {
    /// The region of the source string that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,

    /// True if this token is a `+` or `-` that appears in operand position, where it acts as a
    /// prefix sign instead of a binary operator. Assigned by [`tokenize`](super::tokenize) after
    /// the raw scan.
    pub prefix_sign: bool,
}

impl<'source> Token<'source> {
    /// The operator descriptor for this token's lexeme, if the lexeme spells an operator.
    pub fn op_entry(&self) -> Option<&'static OpEntry> {
        OPERATORS.get(self.lexeme)
    }

    /// Returns true if this token acts as a binary operator in its current position. Sign
    /// tokens that were classified as prefixes do not count.
    pub fn is_binary_operator(&self) -> bool {
        match self.kind {
            TokenKind::Exp | TokenKind::Mul | TokenKind::Div | TokenKind::Mod => true,
            TokenKind::Add | TokenKind::Sub => !self.prefix_sign,
            _ => false,
        }
    }
}
