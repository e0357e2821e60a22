//! All the possible errors that can occur while parsing an expression.

use ariadne::Fmt;
use stepcheck_attrs::ErrorKind;
use stepcheck_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// A character that is not part of the expression grammar.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unrecognized character `{}`", symbol.fg(EXPR)),
    labels = ["this character"],
    help = "only numbers, variable names, operators, and parentheses can appear in an expression"
)]
pub struct UnknownCharacter {
    /// The character that was not recognized.
    pub symbol: String,
}

/// The parser reached the end of the input while it still expected something.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = [format!("expected another {} here", "expression".fg(EXPR))]
)]
pub struct UnexpectedEof;

/// The parser finished an expression, but meaningful tokens remain.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of expression",
    labels = ["could not parse this"],
    help = "the expression before this point is already complete; remove this, or join it with an operator"
)]
pub struct ExpectedEof;

/// The parser expected one kind of token, but found another. This error is always recoverable,
/// so it is only ever shown when nothing else in the grammar matches either.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected one of {:?}, found {:?}", expected, found),
    labels = ["this token"]
)]
pub struct UnexpectedToken {
    /// The kinds of tokens that were expected.
    pub expected: &'static [TokenKind],

    /// The kind of token that was found.
    pub found: TokenKind,
}

/// A binary operator in a position where an operand was expected, such as the `*` in `2 + * 3`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected operator",
    labels = ["this operator cannot appear here"],
    help = "expected a value in this position"
)]
pub struct UnexpectedOperator;

/// An operator with nothing after it to act on, such as the `+` in `10 +`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "trailing operator",
    labels = ["this operator is missing an operand"],
    help = "add a value after this operator, or remove it"
)]
pub struct TrailingOperator;

/// A parenthesis without a matching counterpart.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = [if *opening {
        "this parenthesis was never closed"
    } else {
        "this parenthesis was never opened"
    }],
    help = "add the matching parenthesis"
)]
pub struct UnclosedParenthesis {
    /// True if the unmatched parenthesis is an opening parenthesis.
    pub opening: bool,
}

/// A parenthesized group with nothing inside it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty parentheses",
    labels = ["there is nothing inside these parentheses"],
    help = "put an expression inside the parentheses, or remove them"
)]
pub struct EmptyParenthesis;

/// An operator that never received its operand.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing operand",
    labels = [if *postfix {
        "this operator has no operand on its left"
    } else {
        "expected a value here"
    }],
    help = if *postfix {
        "postfix operators such as `!` apply to the value before them"
    } else {
        "operators need a value to act on"
    }
)]
pub struct MissingOperand {
    /// True if the operand was missing before a postfix operator, rather than after a prefix or
    /// binary operator.
    pub postfix: bool,
}

/// The expression nests deeper than the parser supports.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is nested too deeply",
    labels = ["this is nested too deeply to parse"],
    help = format!("expressions can nest at most {} levels deep", crate::parser::MAX_DEPTH.fg(EXPR))
)]
pub struct NestingTooDeep;

/// An error that cannot be directly created by the user; it is used to signal to the parser that
/// it should try parsing something else, and will never be displayed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "non-fatal error", labels = [""])]
pub struct NonFatal;
