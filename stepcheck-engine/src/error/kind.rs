//! All the possible errors that can occur while evaluating an expression.

use ariadne::Fmt;
use stepcheck_attrs::ErrorKind;
use stepcheck_error::{ErrorKind, EXPR};

/// A variable with no bound value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not defined", name),
    labels = ["this variable"],
    help = if suggestions.is_empty() {
        "bind a value to this variable before evaluating".to_string()
    } else if suggestions.len() == 1 {
        format!("did you mean `{}`?", (&*suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these? {}",
            suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UnboundVariable {
    /// The name of the variable that has no value.
    pub name: String,

    /// Bound names close enough to the unbound name to plausibly be what was meant.
    pub suggestions: Vec<String>,
}

/// The right side of a division evaluated to zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot divide by zero",
    labels = ["this expression", "", "this evaluates to zero"]
)]
pub struct DivisionByZero;

/// The right side of a remainder operation evaluated to zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot take the remainder of a division by zero",
    labels = ["this expression", "", "this evaluates to zero"]
)]
pub struct ModuloByZero;

/// The operand of a square root evaluated to a negative number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot take the square root of a negative number",
    labels = [
        format!("this evaluates to `{}`", operand),
        "this operator".to_string(),
    ],
    help = "the result would not be a real number"
)]
pub struct NegativeRoot {
    /// The value the operand evaluated to.
    pub operand: f64,
}

/// A negative number raised to a fractional power, which has no real value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "this power has no real value",
    labels = [
        format!("this evaluates to `{}`", base),
        "".to_string(),
        format!("this evaluates to `{}`", exponent),
    ],
    help = "raising a negative number to a fractional power produces a complex number"
)]
pub struct NonRealPower {
    /// The value the base evaluated to.
    pub base: f64,

    /// The value the exponent evaluated to.
    pub exponent: f64,
}

/// The result of an operation is too large to represent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "evaluation overflowed",
    labels = ["the value of this expression is too large to represent"],
    help = "results must fit in a 64-bit floating point number"
)]
pub struct Overflow;

/// The operand of a factorial evaluated to a negative or fractional number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot take the factorial of this value",
    labels = [
        format!("this evaluates to `{}`", operand),
        "this operator".to_string(),
    ],
    help = "the factorial is only defined for non-negative integers"
)]
pub struct FactorialDomain {
    /// The value the operand evaluated to.
    pub operand: f64,
}
