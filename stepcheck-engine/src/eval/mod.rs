//! Numeric evaluation of expressions.
//!
//! Evaluation walks the expression tree, computing every node as an [`f64`]. Conditions that
//! ordinary floating point arithmetic would silently absorb, such as division by zero or a
//! negative number under a square root, are reported as typed errors instead of `NaN` or
//! infinity, with spans pointing back into the offending part of the source.

mod binary;
mod literal;
mod unary;

use crate::bindings::Bindings;
use crate::error::Error;
use stepcheck_parser::parser::expr::Expr;

/// Any type that can be evaluated to produce a value.
pub trait Eval {
    /// Evaluates the expression to produce a value, looking up variables in the given bindings.
    fn eval(&self, bindings: &Bindings) -> Result<f64, Error>;

    /// Evaluates the expression using only the default bindings, which contain the constants
    /// `pi`, `e`, and `tau`.
    fn eval_default(&self) -> Result<f64, Error> {
        self.eval(&Bindings::new())
    }
}

impl Eval for Expr {
    fn eval(&self, bindings: &Bindings) -> Result<f64, Error> {
        match self {
            Expr::Literal(literal) => literal.eval(bindings),
            Expr::Unary(unary) => unary.eval(bindings),
            Expr::Binary(binary) => binary.eval(bindings),
        }
    }
}

/// Eval tests depend on the parser, so ensure that parser tests pass before running these.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind;
    use pretty_assertions::assert_eq;
    use std::f64::consts::TAU;
    use stepcheck_error::ErrorKind;
    use stepcheck_parser::Parser;

    /// Parses the source and evaluates it with the default bindings.
    fn eval(source: &str) -> Result<f64, Error> {
        let mut parser = Parser::new(source);
        let expr = parser.try_parse_full::<Expr>().unwrap();
        expr.eval_default()
    }

    /// Returns true if the error has the given kind.
    fn is_kind<T: 'static>(err: &Error) -> bool {
        err.kind.as_any().downcast_ref::<T>().is_some()
    }

    #[test]
    fn binary_expr() {
        assert_eq!(eval("1 + 2").unwrap(), 3.0);
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
    }

    #[test]
    fn right_associative_exp() {
        assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), 512.0);
    }

    #[test]
    fn negation_binds_tighter_than_exp() {
        assert_eq!(eval("-2^2").unwrap(), 4.0);
    }

    #[test]
    fn unicode_operators() {
        assert_eq!(eval("2 · 3").unwrap(), 6.0);
        assert_eq!(eval("10 ÷ 4").unwrap(), 2.5);
        assert_eq!(eval("√9").unwrap(), 3.0);
        assert_eq!(eval("3²").unwrap(), 9.0);
        assert_eq!(eval("2³").unwrap(), 8.0);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(eval("2e3").unwrap(), 2000.0);
        assert_eq!(eval("1.5e-2").unwrap(), 0.015);
    }

    #[test]
    fn constants() {
        assert_eq!(eval("2 pi").unwrap(), TAU);
    }

    #[test]
    fn factorial() {
        assert_eq!(eval("5!").unwrap(), 120.0);
        assert_eq!(eval("0!").unwrap(), 1.0);
    }

    #[test]
    fn remainder() {
        assert_eq!(eval("10 % 3").unwrap(), 1.0);
        assert_eq!(eval("7 % 2.5").unwrap(), 2.0);
    }

    #[test]
    fn zero_to_the_zero() {
        assert_eq!(eval("0 ^ 0").unwrap(), 1.0);
    }

    #[test]
    fn division_by_zero() {
        let err = eval("10 / 0").unwrap_err();
        assert!(is_kind::<kind::DivisionByZero>(&err));
    }

    #[test]
    fn division_by_zero_spans() {
        let err = eval("1 / (2 - 2)").unwrap_err();
        assert!(is_kind::<kind::DivisionByZero>(&err));
        assert_eq!(err.spans, vec![0..1, 2..3, 4..11]);
    }

    #[test]
    fn modulo_by_zero() {
        let err = eval("10 % 0").unwrap_err();
        assert!(is_kind::<kind::ModuloByZero>(&err));
    }

    #[test]
    fn negative_root() {
        let err = eval("√-4").unwrap_err();
        assert!(is_kind::<kind::NegativeRoot>(&err));
    }

    #[test]
    fn non_real_power() {
        let err = eval("(-8) ^ 0.5").unwrap_err();
        assert!(is_kind::<kind::NonRealPower>(&err));
    }

    #[test]
    fn factorial_domain() {
        let err = eval("(-1)!").unwrap_err();
        assert!(is_kind::<kind::FactorialDomain>(&err));

        let err = eval("2.5!").unwrap_err();
        assert!(is_kind::<kind::FactorialDomain>(&err));
    }

    #[test]
    fn overflow() {
        let err = eval("171!").unwrap_err();
        assert!(is_kind::<kind::Overflow>(&err));

        let err = eval("10 ^ 400").unwrap_err();
        assert!(is_kind::<kind::Overflow>(&err));
    }

    #[test]
    fn unbound_variable() {
        let err = eval("foo + 1").unwrap_err();
        let kind = err
            .kind
            .as_any()
            .downcast_ref::<kind::UnboundVariable>()
            .unwrap();
        assert_eq!(kind.name, "foo");
        assert!(kind.suggestions.is_empty());
    }

    #[test]
    fn suggests_similar_names() {
        let mut bindings = Bindings::new();
        bindings.insert("radius", 5.0);

        let mut parser = Parser::new("2 pi radias");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        let err = expr.eval(&bindings).unwrap_err();

        let kind = err
            .kind
            .as_any()
            .downcast_ref::<kind::UnboundVariable>()
            .unwrap();
        assert_eq!(kind.name, "radias");
        assert_eq!(kind.suggestions, vec!["radius"]);
    }

    #[test]
    fn bound_variables() {
        let mut bindings = Bindings::new();
        bindings.insert("x", 3.0);

        let mut parser = Parser::new("4x^2 + 5x + 1");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.eval(&bindings).unwrap(), 52.0);
    }
}
