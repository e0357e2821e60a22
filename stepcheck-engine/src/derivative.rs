//! Symbolic differentiation.

use crate::simplify::simplify;
use std::fmt;
use stepcheck_parser::parser::{
    expr::Expr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
};

/// The reasons symbolic differentiation can fail.
#[derive(Clone, Debug, PartialEq)]
pub enum DerivativeError {
    /// The expression may be differentiable, but no rule covers it.
    Unsupported(Expr),
}

impl fmt::Display for DerivativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivativeError::Unsupported(expr) => {
                write!(f, "cannot symbolically differentiate `{expr}`")
            },
        }
    }
}

impl std::error::Error for DerivativeError {}

/// Accumulates a sum of expressions, dropping terms that are trivially zero.
#[derive(Default)]
struct SumBuilder(Option<Expr>);

impl SumBuilder {
    fn add(&mut self, expr: Expr) {
        if expr.is_zero() {
            return;
        }
        self.0 = Some(match self.0.take() {
            Some(sum) => Expr::binary(BinOpKind::Add, sum, expr),
            None => expr,
        });
    }
}

impl From<SumBuilder> for Expr {
    fn from(builder: SumBuilder) -> Self {
        builder.0.unwrap_or_else(|| Expr::number(0.0))
    }
}

/// Accumulates a product of expressions, collapsing the whole product to zero if any factor is
/// trivially zero and dropping factors that are trivially one.
#[derive(Default)]
struct MultBuilder {
    factors: Option<Expr>,
    zero: bool,
}

impl MultBuilder {
    fn mult(&mut self, expr: Expr) {
        if self.zero || expr.is_zero() {
            self.zero = true;
            return;
        }
        if expr.is_one() {
            return;
        }
        self.factors = Some(match self.factors.take() {
            Some(product) => Expr::binary(BinOpKind::Mul, product, expr),
            None => expr,
        });
    }
}

impl From<MultBuilder> for Expr {
    fn from(builder: MultBuilder) -> Self {
        if builder.zero {
            Expr::number(0.0)
        } else {
            builder.factors.unwrap_or_else(|| Expr::number(1.0))
        }
    }
}

/// Computes the derivative of `expr` with respect to `var`.
///
/// The result is simplified before it is returned, so the derivative of `x^2` comes back as
/// `2x` rather than `1*2*x^1`.
pub fn derivative(expr: &Expr, var: &str) -> Result<Expr, DerivativeError> {
    let raw = differentiate(expr, var)?;
    Ok(simplify(&raw))
}

fn contains_var(expr: &Expr, var: &str) -> bool {
    expr.post_order_iter().any(|node| node.as_symbol() == Some(var))
}

fn differentiate(expr: &Expr, var: &str) -> Result<Expr, DerivativeError> {
    // anything the variable does not appear in is a constant
    if !contains_var(expr, var) {
        return Ok(Expr::number(0.0));
    }

    match expr {
        Expr::Literal(literal) => Ok(match literal {
            Literal::Number(_) => Expr::number(0.0),
            Literal::Symbol(sym) => {
                if sym.name == var {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            },
        }),
        Expr::Unary(unary) => {
            let inner = differentiate(&unary.operand, var)?;
            match unary.op.kind {
                UnaryOpKind::Pos => Ok(inner),
                UnaryOpKind::Neg => Ok(Expr::unary(UnaryOpKind::Neg, inner)),
                // (√u)' = u' / (2√u)
                UnaryOpKind::Sqrt => Ok(Expr::binary(
                    BinOpKind::Div,
                    inner,
                    Expr::binary(
                        BinOpKind::Mul,
                        Expr::number(2.0),
                        Expr::unary(UnaryOpKind::Sqrt, (*unary.operand).clone()),
                    ),
                )),
                // (u²)' = 2uu'
                UnaryOpKind::Square => {
                    let mut product = MultBuilder::default();
                    product.mult(Expr::number(2.0));
                    product.mult((*unary.operand).clone());
                    product.mult(inner);
                    Ok(product.into())
                },
                // (u³)' = 3u²u'
                UnaryOpKind::Cube => {
                    let mut product = MultBuilder::default();
                    product.mult(Expr::number(3.0));
                    product.mult(Expr::binary(
                        BinOpKind::Exp,
                        (*unary.operand).clone(),
                        Expr::number(2.0),
                    ));
                    product.mult(inner);
                    Ok(product.into())
                },
                UnaryOpKind::Factorial => Err(DerivativeError::Unsupported(expr.clone())),
            }
        },
        Expr::Binary(binary) => match binary.op.kind {
            BinOpKind::Add => {
                let mut sum = SumBuilder::default();
                sum.add(differentiate(&binary.lhs, var)?);
                sum.add(differentiate(&binary.rhs, var)?);
                Ok(sum.into())
            },
            BinOpKind::Sub => {
                let left = differentiate(&binary.lhs, var)?;
                let right = differentiate(&binary.rhs, var)?;
                if right.is_zero() {
                    Ok(left)
                } else if left.is_zero() {
                    Ok(Expr::unary(UnaryOpKind::Neg, right))
                } else {
                    Ok(Expr::binary(BinOpKind::Sub, left, right))
                }
            },
            // (fg)' = f'g + fg'
            BinOpKind::Mul => {
                let mut sum = SumBuilder::default();

                let mut left = MultBuilder::default();
                left.mult(differentiate(&binary.lhs, var)?);
                left.mult((*binary.rhs).clone());
                sum.add(left.into());

                let mut right = MultBuilder::default();
                right.mult((*binary.lhs).clone());
                right.mult(differentiate(&binary.rhs, var)?);
                sum.add(right.into());

                Ok(sum.into())
            },
            // (f/g)' = (f'g - fg') / g²
            BinOpKind::Div => {
                let mut left = MultBuilder::default();
                left.mult(differentiate(&binary.lhs, var)?);
                left.mult((*binary.rhs).clone());
                let left = Expr::from(left);

                let mut right = MultBuilder::default();
                right.mult((*binary.lhs).clone());
                right.mult(differentiate(&binary.rhs, var)?);
                let right = Expr::from(right);

                let numerator = if right.is_zero() {
                    left
                } else if left.is_zero() {
                    Expr::unary(UnaryOpKind::Neg, right)
                } else {
                    Expr::binary(BinOpKind::Sub, left, right)
                };

                Ok(Expr::binary(
                    BinOpKind::Div,
                    numerator,
                    Expr::binary(BinOpKind::Exp, (*binary.rhs).clone(), Expr::number(2.0)),
                ))
            },
            // (uⁿ)' = n·u^(n-1)·u', which also covers the plain power rule
            BinOpKind::Exp => {
                let Some(n) = binary.rhs.as_number() else {
                    return Err(DerivativeError::Unsupported(expr.clone()));
                };

                let mut product = MultBuilder::default();
                product.mult(Expr::number(n));
                product.mult(Expr::binary(
                    BinOpKind::Exp,
                    (*binary.lhs).clone(),
                    Expr::number(n - 1.0),
                ));
                product.mult(differentiate(&binary.lhs, var)?);
                Ok(product.into())
            },
            BinOpKind::Mod => Err(DerivativeError::Unsupported(expr.clone())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Bindings;
    use crate::eval::Eval;
    use stepcheck_parser::Parser;

    const DX: f64 = 0.00001;
    const TOL: f64 = 0.0001;

    fn parse(source: &str) -> Expr {
        let mut parser = Parser::new(source);
        parser.try_parse_full::<Expr>().unwrap()
    }

    /// Evaluates the expression with `x` bound to the given value.
    fn eval_x(expr: &Expr, x: f64) -> f64 {
        let mut bindings = Bindings::new();
        bindings.insert("x", x);
        expr.eval(&bindings).unwrap()
    }

    /// Approximates the derivative at `x` with a central finite difference.
    fn finite_difference(expr: &Expr, x: f64) -> f64 {
        (eval_x(expr, x + DX) - eval_x(expr, x - DX)) / (2.0 * DX)
    }

    /// Checks the symbolic derivative of `source` against a finite difference at each point.
    fn check_derivative(source: &'static str, points: impl IntoIterator<Item = f64>) {
        let expr = parse(source);
        let computed = derivative(&expr, "x").unwrap();

        for point in points {
            let symbolic = eval_x(&computed, point);
            let numeric = finite_difference(&expr, point);
            assert!(
                (symbolic - numeric).abs() < TOL,
                "d/dx {source} at x={point}: symbolic {symbolic}, finite difference {numeric}",
            );
        }
    }

    #[test]
    fn power_rule() {
        check_derivative("x^2 + x + 1", [0.0, 1.0, 2.0, 5.0, 8.0]);
    }

    #[test]
    fn product_rule() {
        check_derivative("x * (x + 3)", [0.0, 1.0, 4.0]);
    }

    #[test]
    fn quotient_rule() {
        check_derivative("(x + 1) / (x + 2)", [0.0, 1.0, 3.0]);
    }

    #[test]
    fn chain_rule_through_powers() {
        check_derivative("(2x + 1)^3", [0.0, 1.0, 2.0]);
        check_derivative("√(x^2 + 1)", [0.0, 1.0, 2.0]);
    }

    #[test]
    fn unicode_powers() {
        check_derivative("x² + x³", [1.0, 2.0, 3.0]);
    }

    #[test]
    fn constants_vanish() {
        assert!(derivative(&parse("2 pi"), "x").unwrap().is_zero());
        assert!(derivative(&parse("y^2"), "x").unwrap().is_zero());
    }

    #[test]
    fn canonical_power_rule_output() {
        let computed = derivative(&parse("x^2"), "x").unwrap();
        assert!(computed.strict_eq(&parse("2x")));

        let computed = derivative(&parse("x^3"), "x").unwrap();
        assert!(computed.strict_eq(&parse("3x^2")));
    }

    #[test]
    fn unsupported_forms() {
        assert_eq!(
            derivative(&parse("2^x"), "x"),
            Err(DerivativeError::Unsupported(parse("2^x"))),
        );
        assert!(derivative(&parse("x!"), "x").is_err());
    }
}
