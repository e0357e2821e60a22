use super::{
    error::{kind, Error},
    expr::Expr,
    token::op::{BinOp, BinOpKind},
    unary::Unary,
    Associativity, Parser, Precedence,
};
use crate::tokenizer::TokenKind;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operation between two operands.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the operation.
    pub lhs: Box<Expr>,

    /// The operator.
    pub op: BinOp,

    /// The right-hand side of the operation.
    pub rhs: Box<Expr>,

    /// The region of the source string that this operation originated from.
    pub span: Range<usize>,
}

impl Binary {
    /// Parses the operator chain continuing the given left-hand side. `precedence` is the
    /// loosest precedence this call is still allowed to consume; the loop ends when the next
    /// operator binds more loosely than that.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        loop {
            let mut input_ahead = input.clone();
            if let Ok(op) = input_ahead.try_parse_then::<BinOp, _>(|op, input| {
                if op.precedence() >= precedence {
                    Ok(())
                } else {
                    Err(input.error(kind::NonFatal))
                }
            }) {
                input.set_cursor(&input_ahead);
                let rhs = Self::parse_rhs(input, &op)?;
                lhs = Self::complete_rhs(input, lhs, op, rhs)?;
            } else if precedence <= Precedence::Factor {
                // no operator the current context can consume; check for implicit
                // multiplication, but only if the parse stopped because there is no operator at
                // all, not because the next operator binds too loosely
                if input_ahead.try_parse::<BinOp>().is_ok() {
                    break;
                }
                let rhs = match input.try_parse_with_fn(Unary::parse_or_lower) {
                    Ok(rhs) => rhs,
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => break,
                };

                let boundary = lhs.span().end;
                let op = BinOp {
                    kind: BinOpKind::Mul,
                    implicit: true,
                    span: boundary..boundary,
                };
                lhs = Self::complete_rhs(input, lhs, op, rhs)?;
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    /// Parses the operand that must follow a just-consumed operator, mapping failures to
    /// precise fatal errors.
    fn parse_rhs(input: &mut Parser, op: &BinOp) -> Result<Expr, Error> {
        match input.try_parse_with_fn(Unary::parse_or_lower) {
            Ok(rhs) => Ok(rhs),
            Err(err) if err.fatal => Err(err),
            Err(_) => Err(match input.clone().next_token() {
                Ok(token) if token.kind == TokenKind::Unknown => Error::new_fatal(
                    vec![token.span.clone()],
                    kind::UnknownCharacter {
                        symbol: token.lexeme.to_owned(),
                    },
                ),
                Ok(token) if token.is_binary_operator() => {
                    Error::new_fatal(vec![token.span], kind::UnexpectedOperator)
                },
                _ => Error::new_fatal(vec![op.span.clone()], kind::TrailingOperator),
            }),
        }
    }

    /// Finishes the right-hand side of an operation, consuming anything that binds tighter
    /// than the operator itself: `x^2 y` parses as `(x^2) * y`, while `2 x^3` parses as
    /// `2 * (x^3)`.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOp,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();
        loop {
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                // the next operator steals the current rhs as its lhs if it binds tighter, or
                // ties with a right-associative operator
                if next_op.precedence() > precedence
                    || (next_op.precedence() == precedence
                        && next_op.associativity() == Associativity::Right)
                {
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
                } else {
                    break;
                }
            } else if precedence >= Precedence::Factor {
                break;
            } else {
                // implicit multiplication binds at the factor tier, so it can still extend the
                // rhs of a looser operation, as in the `2x` of `1 + 2x`
                let next = match input.try_parse_with_fn(Unary::parse_or_lower) {
                    Ok(next) => next,
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => break,
                };

                let boundary = rhs.span().end;
                let implicit = BinOp {
                    kind: BinOpKind::Mul,
                    implicit: true,
                    span: boundary..boundary,
                };
                rhs = Self::complete_rhs(input, rhs, implicit, next)?;
            }
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Expr::Binary(Self {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }))
    }
}
