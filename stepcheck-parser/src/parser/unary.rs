use super::{
    error::{kind, Error},
    expr::{parse_primary, Expr},
    token::op::UnaryOp,
    Parser,
};
use crate::tokenizer::TokenKind;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary operation applied to an operand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the operation.
    pub operand: Box<Expr>,

    /// The operator.
    pub op: UnaryOp,

    /// The region of the source string that this operation originated from.
    pub span: Range<usize>,
}

impl Unary {
    /// Parses a unary expression, or anything that binds tighter.
    ///
    /// Prefix operators bind tighter than every binary operator, so the operand of a prefix
    /// operator is another unary expression, never a binary one: `-2^2` parses as `(-2)^2`.
    /// Postfix operators stack left-associatively after the primary expression.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if let Ok(op) = input.try_parse_with_fn(UnaryOp::parse_prefix) {
            input.descend()?;
            let operand = match Self::parse_or_lower(input) {
                Ok(operand) => operand,
                Err(err) if err.fatal => return Err(err),
                Err(_) => return Err(prefix_operand_error(input, &op)),
            };
            input.ascend();

            let span = op.span.start..operand.span().end;
            return Ok(Expr::Unary(Unary {
                operand: Box::new(operand),
                op,
                span,
            }));
        }

        let mut expr = parse_primary(input)?;
        while let Ok(op) = input.try_parse_with_fn(UnaryOp::parse_postfix) {
            let span = expr.span().start..op.span.end;
            expr = Expr::Unary(Unary {
                operand: Box::new(expr),
                op,
                span,
            });
        }
        Ok(expr)
    }
}

/// Picks the most precise fatal error for a prefix operator whose operand failed to parse.
fn prefix_operand_error(input: &Parser, op: &UnaryOp) -> Error {
    match input.clone().next_token() {
        Ok(token) if token.kind == TokenKind::Unknown => Error::new_fatal(
            vec![token.span.clone()],
            kind::UnknownCharacter {
                symbol: token.lexeme.to_owned(),
            },
        ),
        Ok(token) if token.is_binary_operator() => {
            Error::new_fatal(vec![token.span], kind::UnexpectedOperator)
        },
        Ok(token) => Error::new_fatal(vec![token.span], kind::MissingOperand { postfix: false }),
        Err(_) => Error::new_fatal(vec![op.span.clone()], kind::TrailingOperator),
    }
}
