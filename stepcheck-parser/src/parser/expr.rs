use super::{
    binary::Binary,
    error::{kind, Error},
    iter::ExprIter,
    literal::{LitNum, LitSym, Literal},
    token::{
        op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind},
        CloseParen, OpenParen,
    },
    unary::Unary,
    Parse, Parser, Precedence,
};
use crate::tokenizer::TokenKind;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a general expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A unary operation applied to an operand.
    Unary(Unary),

    /// A binary operation applied to two operands.
    Binary(Binary),
}

impl Expr {
    /// The region of the source string that this expression originated from.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Unary(unary) => unary.span.clone(),
            Expr::Binary(binary) => binary.span.clone(),
        }
    }

    /// Replaces the span of this expression, returning the modified expression. Used to widen an
    /// expression's span over the parentheses that enclosed it.
    pub(crate) fn with_span(mut self, span: Range<usize>) -> Self {
        match &mut self {
            Expr::Literal(Literal::Number(num)) => num.span = span,
            Expr::Literal(Literal::Symbol(sym)) => sym.span = span,
            Expr::Unary(unary) => unary.span = span,
            Expr::Binary(binary) => binary.span = span,
        }
        self
    }

    /// Returns an iterator that visits every node of this expression in left-to-right
    /// post-order.
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Structural equality, ignoring spans and ignoring whether multiplications were written
    /// out or implied.
    pub fn strict_eq(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Literal(Literal::Number(a)), Expr::Literal(Literal::Number(b))) => {
                a.value == b.value
            },
            (Expr::Literal(Literal::Symbol(a)), Expr::Literal(Literal::Symbol(b))) => {
                a.name == b.name
            },
            (Expr::Unary(a), Expr::Unary(b)) => {
                a.op.kind == b.op.kind && a.operand.strict_eq(&b.operand)
            },
            (Expr::Binary(a), Expr::Binary(b)) => {
                a.op.kind == b.op.kind && a.lhs.strict_eq(&b.lhs) && a.rhs.strict_eq(&b.rhs)
            },
            _ => false,
        }
    }

    /// If this expression is a number literal, returns its value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Literal(Literal::Number(num)) => Some(num.value),
            _ => None,
        }
    }

    /// If this expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Literal(Literal::Symbol(sym)) => Some(&sym.name),
            _ => None,
        }
    }

    /// Returns true if this expression is the number literal `0`.
    pub fn is_zero(&self) -> bool {
        self.as_number() == Some(0.0)
    }

    /// Returns true if this expression is the number literal `1`.
    pub fn is_one(&self) -> bool {
        self.as_number() == Some(1.0)
    }

    /// Creates a number literal expression.
    ///
    /// Constructed expressions carry empty synthetic spans; they are meant for building
    /// replacement trees, not for error reporting.
    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Number(LitNum { value, span: 0..0 }))
    }

    /// Creates a symbol literal expression with a synthetic span.
    pub fn symbol(name: &str) -> Self {
        Expr::Literal(Literal::Symbol(LitSym {
            name: name.to_owned(),
            span: 0..0,
        }))
    }

    /// Creates a unary expression wrapping the given operand.
    pub fn unary(kind: UnaryOpKind, operand: Expr) -> Self {
        let span = operand.span();
        Expr::Unary(Unary {
            operand: Box::new(operand),
            op: UnaryOp { kind, span: 0..0 },
            span,
        })
    }

    /// Creates a binary expression joining the given operands.
    pub fn binary(kind: BinOpKind, lhs: Expr, rhs: Expr) -> Self {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp {
                kind,
                implicit: false,
                span: 0..0,
            },
            rhs: Box::new(rhs),
            span,
        })
    }

    /// Creates an implicit multiplication, which the formatter renders as juxtaposition where
    /// it can (`2x` rather than `2 * x`).
    pub fn implicit_mul(lhs: Expr, rhs: Expr) -> Self {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: 0..0,
            },
            rhs: Box::new(rhs),
            span,
        })
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        // catch tokens that can never start an expression, with a precise error for each
        let mut ahead = input.clone();
        if let Ok(token) = ahead.next_token() {
            match token.kind {
                TokenKind::Square | TokenKind::Cube | TokenKind::Factorial => {
                    return Err(Error::new_fatal(
                        vec![token.span],
                        kind::MissingOperand { postfix: true },
                    ));
                },
                TokenKind::CloseParen => {
                    return Err(Error::new_fatal(
                        vec![token.span],
                        kind::UnclosedParenthesis { opening: false },
                    ));
                },
                _ => {},
            }
        }

        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

/// Parses a primary expression: a literal, or a parenthesized group.
pub(crate) fn parse_primary(input: &mut Parser) -> Result<Expr, Error> {
    match input.try_parse::<Literal>() {
        Ok(literal) => Ok(Expr::Literal(literal)),
        Err(err) if err.fatal => Err(err),
        Err(_) => parse_paren(input),
    }
}

/// Parses a parenthesized group. The parentheses do not get a node of their own; the inner
/// expression's span is widened to cover them instead.
fn parse_paren(input: &mut Parser) -> Result<Expr, Error> {
    let open = input.try_parse::<OpenParen>()?;
    if let Ok(close) = input.clone().try_parse::<CloseParen>() {
        return Err(Error::new_fatal(
            vec![open.span.start..close.span.end],
            kind::EmptyParenthesis,
        ));
    }

    input.descend()?;
    let expr = match input.try_parse::<Expr>() {
        Ok(expr) => expr,
        Err(err) if err.fatal => return Err(err),
        Err(_) => return Err(group_error(input, &open)),
    };
    input.ascend();

    match input.try_parse::<CloseParen>() {
        Ok(close) => Ok(expr.with_span(open.span.start..close.span.end)),
        Err(err) if err.fatal => Err(err),
        Err(_) => Err(close_error(input, &open)),
    }
}

/// Picks the most precise fatal error for a group whose contents failed to parse.
fn group_error(input: &Parser, open: &OpenParen) -> Error {
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
        Err(_) => Error::new_fatal(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true },
        ),
    }
}

/// Picks the most precise fatal error for a group that was never closed.
fn close_error(input: &Parser, open: &OpenParen) -> Error {
    match input.clone().next_token() {
        Ok(token) if token.kind == TokenKind::Unknown => Error::new_fatal(
            vec![token.span.clone()],
            kind::UnknownCharacter {
                symbol: token.lexeme.to_owned(),
            },
        ),
        _ => Error::new_fatal(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true },
        ),
    }
}
