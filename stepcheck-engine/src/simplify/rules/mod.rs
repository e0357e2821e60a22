//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the simplified expression if the rule applies, or `None` if the
//! rule does not apply. Rules only inspect the node they are given; [`simplify`] applies them to
//! every node of the tree.
//!
//! [`simplify`]: crate::simplify::simplify

pub mod add;
pub mod fold;
pub mod multiply;
pub mod power;
pub mod unary;

use super::step::Step;
use crate::step_collector::StepCollector;
use std::ops::Range;
use stepcheck_parser::parser::{
    expr::Expr,
    literal::{LitNum, Literal},
    token::op::{BinOpKind, UnaryOpKind},
};

/// If the expression is a binary operation of the given kind, calls the given transformation
/// function with the two operands.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_binary(
    expr: &Expr,
    kind: BinOpKind,
    f: impl Copy + Fn(&Expr, &Expr) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Binary(binary) = expr {
        if binary.op.kind == kind {
            return f(&binary.lhs, &binary.rhs);
        }
    }

    None
}

/// If the expression is a unary operation of the given kind, calls the given transformation
/// function with the operand.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_unary(
    expr: &Expr,
    kind: UnaryOpKind,
    f: impl Copy + Fn(&Expr) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Unary(unary) = expr {
        if unary.op.kind == kind {
            return f(&unary.operand);
        }
    }

    None
}

/// Creates a number literal carrying the span of the expression it replaces, so diagnostics on
/// the simplified tree still point back into the source.
pub(crate) fn number_spanned(value: f64, span: Range<usize>) -> Expr {
    Expr::Literal(Literal::Number(LitNum { value, span }))
}

/// Applies all rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add::all(expr, step_collector)
        .or_else(|| multiply::all(expr, step_collector))
        .or_else(|| power::all(expr, step_collector))
        .or_else(|| unary::all(expr, step_collector))
        .or_else(|| fold::all(expr, step_collector))
}
