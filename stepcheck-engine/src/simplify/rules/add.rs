//! Simplification rules for addition and subtraction.

use super::{do_binary, number_spanned};
use crate::simplify::step::Step;
use crate::step_collector::StepCollector;
use stepcheck_parser::parser::{expr::Expr, token::op::BinOpKind};

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Add, |lhs, rhs| {
        if lhs.is_zero() {
            Some(rhs.clone())
        } else if rhs.is_zero() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::AddZero);
    Some(opt)
}

/// `a-0 = a`
pub fn subtract_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Sub, |lhs, rhs| {
        if rhs.is_zero() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::SubtractZero);
    Some(opt)
}

/// `a-a = 0`
pub fn cancel_subtraction(
    expr: &Expr,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Sub, |lhs, rhs| {
        if lhs.strict_eq(rhs) {
            Some(number_spanned(0.0, expr.span()))
        } else {
            None
        }
    })?;

    step_collector.push(Step::CancelSubtraction);
    Some(opt)
}

/// Applies all addition rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add_zero(expr, step_collector)
        .or_else(|| subtract_zero(expr, step_collector))
        .or_else(|| cancel_subtraction(expr, step_collector))
}
