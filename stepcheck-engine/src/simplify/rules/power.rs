//! Simplification rules for exponentiation.

use super::{do_binary, number_spanned};
use crate::simplify::step::Step;
use crate::step_collector::StepCollector;
use stepcheck_parser::parser::{expr::Expr, token::op::BinOpKind};

/// `a^0 = 1`
///
/// `0^0` is indeterminate and is left untouched; the simplified tree keeps it so callers can
/// flag the result as not fully simplified.
pub fn power_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Exp, |lhs, rhs| {
        if rhs.is_zero() && !lhs.is_zero() {
            Some(number_spanned(1.0, expr.span()))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Exp, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `1^a = 1`
///
/// Together with the bottom-up pass this also collapses nested powers of one, since the base of
/// `(1^x)^y` reduces to `1` before the outer power is examined.
pub fn one_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Exp, |lhs, _| {
        if lhs.is_one() {
            Some(number_spanned(1.0, expr.span()))
        } else {
            None
        }
    })?;

    step_collector.push(Step::OnePower);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    power_zero(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| one_power(expr, step_collector))
}
