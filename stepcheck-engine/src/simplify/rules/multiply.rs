//! Simplification rules for multiplication and division.

use super::{do_binary, number_spanned};
use crate::simplify::step::Step;
use crate::step_collector::StepCollector;
use stepcheck_parser::parser::{expr::Expr, token::op::BinOpKind};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Mul, |lhs, rhs| {
        if lhs.is_zero() || rhs.is_zero() {
            Some(number_spanned(0.0, expr.span()))
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Mul, |lhs, rhs| {
        if lhs.is_one() {
            Some(rhs.clone())
        } else if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// `a/1 = a`
pub fn divide_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Div, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::DivideOne);
    Some(opt)
}

/// `a/a = 1`
///
/// `0/0` is indeterminate and is left untouched.
pub fn cancel_division(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Div, |lhs, rhs| {
        if lhs.strict_eq(rhs) && !lhs.is_zero() {
            Some(number_spanned(1.0, expr.span()))
        } else {
            None
        }
    })?;

    step_collector.push(Step::CancelDivision);
    Some(opt)
}

/// `0/a = 0`
///
/// `0/0` is indeterminate and is left untouched.
pub fn zero_numerator(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Div, |lhs, rhs| {
        if lhs.is_zero() && !rhs.is_zero() {
            Some(number_spanned(0.0, expr.span()))
        } else {
            None
        }
    })?;

    step_collector.push(Step::ZeroNumerator);
    Some(opt)
}

/// Applies all multiplication rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    multiply_zero(expr, step_collector)
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| divide_one(expr, step_collector))
        .or_else(|| cancel_division(expr, step_collector))
        .or_else(|| zero_numerator(expr, step_collector))
}
