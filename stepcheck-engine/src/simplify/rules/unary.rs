//! Simplification rules for unary operators.

use super::do_unary;
use crate::simplify::step::Step;
use crate::step_collector::StepCollector;
use stepcheck_parser::parser::{expr::Expr, token::op::UnaryOpKind};

/// `--a = a`
pub fn double_negation(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_unary(expr, UnaryOpKind::Neg, |operand| {
        if let Expr::Unary(inner) = operand {
            if inner.op.kind == UnaryOpKind::Neg {
                return Some((*inner.operand).clone());
            }
        }

        None
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::DoubleNegation);
    Some(opt)
}

/// `+a = a`
pub fn unary_plus(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_unary(expr, UnaryOpKind::Pos, |operand| Some(operand.clone()))?;

    step_collector.push(Step::UnaryPlus);
    Some(opt)
}

/// Applies all unary rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    double_negation(expr, step_collector).or_else(|| unary_plus(expr, step_collector))
}
