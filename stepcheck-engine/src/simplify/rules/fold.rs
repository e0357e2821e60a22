//! Constant folding.

use super::number_spanned;
use crate::bindings::Bindings;
use crate::eval::Eval;
use crate::simplify::step::Step;
use crate::step_collector::StepCollector;
use stepcheck_parser::parser::{expr::Expr, token::op::BinOpKind};

/// Folds an operation whose operands are all literal numbers into a single literal.
///
/// Folding reuses the evaluator, so an operation with no finite real value, such as `1/0`,
/// `√-1` or `171!`, simply does not fold; evaluating it later still produces the typed error.
pub fn fold_constants(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    match expr {
        Expr::Literal(_) => return None,
        Expr::Unary(unary) => {
            unary.operand.as_number()?;
        },
        Expr::Binary(binary) => {
            binary.lhs.as_number()?;
            binary.rhs.as_number()?;

            // `0^0` is indeterminate; leave it in the tree so the caller can flag it
            if binary.op.kind == BinOpKind::Exp && binary.lhs.is_zero() && binary.rhs.is_zero() {
                return None;
            }
        },
    }

    let value = expr.eval(&Bindings::new()).ok()?;
    step_collector.push(Step::ConstantFolding);
    Some(number_spanned(value, expr.span()))
}

/// Applies all constant-folding rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    fold_constants(expr, step_collector)
}
