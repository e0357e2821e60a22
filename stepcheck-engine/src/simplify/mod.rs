//! Rule-based simplification of expressions.
//!
//! Simplification applies a fixed set of rewrite rules to every node of the tree, bottom-up,
//! and repeats the whole pass until no rule fires anywhere. Each rule strictly shrinks the
//! tree, so the fixed point is always reached. The rules cover identity elimination, absorbing
//! zeros, exponent identities, self-cancellation, double negation, and constant folding; see
//! [`rules`] for the full set.
//!
//! The indeterminate form `0^0` is deliberately never folded. It survives simplification
//! untouched, and [`contains_indeterminate`] lets callers report such a result as not fully
//! simplified instead of silently resolving it.

pub mod rules;
pub mod step;

pub use step::Step;

use crate::step_collector::StepCollector;
use stepcheck_parser::parser::{binary::Binary, expr::Expr, token::op::BinOpKind, unary::Unary};

/// Simplifies an expression, discarding the steps taken to do so.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_with(expr, &mut ())
}

/// Simplifies an expression, returning the applied rules alongside the result.
pub fn simplify_with_steps(expr: &Expr) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let result = simplify_with(expr, &mut steps);
    (result, steps)
}

/// Simplifies an expression with the given step collector, iterating until no rule applies
/// anywhere in the tree.
pub fn simplify_with(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    let mut expr = expr.clone();
    loop {
        let (next, changed) = simplify_pass(&expr, step_collector);
        expr = next;
        if !changed {
            return expr;
        }
    }
}

/// Runs one bottom-up pass over the tree, applying rules at every node.
fn simplify_pass(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> (Expr, bool) {
    let (mut expr, mut changed) = match expr {
        Expr::Literal(_) => (expr.clone(), false),
        Expr::Unary(unary) => {
            let (operand, changed) = simplify_pass(&unary.operand, step_collector);
            let rebuilt = Expr::Unary(Unary {
                operand: Box::new(operand),
                op: unary.op.clone(),
                span: unary.span.clone(),
            });
            (rebuilt, changed)
        },
        Expr::Binary(binary) => {
            let (lhs, lhs_changed) = simplify_pass(&binary.lhs, step_collector);
            let (rhs, rhs_changed) = simplify_pass(&binary.rhs, step_collector);
            let rebuilt = Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op: binary.op.clone(),
                rhs: Box::new(rhs),
                span: binary.span.clone(),
            });
            (rebuilt, lhs_changed || rhs_changed)
        },
    };

    while let Some(next) = rules::all(&expr, step_collector) {
        expr = next;
        changed = true;
    }

    (expr, changed)
}

/// Returns true if the expression contains the indeterminate form `0^0`, which simplification
/// deliberately leaves in place.
pub fn contains_indeterminate(expr: &Expr) -> bool {
    expr.post_order_iter().any(|node| {
        if let Expr::Binary(binary) = node {
            binary.op.kind == BinOpKind::Exp && binary.lhs.is_zero() && binary.rhs.is_zero()
        } else {
            false
        }
    })
}
