//! Detectors for calculus mistakes.
//!
//! These run when a step's left side uses `d/dx(...)` notation and the claimed derivative is
//! wrong. Each detector reconstructs the answer a specific misapplied rule would produce and
//! compares it against what the student wrote; `expected` always carries the true
//! derivative, computed by the engine.

use super::{algebra::power_parts, Detection, MistakeKind};
use stepcheck_engine::derivative::derivative;
use stepcheck_engine::equiv::{check_equivalent_exprs, free_variables};
use stepcheck_parser::parser::{expr::Expr, token::op::BinOpKind};

/// Runs the calculus detectors in catalogue order and returns the first match.
///
/// `inner` is the expression under the `d/d{var}`, and `expected` its true derivative.
pub(crate) fn detect(
    inner: &Expr,
    var: &str,
    expected: &Expr,
    rhs: &Expr,
) -> Option<Detection> {
    product_rule_error(inner, var, expected, rhs)
        .or_else(|| chain_rule_error(inner, var, expected, rhs))
        .or_else(|| power_rule_error(inner, var, expected, rhs))
}

/// The derivative of a product computed as the product of the derivatives.
fn product_rule_error(
    inner: &Expr,
    var: &str,
    expected: &Expr,
    rhs: &Expr,
) -> Option<Detection> {
    let Expr::Binary(binary) = inner else {
        return None;
    };
    if binary.op.kind != BinOpKind::Mul {
        return None;
    }

    // with a constant factor the constant-multiple rule applies, not the product rule
    if !free_variables(&binary.lhs).contains(var) || !free_variables(&binary.rhs).contains(var) {
        return None;
    }

    let confidence = match (derivative(&binary.lhs, var), derivative(&binary.rhs, var)) {
        (Ok(df), Ok(dg))
            if check_equivalent_exprs(rhs, &Expr::implicit_mul(df.clone(), dg.clone())).equivalent =>
        {
            0.9
        },
        _ => 0.6,
    };

    Some(Detection {
        kind: MistakeKind::ProductRuleError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from(
            "the product rule is f'g + fg', not the product of the derivatives",
        ),
        suggestion: String::from("differentiate each factor in turn and add the two products"),
    })
}

/// A composite's derivative missing the inner-derivative factor.
fn chain_rule_error(inner: &Expr, var: &str, expected: &Expr, rhs: &Expr) -> Option<Detection> {
    let (base, exponent) = power_parts(inner)?;
    // a power of the bare variable is power-rule territory
    if base.as_symbol().is_some() {
        return None;
    }
    if !free_variables(&base).contains(var) {
        return None;
    }

    let outer_only = Expr::implicit_mul(
        Expr::number(exponent),
        Expr::binary(BinOpKind::Exp, base.clone(), Expr::number(exponent - 1.0)),
    );
    let confidence = if check_equivalent_exprs(rhs, &outer_only).equivalent {
        0.9
    } else {
        0.6
    };

    Some(Detection {
        kind: MistakeKind::ChainRuleError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from(
            "the chain rule multiplies the outer derivative by the derivative of the inner expression",
        ),
        suggestion: format!(
            "multiply by the derivative of the inner expression with respect to {}",
            var,
        ),
    })
}

/// `d/dx(x^n)` missing the coefficient or the exponent decrement.
fn power_rule_error(inner: &Expr, var: &str, expected: &Expr, rhs: &Expr) -> Option<Detection> {
    let (base, exponent) = power_parts(inner)?;
    if base.as_symbol() != Some(var) {
        return None;
    }

    let missing_coefficient =
        Expr::binary(BinOpKind::Exp, base.clone(), Expr::number(exponent - 1.0));
    let missing_decrement = Expr::implicit_mul(
        Expr::number(exponent),
        Expr::binary(BinOpKind::Exp, base.clone(), Expr::number(exponent)),
    );
    let matched = check_equivalent_exprs(rhs, &missing_coefficient).equivalent
        || check_equivalent_exprs(rhs, &missing_decrement).equivalent;
    let confidence = if matched { 0.9 } else { 0.6 };

    Some(Detection {
        kind: MistakeKind::PowerRuleError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from(
            "the power rule brings the exponent down as a coefficient and lowers it by one",
        ),
        suggestion: String::from("multiply by the old exponent and subtract one from it"),
    })
}
