//! Detectors for algebra mistakes.
//!
//! Each detector is given the parsed sides of a step already known to be wrong, checks
//! whether the left side has the shape its rule applies to, and computes the expected right
//! side by applying the rule correctly. Confidence is raised when the wrong answer matches
//! the rule's characteristic error shape, such as the undistributed trailing term of
//! `2(x + 3) = 2x + 3`.

use super::{Detection, MistakeKind};
use stepcheck_engine::equiv::check_equivalent_exprs;
use stepcheck_engine::simplify::simplify;
use stepcheck_engine::suggest::{
    combine_like_terms, distribute, literal_value, reduce_fraction, split_coefficient,
};
use stepcheck_parser::parser::{
    binary::Binary,
    expr::Expr,
    token::op::{BinOpKind, UnaryOpKind},
    unary::Unary,
};

/// Runs the algebra detectors in catalogue order and returns the first match.
pub(crate) fn detect(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    sign_error(lhs, rhs)
        .or_else(|| coefficient_error(lhs, rhs))
        .or_else(|| exponent_error(lhs, rhs))
        .or_else(|| distribution_error(lhs, rhs))
        .or_else(|| subtraction_distribution_error(lhs, rhs))
        .or_else(|| cancellation_error(lhs, rhs))
        .or_else(|| fraction_error(lhs, rhs))
}

fn equivalent(a: &Expr, b: &Expr) -> bool {
    check_equivalent_exprs(a, b).equivalent
}

/// The operands and operator of a sum or difference.
fn as_sum(expr: &Expr) -> Option<(&Expr, BinOpKind, &Expr)> {
    match expr {
        Expr::Binary(binary) if matches!(binary.op.kind, BinOpKind::Add | BinOpKind::Sub) => {
            Some((&binary.lhs, binary.op.kind, &binary.rhs))
        },
        _ => None,
    }
}

/// The numerator and denominator of a division.
fn as_fraction(expr: &Expr) -> Option<(&Expr, &Expr)> {
    match expr {
        Expr::Binary(binary) if binary.op.kind == BinOpKind::Div => {
            Some((&binary.lhs, &binary.rhs))
        },
        _ => None,
    }
}

/// A power with a known numeric exponent: `x^3` gives `(x, 3)`, `√x` gives `(x, 0.5)`.
pub(super) fn power_parts(expr: &Expr) -> Option<(Expr, f64)> {
    match expr {
        Expr::Binary(binary) if binary.op.kind == BinOpKind::Exp => {
            let exponent = literal_value(&binary.rhs)?;
            Some(((*binary.lhs).clone(), exponent))
        },
        Expr::Unary(unary) => match unary.op.kind {
            UnaryOpKind::Sqrt => Some(((*unary.operand).clone(), 0.5)),
            UnaryOpKind::Square => Some(((*unary.operand).clone(), 2.0)),
            UnaryOpKind::Cube => Some(((*unary.operand).clone(), 3.0)),
            _ => None,
        },
        _ => None,
    }
}

/// Like [`power_parts`], with exponent 1 as the fallback for non-powers.
fn factor_power(expr: &Expr) -> (Expr, f64) {
    power_parts(expr).unwrap_or_else(|| (expr.clone(), 1.0))
}

/// Fully distributes every product over every sum in the tree.
fn expand(expr: &Expr) -> Expr {
    let expr = match expr {
        Expr::Literal(_) => expr.clone(),
        Expr::Unary(unary) => Expr::Unary(Unary {
            operand: Box::new(expand(&unary.operand)),
            op: unary.op.clone(),
            span: unary.span.clone(),
        }),
        Expr::Binary(binary) => Expr::Binary(Binary {
            lhs: Box::new(expand(&binary.lhs)),
            op: binary.op.clone(),
            rhs: Box::new(expand(&binary.rhs)),
            span: binary.span.clone(),
        }),
    };

    match distribute(&expr, &mut ()) {
        Some(next) => expand(&next),
        None => expr,
    }
}

/// Expands every subtraction of a grouped sum, flipping the sign of each inner term, so
/// `a - (b + (c - d))` becomes `a - b - c + d`.
fn expand_subtraction(expr: &Expr) -> Expr {
    match expr {
        Expr::Binary(binary) if binary.op.kind == BinOpKind::Sub => {
            if let Some((first, op, second)) = as_sum(&binary.rhs) {
                let flipped = match op {
                    BinOpKind::Add => BinOpKind::Sub,
                    _ => BinOpKind::Add,
                };
                let inner = expand_subtraction(&Expr::binary(
                    BinOpKind::Sub,
                    (*binary.lhs).clone(),
                    first.clone(),
                ));
                return expand_subtraction(&Expr::binary(flipped, inner, second.clone()));
            }
            Expr::binary(
                BinOpKind::Sub,
                expand_subtraction(&binary.lhs),
                expand_subtraction(&binary.rhs),
            )
        },
        Expr::Binary(binary) => Expr::Binary(Binary {
            lhs: Box::new(expand_subtraction(&binary.lhs)),
            op: binary.op.clone(),
            rhs: Box::new(expand_subtraction(&binary.rhs)),
            span: binary.span.clone(),
        }),
        Expr::Unary(unary) => Expr::Unary(Unary {
            operand: Box::new(expand_subtraction(&unary.operand)),
            op: unary.op.clone(),
            span: unary.span.clone(),
        }),
        Expr::Literal(_) => expr.clone(),
    }
}

/// `a - b` rewritten as `b - a`.
fn sign_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let Expr::Binary(binary) = lhs else {
        return None;
    };
    if binary.op.kind != BinOpKind::Sub {
        return None;
    }

    let swapped = Expr::binary(
        BinOpKind::Sub,
        (*binary.rhs).clone(),
        (*binary.lhs).clone(),
    );
    if !equivalent(rhs, &swapped) {
        return None;
    }

    Some(Detection {
        kind: MistakeKind::SignError,
        confidence: 0.9,
        expected: simplify(lhs).to_string(),
        explanation: String::from(
            "subtraction is not commutative, so swapping the operands negates the result",
        ),
        suggestion: String::from("keep the operands of the subtraction in their original order"),
    })
}

/// Like terms combined with the wrong coefficient arithmetic, as in `2x + 3x = 6x`.
fn coefficient_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let Expr::Binary(binary) = lhs else {
        return None;
    };
    if !matches!(binary.op.kind, BinOpKind::Add | BinOpKind::Sub) {
        return None;
    }

    let (left, factor) = split_coefficient(&binary.lhs)?;
    let (right, other) = split_coefficient(&binary.rhs)?;
    if !factor.strict_eq(&other) {
        return None;
    }

    let subtract = binary.op.kind == BinOpKind::Sub;
    let correct = if subtract { left - right } else { left + right };
    let expected = combine_like_terms(lhs, &mut ())?;

    // multiplied coefficients are the signature error; any other mismatch on the same
    // variable part is still most likely bad coefficient arithmetic
    let confidence = match split_coefficient(rhs) {
        Some((found, part)) if part.strict_eq(&factor) && found == left * right => 0.9,
        Some((_, part)) if part.strict_eq(&factor) => 0.75,
        _ => 0.6,
    };

    Some(Detection {
        kind: MistakeKind::CoefficientError,
        confidence,
        expected: expected.to_string(),
        explanation: format!(
            "combining like terms {} the coefficients, and {} {} {} is {}",
            if subtract { "subtracts" } else { "adds" },
            left,
            if subtract { "minus" } else { "plus" },
            right,
            correct,
        ),
        suggestion: String::from("combine the coefficients and keep the variable part unchanged"),
    })
}

/// `x^a * x^b` collapsed by multiplying the exponents instead of adding them.
fn exponent_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let Expr::Binary(binary) = lhs else {
        return None;
    };
    if binary.op.kind != BinOpKind::Mul {
        return None;
    }

    let (base, exp_l) = factor_power(&binary.lhs);
    let (other, exp_r) = factor_power(&binary.rhs);
    if !base.strict_eq(&other) {
        return None;
    }
    // a numeric base makes the step plain arithmetic, not an exponent-law application
    if literal_value(&base).is_some() {
        return None;
    }

    let expected = simplify(&Expr::binary(
        BinOpKind::Exp,
        base.clone(),
        Expr::number(exp_l + exp_r),
    ));
    let confidence = match power_parts(rhs) {
        Some((found, exp)) if found.strict_eq(&base) && exp == exp_l * exp_r => 0.9,
        Some((found, _)) if found.strict_eq(&base) => 0.75,
        _ => 0.6,
    };

    Some(Detection {
        kind: MistakeKind::ExponentError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from(
            "multiplying powers of the same base adds the exponents rather than multiplying them",
        ),
        suggestion: format!("add the exponents: {} + {} = {}", exp_l, exp_r, exp_l + exp_r),
    })
}

/// A product distributed over only part of a sum, or a botched FOIL expansion.
fn distribution_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let Expr::Binary(binary) = lhs else {
        return None;
    };
    if binary.op.kind != BinOpKind::Mul {
        return None;
    }

    let left_sum = as_sum(&binary.lhs);
    let right_sum = as_sum(&binary.rhs);
    if left_sum.is_none() && right_sum.is_none() {
        return None;
    }

    let expected = simplify(&expand(lhs));

    // the catalogued wrong shapes leave one term of a sum undistributed, or drop the FOIL
    // cross terms
    let mut candidates = Vec::new();
    if let Some((first, op, second)) = right_sum {
        candidates.push(Expr::binary(
            op,
            Expr::implicit_mul((*binary.lhs).clone(), first.clone()),
            second.clone(),
        ));
    }
    if let Some((first, op, second)) = left_sum {
        candidates.push(Expr::binary(
            op,
            Expr::implicit_mul(first.clone(), (*binary.rhs).clone()),
            second.clone(),
        ));
    }
    if let (Some((a, op, b)), Some((c, _, d))) = (left_sum, right_sum) {
        candidates.push(Expr::binary(
            op,
            Expr::implicit_mul(a.clone(), c.clone()),
            Expr::implicit_mul(b.clone(), d.clone()),
        ));
    }

    let confidence = if candidates.iter().any(|candidate| equivalent(rhs, candidate)) {
        0.9
    } else {
        0.6
    };

    Some(Detection {
        kind: MistakeKind::DistributionError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from("multiplication distributes over every term of the sum"),
        suggestion: String::from("multiply the factor into each term inside the parentheses"),
    })
}

/// `a - (b + c)` expanded without flipping the sign of every inner term.
fn subtraction_distribution_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let Expr::Binary(binary) = lhs else {
        return None;
    };
    if binary.op.kind != BinOpKind::Sub {
        return None;
    }
    let (first, op, second) = as_sum(&binary.rhs)?;

    let expected = simplify(&expand_subtraction(lhs));

    // the signature error keeps the sign of the trailing term
    let unflipped = Expr::binary(
        op,
        Expr::binary(BinOpKind::Sub, (*binary.lhs).clone(), first.clone()),
        second.clone(),
    );
    let confidence = if equivalent(rhs, &unflipped) { 0.9 } else { 0.6 };

    Some(Detection {
        kind: MistakeKind::SubtractionDistributionError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from(
            "subtracting a group changes the sign of every term inside it",
        ),
        suggestion: String::from("flip the sign of each term inside the parentheses"),
    })
}

/// A term of a sum cancelled against a denominator that does not divide the whole
/// numerator, as in `(x + 3)/3 = x`.
fn cancellation_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let (numerator, denominator) = as_fraction(lhs)?;
    let (first, op, second) = as_sum(numerator)?;

    // only shapes the invalid-cancellation catalogue recognizes are reported; any other
    // wrong quotient is out of scope for this detector
    let mut candidates = vec![
        Expr::binary(
            op,
            Expr::binary(BinOpKind::Div, first.clone(), denominator.clone()),
            second.clone(),
        ),
        Expr::binary(
            op,
            first.clone(),
            Expr::binary(BinOpKind::Div, second.clone(), denominator.clone()),
        ),
    ];
    if second.strict_eq(denominator) {
        candidates.push(first.clone());
    }
    if first.strict_eq(denominator) {
        candidates.push(second.clone());
    }
    if !candidates.iter().any(|candidate| equivalent(rhs, candidate)) {
        return None;
    }

    let expected = simplify(&Expr::binary(
        op,
        Expr::binary(BinOpKind::Div, first.clone(), denominator.clone()),
        Expr::binary(BinOpKind::Div, second.clone(), denominator.clone()),
    ));

    Some(Detection {
        kind: MistakeKind::CancellationError,
        confidence: 0.85,
        expected: expected.to_string(),
        explanation: String::from(
            "a denominator cancels only against a factor of the whole numerator, not a single term",
        ),
        suggestion: String::from("divide every term of the numerator by the denominator"),
    })
}

/// `a/b + c/d` combined without a common denominator.
fn fraction_error(lhs: &Expr, rhs: &Expr) -> Option<Detection> {
    let Expr::Binary(binary) = lhs else {
        return None;
    };
    let op = match binary.op.kind {
        BinOpKind::Add | BinOpKind::Sub => binary.op.kind,
        _ => return None,
    };
    let (a, b) = as_fraction(&binary.lhs)?;
    let (c, d) = as_fraction(&binary.rhs)?;

    // fold the numerator and denominator separately so numeric answers stay fractions
    // instead of collapsing to a decimal
    let expected = if b.strict_eq(d) {
        let numerator = simplify(&Expr::binary(op, a.clone(), c.clone()));
        let fraction = Expr::binary(BinOpKind::Div, numerator, b.clone());
        reduce_fraction(&fraction, &mut ()).unwrap_or(fraction)
    } else {
        let numerator = simplify(&Expr::binary(
            op,
            Expr::implicit_mul(a.clone(), d.clone()),
            Expr::implicit_mul(c.clone(), b.clone()),
        ));
        let denominator = simplify(&Expr::implicit_mul(b.clone(), d.clone()));
        let fraction = Expr::binary(BinOpKind::Div, numerator, denominator);
        reduce_fraction(&fraction, &mut ()).unwrap_or(fraction)
    };

    // numerators and denominators combined straight across
    let straight = Expr::binary(
        BinOpKind::Div,
        Expr::binary(op, a.clone(), c.clone()),
        Expr::binary(op, b.clone(), d.clone()),
    );
    let confidence = if equivalent(rhs, &straight) { 0.9 } else { 0.6 };

    Some(Detection {
        kind: MistakeKind::FractionError,
        confidence,
        expected: expected.to_string(),
        explanation: String::from(
            "fractions combine over a common denominator; combining numerators and denominators straight across changes the value",
        ),
        suggestion: String::from("rewrite both fractions over the product of the denominators"),
    })
}
