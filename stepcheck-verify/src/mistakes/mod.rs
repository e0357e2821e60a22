//! Detection of catalogued algebra and calculus mistakes.
//!
//! Where the verifier in the crate root only says *that* a step is wrong, this module tries
//! to say *why*: each entry in the catalogue pairs a detection predicate ("does the wrong
//! answer look like this rule misapplied?") with the value the rule actually produces. A
//! match yields a [`MistakeRecord`] carrying the expected expression, an explanation of the
//! rule, and a corrected restatement of the whole step.
//!
//! Detection runs on every step independently of chain continuity, and skips steps that are
//! actually correct, so it can annotate a derivation without first verifying it.

mod algebra;
mod calculus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{derivative_notation, DerivationStep};
use stepcheck_engine::derivative::derivative;
use stepcheck_engine::equiv::check_equivalent_exprs;
use stepcheck_parser::parse_expression;

/// The rule a mistaken step misapplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MistakeKind {
    /// `a - b` rewritten as `b - a`.
    SignError,

    /// Like terms combined with the wrong coefficient arithmetic.
    CoefficientError,

    /// `x^a * x^b` collapsed by multiplying the exponents instead of adding them.
    ExponentError,

    /// A product distributed over only part of a sum, or a miscomputed FOIL expansion.
    DistributionError,

    /// `a - (b + c)` expanded without flipping the sign of every inner term.
    SubtractionDistributionError,

    /// A term of a sum cancelled against a denominator that does not divide the whole
    /// numerator.
    CancellationError,

    /// `d/dx(x^n)` missing the coefficient or the exponent decrement.
    PowerRuleError,

    /// A composite's derivative missing the inner-derivative factor.
    ChainRuleError,

    /// A product's derivative computed as the product of the derivatives.
    ProductRuleError,

    /// Fractions added without a common denominator.
    FractionError,
}

impl MistakeKind {
    /// A stable snake_case tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            MistakeKind::SignError => "sign_error",
            MistakeKind::CoefficientError => "coefficient_error",
            MistakeKind::ExponentError => "exponent_error",
            MistakeKind::DistributionError => "distribution_error",
            MistakeKind::SubtractionDistributionError => "subtraction_distribution_error",
            MistakeKind::CancellationError => "cancellation_error",
            MistakeKind::PowerRuleError => "power_rule_error",
            MistakeKind::ChainRuleError => "chain_rule_error",
            MistakeKind::ProductRuleError => "product_rule_error",
            MistakeKind::FractionError => "fraction_error",
        }
    }
}

/// One detected mistake.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MistakeRecord {
    /// The rule that was misapplied.
    pub kind: MistakeKind,

    /// 1-based index of the offending step.
    pub step: usize,

    /// How confident the detector is that this specific rule was the culprit, in `0..=1`.
    /// High confidence means the wrong answer matches the rule's characteristic error shape
    /// exactly, not merely that the step is wrong.
    pub confidence: f64,

    /// What the step's right side should have been.
    pub expected: String,

    /// What the step's right side actually was.
    pub found: String,

    /// What the misapplied rule actually says.
    pub explanation: String,

    /// A short hint for fixing the step.
    pub suggestion: String,

    /// The corrected step, written out as `lhs = expected`.
    pub suggested_fix: String,
}

/// The result of scanning a derivation for catalogued mistakes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MistakeReport {
    /// True when at least one mistake was detected.
    pub has_mistakes: bool,

    /// Every detected mistake, in step order.
    pub mistakes: Vec<MistakeRecord>,

    /// A one-line summary of the findings.
    pub summary: String,
}

/// A catalogue match before it is tied to a step.
pub(crate) struct Detection {
    pub kind: MistakeKind,
    pub confidence: f64,
    pub expected: String,
    pub explanation: String,
    pub suggestion: String,
}

/// Scans each step of a derivation against the mistake catalogue.
///
/// Correct steps are skipped; for wrong steps, at most one mistake (the first catalogue
/// entry whose shape matches) is reported per step.
pub fn detect_common_mistakes(steps: &[DerivationStep]) -> MistakeReport {
    let mistakes: Vec<_> = steps
        .iter()
        .enumerate()
        .filter_map(|(index, step)| detect_step(step, index + 1))
        .collect();

    let summary = if mistakes.is_empty() {
        String::from("no catalogued mistakes detected")
    } else {
        let tags: Vec<_> = mistakes
            .iter()
            .map(|mistake| mistake.kind.tag())
            .collect();
        format!(
            "{} catalogued mistake{} detected: {}",
            mistakes.len(),
            if mistakes.len() == 1 { "" } else { "s" },
            tags.join(", "),
        )
    };

    MistakeReport {
        has_mistakes: !mistakes.is_empty(),
        mistakes,
        summary,
    }
}

/// Splits free-form derivation text into steps, then scans them for mistakes.
pub fn detect_common_mistakes_in_text(text: &str) -> MistakeReport {
    detect_common_mistakes(&crate::split::split_steps(text))
}

fn detect_step(step: &DerivationStep, number: usize) -> Option<MistakeRecord> {
    let lhs_text = step.lhs.trim();

    if let Some((var, inner_text)) = derivative_notation(lhs_text) {
        let inner = parse_expression(inner_text.trim()).ok()?;
        let rhs = parse_expression(step.rhs.trim()).ok()?;
        let Ok(expected) = derivative(&inner, &var) else {
            return None;
        };
        if check_equivalent_exprs(&expected, &rhs).equivalent {
            return None;
        }

        let detection = calculus::detect(&inner, &var, &expected, &rhs)?;
        let lhs_display = format!("d/d{}({})", var, inner);
        return Some(MistakeRecord {
            kind: detection.kind,
            step: number,
            confidence: detection.confidence,
            suggested_fix: format!("{} = {}", lhs_display, detection.expected),
            expected: detection.expected,
            found: rhs.to_string(),
            explanation: detection.explanation,
            suggestion: detection.suggestion,
        });
    }

    let lhs = parse_expression(lhs_text).ok()?;
    let rhs = parse_expression(step.rhs.trim()).ok()?;
    if check_equivalent_exprs(&lhs, &rhs).equivalent {
        return None;
    }

    let detection = algebra::detect(&lhs, &rhs)?;
    Some(MistakeRecord {
        kind: detection.kind,
        step: number,
        confidence: detection.confidence,
        suggested_fix: format!("{} = {}", lhs, detection.expected),
        expected: detection.expected,
        found: rhs.to_string(),
        explanation: detection.explanation,
        suggestion: detection.suggestion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(lhs: &str, rhs: &str) -> MistakeReport {
        detect_common_mistakes(&[DerivationStep::new(lhs, rhs)])
    }

    #[test]
    fn coefficient_error_on_like_terms() {
        let report = single("2x+3x", "6x");
        assert!(report.has_mistakes);
        assert_eq!(report.mistakes.len(), 1);

        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::CoefficientError);
        assert_eq!(mistake.step, 1);
        assert_eq!(mistake.expected, "5x");
        assert_eq!(mistake.found, "6x");
        assert_eq!(mistake.suggested_fix, "2x + 3x = 5x");
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn exponent_error_on_multiplied_powers() {
        let report = single("x^2*x^3", "x^6");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::ExponentError);
        assert!(mistake.expected.contains('5'));
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn sign_error_on_swapped_subtraction() {
        let report = single("x - 3", "3 - x");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::SignError);
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn subtraction_distribution_error() {
        let report = single("x - (y + z)", "x - y + z");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::SubtractionDistributionError);
        assert_eq!(mistake.expected, "x - y - z");
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn partial_distribution_error() {
        let report = single("2(x + 3)", "2x + 3");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::DistributionError);
        assert_eq!(mistake.expected, "2x + 6");
        assert_eq!(mistake.suggested_fix, "2(x + 3) = 2x + 6");
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn cancellation_error_on_partial_cancel() {
        let report = single("(x + 3)/3", "x");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::CancellationError);
        assert_eq!(mistake.expected, "x / 3 + 1");
        assert_eq!(mistake.confidence, 0.85);
    }

    #[test]
    fn fraction_error_on_straight_across_addition() {
        let report = single("1/2 + 1/3", "2/5");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::FractionError);
        assert_eq!(mistake.expected, "5 / 6");
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn power_rule_error_on_missing_coefficient() {
        let report = single("d/dx(x^3)", "x^2");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::PowerRuleError);
        assert_eq!(mistake.confidence, 0.9);
        assert!(mistake.suggested_fix.starts_with("d/dx(x^3) = "));
    }

    #[test]
    fn chain_rule_error_on_missing_inner_derivative() {
        let report = single("d/dx((2x + 1)^3)", "3(2x + 1)^2");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::ChainRuleError);
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn product_rule_error_on_multiplied_derivatives() {
        let report = single("d/dx(x(x + 3))", "1");
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::ProductRuleError);
        assert_eq!(mistake.confidence, 0.9);
    }

    #[test]
    fn correct_steps_are_skipped() {
        let report = single("2x + 3x", "5x");
        assert!(!report.has_mistakes);
        assert_eq!(report.mistakes, Vec::new());
        assert_eq!(report.summary, "no catalogued mistakes detected");
    }

    #[test]
    fn text_wrapper_reports_step_numbers() {
        let report = detect_common_mistakes_in_text("2x + 3x = 6x, then 6x - x = 4x");
        assert!(report.has_mistakes);
        assert_eq!(report.mistakes.len(), 2);
        assert_eq!(report.mistakes[0].step, 1);
        assert_eq!(report.mistakes[1].step, 2);
        assert!(report
            .mistakes
            .iter()
            .all(|mistake| mistake.kind == MistakeKind::CoefficientError));
        assert_eq!(
            report.summary,
            "2 catalogued mistakes detected: coefficient_error, coefficient_error",
        );
    }
}
