//! Verification of multi-step algebraic derivations.
//!
//! A derivation is an ordered chain of `lhs = rhs` claims. Verification checks each step for
//! algebraic validity (lhs ≡ rhs, decided by the engine's equivalence oracle) and each
//! adjacent pair for continuity: a step's left side must follow from the previous step's
//! right side, so the chain reads as one derivation rather than a list of unrelated
//! identities.
//!
//! A side written as `d/dx(...)` is resolved through the engine's derivative module before
//! comparison, so calculus chains such as `d/dx(x^3) = 3x^2` verify without the equivalence
//! oracle knowing anything about derivatives.
//!
//! The [`mistakes`] module annotates wrong steps with the algebra rule they misapplied, and
//! [`latex`] typesets a chain for display. [`split`] turns free-form text like
//! `2x + 3x = 5x, then 5x - x = 4x` into structured steps.

pub mod latex;
pub mod mistakes;
pub mod split;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};
use stepcheck_engine::derivative::derivative;
use stepcheck_engine::equiv::{check_equivalent_exprs, Equivalence};
use stepcheck_parser::parse_expression;
use stepcheck_parser::parser::expr::Expr;

/// One claimed equality in a derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivationStep {
    /// The left side, as written.
    pub lhs: String,

    /// The right side, as written.
    pub rhs: String,
}

impl DerivationStep {
    /// Creates a step from its two sides.
    pub fn new(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }
}

/// The outcome of checking a single step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepVerification {
    /// 1-based index of the step.
    pub step: usize,

    /// Whether the step's two sides are equivalent.
    pub valid: bool,

    /// Detail of the lhs ≡ rhs check. `None` when a side failed to parse.
    pub equivalence: Option<Equivalence>,
}

/// Why a derivation failed to verify.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DerivationError {
    /// The input contained no steps.
    NoSteps,

    /// The step at this 1-based index is not a true identity (or failed to parse).
    InvalidStep(usize),

    /// The step at this 1-based index is independently true, but its left side does not
    /// follow from the previous step's right side.
    Discontinuity(usize),
}

impl Display for DerivationError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DerivationError::NoSteps => write!(f, "no derivation steps found"),
            DerivationError::InvalidStep(step) => {
                write!(f, "step {} is not a valid identity", step)
            },
            DerivationError::Discontinuity(step) => {
                write!(f, "step {} does not follow from the previous step", step)
            },
        }
    }
}

impl std::error::Error for DerivationError {}

/// The result of verifying a derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivationReport {
    /// True when every step is valid and continuous.
    pub valid: bool,

    /// The first failure, if any.
    pub error: Option<DerivationError>,

    /// Per-step outcomes, up to and including the first failing step.
    pub steps: Vec<StepVerification>,
}

impl DerivationReport {
    /// The 1-based index of the first failing step, if any.
    pub fn invalid_step(&self) -> Option<usize> {
        match self.error? {
            DerivationError::NoSteps => None,
            DerivationError::InvalidStep(step) | DerivationError::Discontinuity(step) => {
                Some(step)
            },
        }
    }
}

/// Recognizes a side written in `d/dx(...)` notation, returning the variable of
/// differentiation and the text inside the parentheses.
///
/// The notation is only recognized when it spans the whole side: the parenthesis after
/// `d/dx` must match the final character. The variable is whatever single letter follows the
/// second `d`, so `d/dt(t^2)` differentiates with respect to `t`.
pub(crate) fn derivative_notation(text: &str) -> Option<(String, &str)> {
    let rest = text.strip_prefix("d/d")?;
    let var = rest.chars().next().filter(|c| c.is_ascii_alphabetic())?;
    let rest = rest[var.len_utf8()..].trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;

    // the stripped parens must match each other, or the side is not a lone derivative
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            },
            _ => {},
        }
    }
    (depth == 0).then_some((var.to_string(), inner))
}

/// Parses one side of a step, resolving `d/dx(...)` derivative notation.
///
/// Nested notation works too: `d/dx(d/dx(x^3))` is the second derivative.
pub fn parse_side(text: &str) -> Option<Expr> {
    let text = text.trim();
    if let Some((var, inner)) = derivative_notation(text) {
        let inner = parse_side(inner)?;
        return derivative(&inner, &var).ok();
    }
    parse_expression(text).ok()
}

/// Verifies a derivation: every step must be a true identity, and every step after the first
/// must continue from its predecessor's right side.
///
/// Verification stops at the first failure; the per-step detail collected up to that point is
/// returned alongside the error. A step that is both false and discontinuous is reported as
/// invalid, since a false identity is the more fundamental problem.
pub fn verify_derivation_steps(steps: &[DerivationStep]) -> DerivationReport {
    if steps.is_empty() {
        return DerivationReport {
            valid: false,
            error: Some(DerivationError::NoSteps),
            steps: Vec::new(),
        };
    }

    let mut detail = Vec::new();
    let mut previous_rhs: Option<Expr> = None;

    for (index, step) in steps.iter().enumerate() {
        let number = index + 1;
        let (Some(lhs), Some(rhs)) = (parse_side(&step.lhs), parse_side(&step.rhs)) else {
            detail.push(StepVerification {
                step: number,
                valid: false,
                equivalence: None,
            });
            return DerivationReport {
                valid: false,
                error: Some(DerivationError::InvalidStep(number)),
                steps: detail,
            };
        };

        let equivalence = check_equivalent_exprs(&lhs, &rhs);
        detail.push(StepVerification {
            step: number,
            valid: equivalence.equivalent,
            equivalence: Some(equivalence),
        });

        if !equivalence.equivalent {
            return DerivationReport {
                valid: false,
                error: Some(DerivationError::InvalidStep(number)),
                steps: detail,
            };
        }

        if let Some(previous) = &previous_rhs {
            if !check_equivalent_exprs(previous, &lhs).equivalent {
                return DerivationReport {
                    valid: false,
                    error: Some(DerivationError::Discontinuity(number)),
                    steps: detail,
                };
            }
        }

        previous_rhs = Some(rhs);
    }

    DerivationReport {
        valid: true,
        error: None,
        steps: detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn steps(pairs: &[(&str, &str)]) -> Vec<DerivationStep> {
        pairs
            .iter()
            .map(|(lhs, rhs)| DerivationStep::new(*lhs, *rhs))
            .collect()
    }

    #[test]
    fn valid_chain() {
        let report = verify_derivation_steps(&steps(&[("x + x", "2x"), ("2x", "2 * x")]));
        assert!(report.valid);
        assert_eq!(report.error, None);
        assert_eq!(report.steps.len(), 2);
        assert!(report.steps.iter().all(|step| step.valid));
    }

    #[test]
    fn invalid_step_is_reported() {
        let report = verify_derivation_steps(&steps(&[("x + x", "2x"), ("2x", "3x")]));
        assert!(!report.valid);
        assert_eq!(report.error, Some(DerivationError::InvalidStep(2)));
        assert_eq!(report.invalid_step(), Some(2));

        assert_eq!(report.steps.len(), 2);
        assert!(report.steps[0].valid);
        assert!(!report.steps[1].valid);
    }

    #[test]
    fn true_but_unrelated_step_is_a_discontinuity() {
        let report = verify_derivation_steps(&steps(&[("x + x", "2x"), ("y + y", "2y")]));
        assert!(!report.valid);
        assert_eq!(report.error, Some(DerivationError::Discontinuity(2)));
        assert_eq!(report.invalid_step(), Some(2));

        // the step itself is a true identity; only the chain is broken
        assert!(report.steps[1].valid);
    }

    #[test]
    fn empty_derivation() {
        let report = verify_derivation_steps(&[]);
        assert!(!report.valid);
        assert_eq!(report.error, Some(DerivationError::NoSteps));
        assert_eq!(report.invalid_step(), None);
        assert_eq!(
            report.error.map(|err| err.to_string()),
            Some(String::from("no derivation steps found")),
        );
    }

    #[test]
    fn unparsable_side_invalidates_the_step() {
        let report = verify_derivation_steps(&steps(&[("x +", "x")]));
        assert!(!report.valid);
        assert_eq!(report.error, Some(DerivationError::InvalidStep(1)));
        assert_eq!(report.steps[0].equivalence, None);
    }

    #[test]
    fn derivative_notation_verifies() {
        let report = verify_derivation_steps(&steps(&[("d/dx(x^3)", "3x^2")]));
        assert!(report.valid);

        let report = verify_derivation_steps(&steps(&[("d/dx(x^3)", "x^2")]));
        assert_eq!(report.error, Some(DerivationError::InvalidStep(1)));
    }

    #[test]
    fn derivative_in_another_variable() {
        let report = verify_derivation_steps(&steps(&[("d/dt(t^2 + t)", "2t + 1")]));
        assert!(report.valid);
    }

    #[test]
    fn second_derivative_notation() {
        let report = verify_derivation_steps(&steps(&[("d/dx(d/dx(x^3))", "6x")]));
        assert!(report.valid);
    }

    #[test]
    fn notation_recognition() {
        let (var, inner) = derivative_notation("d/dx(x^2 + 1)").unwrap();
        assert_eq!(var, "x");
        assert_eq!(inner, "x^2 + 1");

        // trailing content after the closing paren is not a lone derivative
        assert_eq!(derivative_notation("d/dx(x) + 1"), None);
        assert_eq!(derivative_notation("d/dx(x) * (2)"), None);
        assert_eq!(derivative_notation("x^2"), None);
    }
}
