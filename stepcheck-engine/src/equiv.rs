//! Probabilistic equivalence checking.
//!
//! Two expressions are considered equivalent when they denote the same function of their free
//! variables. The check first compares the simplified trees structurally; if that is
//! inconclusive it falls back to numeric evidence: constant expressions are evaluated once and
//! compared, and expressions with free variables are evaluated over several trials of sampled
//! variable values. The sampler is seeded from the expressions under comparison, so the same
//! comparison always runs the same trials and the verdict is reproducible.

use crate::bindings::Bindings;
use crate::eval::Eval;
use crate::simplify::simplify;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::f64::consts::SQRT_2;
use std::hash::{Hash, Hasher};
use stepcheck_parser::parse_expression;
use stepcheck_parser::parser::expr::Expr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of sampling trials run when comparing expressions with free variables.
///
/// Every trial must agree for the expressions to be considered equivalent. False positives
/// would require two differing functions to coincide at this many independent irrational
/// sample points, which does not happen for the algebraic expressions this engine handles.
pub const SAMPLE_TRIALS: usize = 7;

/// The relative tolerance within which two evaluated values are considered to agree.
const TOLERANCE: f64 = 1e-9;

/// How an equivalence verdict was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    /// One of the sides failed to parse.
    ParseFailure,

    /// Both sides simplified to structurally identical trees.
    Simplification,

    /// Both sides are constant; they were evaluated once and their values compared.
    ConstantEvaluation,

    /// The free variables were sampled over several trials, with both sides evaluated and
    /// compared per trial.
    Sampling,
}

/// The verdict of an equivalence check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equivalence {
    /// Whether the two expressions denote the same function.
    pub equivalent: bool,

    /// How the verdict was reached.
    pub method: Method,
}

/// Checks whether two expression strings denote the same function. Failure to parse either
/// side means the two are not equivalent.
pub fn check_equivalence(a: &str, b: &str) -> Equivalence {
    let (Ok(a), Ok(b)) = (parse_expression(a), parse_expression(b)) else {
        return Equivalence {
            equivalent: false,
            method: Method::ParseFailure,
        };
    };
    check_equivalent_exprs(&a, &b)
}

/// Checks whether two parsed expressions denote the same function.
pub fn check_equivalent_exprs(a: &Expr, b: &Expr) -> Equivalence {
    if simplify(a).strict_eq(&simplify(b)) {
        return Equivalence {
            equivalent: true,
            method: Method::Simplification,
        };
    }

    let mut vars = free_variables(a);
    vars.extend(free_variables(b));

    if vars.is_empty() {
        let equivalent = match (a.eval_default(), b.eval_default()) {
            (Ok(left), Ok(right)) => values_agree(left, right),
            _ => false,
        };
        return Equivalence {
            equivalent,
            method: Method::ConstantEvaluation,
        };
    }

    Equivalence {
        equivalent: sample(a, b, &vars),
        method: Method::Sampling,
    }
}

/// Text-level convenience wrapper around [`check_equivalence`].
pub fn compare_expressions(a: &str, b: &str) -> bool {
    check_equivalence(a, b).equivalent
}

/// Collects the free variables of an expression: every symbol that is not one of the default
/// constants. The set is ordered so that sampling assigns values deterministically.
pub fn free_variables(expr: &Expr) -> BTreeSet<String> {
    let constants = Bindings::new();
    expr.post_order_iter()
        .filter_map(Expr::as_symbol)
        .filter(|name| !constants.contains(name))
        .map(str::to_owned)
        .collect()
}

/// Runs the sampling trials. Every trial must evaluate successfully on both sides and agree;
/// an evaluation error on either side fails the trial, since an erroring expression provides
/// no value to compare.
fn sample(a: &Expr, b: &Expr, vars: &BTreeSet<String>) -> bool {
    let mut rng = StdRng::seed_from_u64(sampling_seed(a, b));

    for _ in 0..SAMPLE_TRIALS {
        let mut bindings = Bindings::new();
        for var in vars {
            // irrational samples keep degenerate values like 0 and 1 out of play, so
            // differences that those values would mask still show up
            bindings.insert(var.clone(), rng.gen_range(1.0..4.0) * SQRT_2);
        }

        match (a.eval(&bindings), b.eval(&bindings)) {
            (Ok(left), Ok(right)) if values_agree(left, right) => {},
            _ => return false,
        }
    }

    true
}

/// Derives the sampler seed from the canonical rendering of both expressions, making the
/// trials a pure function of the comparison being performed.
fn sampling_seed(a: &Expr, b: &Expr) -> u64 {
    let mut hasher = DefaultHasher::new();
    a.to_string().hash(&mut hasher);
    b.to_string().hash(&mut hasher);
    hasher.finish()
}

/// Compares two values within a relative tolerance, floored so that values near zero are
/// compared absolutely.
fn values_agree(left: f64, right: f64) -> bool {
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn distributivity() {
        assert!(compare_expressions("a * (b + c)", "a*b + a*c"));
    }

    #[test]
    fn commutativity() {
        assert!(compare_expressions("x + y", "y + x"));
        assert!(compare_expressions("x * y", "y * x"));
    }

    #[test]
    fn power_identity() {
        assert!(compare_expressions("x²", "x * x"));
        assert!(compare_expressions("x^5", "x^2 * x^3"));
    }

    #[test]
    fn inequivalent() {
        assert!(!compare_expressions("x + 1", "x"));
        assert!(!compare_expressions("x - y", "y - x"));
        assert!(!compare_expressions("(x + y)^2", "x^2 + y^2"));
    }

    #[test]
    fn simplification_method() {
        let verdict = check_equivalence("x / x", "1");
        assert!(verdict.equivalent);
        assert_eq!(verdict.method, Method::Simplification);
    }

    #[test]
    fn constant_evaluation_method() {
        // the simplifier refuses to fold `0^0`, but direct evaluation still gives 1
        let verdict = check_equivalence("0 ^ 0", "1");
        assert!(verdict.equivalent);
        assert_eq!(verdict.method, Method::ConstantEvaluation);
    }

    #[test]
    fn sampling_method() {
        let verdict = check_equivalence("√(x · x)", "x");
        assert!(verdict.equivalent);
        assert_eq!(verdict.method, Method::Sampling);
    }

    #[test]
    fn parse_failure() {
        let verdict = check_equivalence("x +", "x");
        assert!(!verdict.equivalent);
        assert_eq!(verdict.method, Method::ParseFailure);
    }

    #[test]
    fn erroring_trials_are_not_agreement() {
        // neither side has a value anywhere in the sampled range, which is not the same as
        // having equal values
        assert!(!compare_expressions("√(0 - x)", "√(0 - 2x)"));
    }

    #[test]
    fn free_variable_collection() {
        let expr = stepcheck_parser::parse_expression("2 pi r + x y").unwrap();
        let vars = free_variables(&expr);
        assert_eq!(
            vars.into_iter().collect::<Vec<_>>(),
            vec!["r".to_string(), "x".to_string(), "y".to_string()],
        );
    }

    #[test]
    fn verdicts_are_reproducible() {
        let first = check_equivalence("x^2 + 2x + 1", "(x + 1)^2");
        let second = check_equivalence("x^2 + 2x + 1", "(x + 1)^2");
        assert!(first.equivalent);
        assert_eq!(first, second);
    }
}
