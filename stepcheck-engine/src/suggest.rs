//! Suggests the next simplification step for an expression, and replays suggestions to build a
//! full simplification path.
//!
//! Unlike [`simplify`](crate::simplify), which rewrites the whole tree to a fixed point in one
//! call, this module works one transform at a time: [`suggest_next_step`] names the single
//! highest-priority rule that applies anywhere in the expression, and
//! [`suggest_simplification_path`] applies suggestions repeatedly, recording the expression
//! text before and after each one. The catalogue also contains transforms that are useful to
//! point out but wrong to apply blindly, such as distribution, which grows the tree.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::simplify::rules::{self, do_binary, number_spanned};
use crate::simplify::{contains_indeterminate, Step};
use crate::step_collector::StepCollector;
use stepcheck_parser::parse_expression;
use stepcheck_parser::parser::{
    binary::Binary,
    expr::Expr,
    token::op::{BinOpKind, UnaryOpKind},
    unary::Unary,
};

/// A simplification rule: a function that rewrites an expression node if it matches.
type Rule = fn(&Expr, &mut dyn StepCollector<Step>) -> Option<Expr>;

/// Every transform the suggestion engine knows, in descending priority order.
///
/// The first applicable transform becomes the suggestion. Identity and zero / one eliminations
/// come first, then self-cancellation, like-term combination, distribution, double negation,
/// fraction reduction, constant folding, power collapsing, and base-one propagation. Fraction
/// reduction outranks constant folding so that `6/8` suggests `3/4` rather than `0.75`.
const CATALOGUE: &[Rule] = &[
    rules::add::add_zero,
    rules::add::subtract_zero,
    rules::multiply::multiply_zero,
    rules::multiply::multiply_one,
    rules::multiply::divide_one,
    rules::multiply::zero_numerator,
    rules::power::power_zero,
    rules::power::power_one,
    rules::add::cancel_subtraction,
    rules::multiply::cancel_division,
    combine_like_terms,
    distribute,
    rules::unary::double_negation,
    rules::unary::unary_plus,
    reduce_fraction,
    rules::fold::fold_constants,
    power_of_power,
    rules::power::one_power,
];

/// The default cap on how many transforms a simplification path may apply.
pub const MAX_PATH_STEPS: usize = 32;

/// The numeric value of a literal, looking through leading negations, so `-2` gives `-2.0`.
///
/// Unlike [`Expr::as_number`], this accepts the parsed form of a negative number, which is a
/// negation wrapping a positive literal.
pub fn literal_value(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Unary(unary) if unary.op.kind == UnaryOpKind::Neg => {
            Some(-literal_value(&unary.operand)?)
        },
        _ => expr.as_number(),
    }
}

/// Splits a term into its numeric coefficient and variable part: `2x` gives `(2, x)`, `-x`
/// gives `(-1, x)` and a bare `x` gives `(1, x)`.
///
/// Plain numbers have no variable part and give `None`; combining those is constant folding's
/// job, not like-term combination.
pub fn split_coefficient(expr: &Expr) -> Option<(f64, Expr)> {
    if literal_value(expr).is_some() {
        return None;
    }

    match expr {
        Expr::Unary(unary) if unary.op.kind == UnaryOpKind::Neg => {
            let (coefficient, factor) = split_coefficient(&unary.operand)?;
            Some((-coefficient, factor))
        },
        Expr::Binary(binary) if binary.op.kind == BinOpKind::Mul => {
            if let Some(value) = literal_value(&binary.lhs) {
                return Some((value, (*binary.rhs).clone()));
            }
            if let Some(value) = literal_value(&binary.rhs) {
                return Some((value, (*binary.lhs).clone()));
            }
            Some((1.0, expr.clone()))
        },
        _ => Some((1.0, expr.clone())),
    }
}

/// `2x+3x = 5x`, `x+x = 2x`, `5x-2x = 3x`
pub fn combine_like_terms(
    expr: &Expr,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Expr> {
    let Expr::Binary(binary) = expr else {
        return None;
    };
    let negate = match binary.op.kind {
        BinOpKind::Add => false,
        BinOpKind::Sub => true,
        _ => return None,
    };

    let (left, factor) = split_coefficient(&binary.lhs)?;
    let (right, other) = split_coefficient(&binary.rhs)?;
    if !factor.strict_eq(&other) {
        return None;
    }

    let coefficient = if negate { left - right } else { left + right };
    let combined = if coefficient == 0.0 {
        number_spanned(0.0, expr.span())
    } else if coefficient == 1.0 {
        factor
    } else if coefficient == -1.0 {
        Expr::unary(UnaryOpKind::Neg, factor)
    } else {
        Expr::implicit_mul(Expr::number(coefficient), factor)
    };

    step_collector.push(Step::CombineLikeTerms);
    Some(combined)
}

/// `a(b+c) = ab+ac` and `(a+b)c = ac+bc`
///
/// Only one level is expanded per application; distributing `(a+b)(c+d)` fully takes several
/// steps of the path.
pub fn distribute(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Mul, |lhs, rhs| {
        if let Expr::Binary(sum) = rhs {
            if matches!(sum.op.kind, BinOpKind::Add | BinOpKind::Sub) {
                return Some(Expr::binary(
                    sum.op.kind,
                    Expr::implicit_mul(lhs.clone(), (*sum.lhs).clone()),
                    Expr::implicit_mul(lhs.clone(), (*sum.rhs).clone()),
                ));
            }
        }

        if let Expr::Binary(sum) = lhs {
            if matches!(sum.op.kind, BinOpKind::Add | BinOpKind::Sub) {
                return Some(Expr::binary(
                    sum.op.kind,
                    Expr::implicit_mul((*sum.lhs).clone(), rhs.clone()),
                    Expr::implicit_mul((*sum.rhs).clone(), rhs.clone()),
                ));
            }
        }

        None
    })?;
    step_collector.push(Step::Distribute);
    Some(opt)
}

/// `6/8 = 3/4`, `12/3 = 4`
pub fn reduce_fraction(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Div, |lhs, rhs| {
        let numerator = integer_value(lhs)?;
        let denominator = integer_value(rhs)?;
        if denominator == 0 {
            return None;
        }

        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs());
        if divisor <= 1 {
            return None;
        }

        let mut numerator = numerator / divisor as i64;
        let mut denominator = denominator / divisor as i64;
        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }

        if denominator == 1 {
            Some(Expr::number(numerator as f64))
        } else {
            Some(Expr::binary(
                BinOpKind::Div,
                Expr::number(numerator as f64),
                Expr::number(denominator as f64),
            ))
        }
    })?;
    step_collector.push(Step::ReduceFraction);
    Some(opt)
}

/// `(x^a)^b = x^(a*b)`
pub fn power_of_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_binary(expr, BinOpKind::Exp, |lhs, rhs| {
        let Expr::Binary(inner) = lhs else {
            return None;
        };
        if inner.op.kind != BinOpKind::Exp {
            return None;
        }

        Some(Expr::binary(
            BinOpKind::Exp,
            (*inner.lhs).clone(),
            Expr::binary(BinOpKind::Mul, (*inner.rhs).clone(), rhs.clone()),
        ))
    })?;
    step_collector.push(Step::PowerOfPower);
    Some(opt)
}

/// The value of a literal as an exact integer, if it is one.
fn integer_value(expr: &Expr) -> Option<i64> {
    let value = literal_value(expr)?;
    // beyond 2^53 an f64 no longer represents every integer exactly
    if value.fract() == 0.0 && value.abs() < (1i64 << 53) as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Applies the rule to the outermost matching node, searching top-down and left-to-right.
fn apply_anywhere(
    expr: &Expr,
    rule: Rule,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Expr> {
    if let Some(next) = rule(expr, step_collector) {
        return Some(next);
    }

    match expr {
        Expr::Literal(_) => None,
        Expr::Unary(unary) => {
            let operand = apply_anywhere(&unary.operand, rule, step_collector)?;
            Some(Expr::Unary(Unary {
                operand: Box::new(operand),
                op: unary.op.clone(),
                span: unary.span.clone(),
            }))
        },
        Expr::Binary(binary) => {
            if let Some(lhs) = apply_anywhere(&binary.lhs, rule, step_collector) {
                return Some(Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op: binary.op.clone(),
                    rhs: binary.rhs.clone(),
                    span: binary.span.clone(),
                }));
            }

            let rhs = apply_anywhere(&binary.rhs, rule, step_collector)?;
            Some(Expr::Binary(Binary {
                lhs: binary.lhs.clone(),
                op: binary.op.clone(),
                rhs: Box::new(rhs),
                span: binary.span.clone(),
            }))
        },
    }
}

/// Every transform in the catalogue that applies somewhere in the expression, in priority
/// order.
pub fn applicable_transforms(expr: &Expr) -> Vec<Step> {
    let mut applicable = Vec::new();
    for rule in CATALOGUE {
        let mut steps = Vec::new();
        if apply_anywhere(expr, *rule, &mut steps).is_some() {
            applicable.extend(steps.first().copied());
        }
    }

    applicable
}

/// Applies the highest-priority applicable transform once, returning the rule that fired and
/// the rewritten expression.
pub fn apply_next_transform(expr: &Expr) -> Option<(Step, Expr)> {
    for rule in CATALOGUE {
        let mut steps = Vec::new();
        if let Some(next) = apply_anywhere(expr, *rule, &mut steps) {
            let step = steps.pop()?;
            return Some((step, next));
        }
    }

    None
}

/// The answer to "what should I do next with this expression?".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NextStep {
    /// The highest-priority applicable transform, or `None` when the expression is already
    /// fully reduced or could not be parsed.
    pub suggestion: Option<Step>,

    /// The expression the suggestion applies to, rendered canonically. Echoes the raw input
    /// when it could not be parsed.
    pub current_expression: String,

    /// Every applicable transform, in priority order.
    pub all_applicable: Vec<Step>,
}

/// Suggests the next simplification step for the given expression text.
pub fn suggest_next_step(text: &str) -> NextStep {
    let Ok(expr) = parse_expression(text) else {
        return NextStep {
            suggestion: None,
            current_expression: text.to_owned(),
            all_applicable: Vec::new(),
        };
    };

    let all_applicable = applicable_transforms(&expr);
    NextStep {
        suggestion: all_applicable.first().copied(),
        current_expression: expr.to_string(),
        all_applicable,
    }
}

/// One applied transform in a simplification path.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimplificationStep {
    /// 1-based position of this step in the path.
    pub ordinal: usize,

    /// The expression before the transform.
    pub before: String,

    /// The expression after the transform.
    pub after: String,

    /// The rule that was applied.
    pub transformation: Step,

    /// A short explanation of the rule.
    pub description: String,
}

/// The result of replaying suggestions until none applies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimplificationPath {
    /// False only when the input could not be parsed.
    pub success: bool,

    /// The final expression text. Echoes the raw input when parsing failed.
    pub simplified: String,

    /// Every transform applied, in order.
    pub steps: Vec<SimplificationStep>,

    /// True when no transform applies to the result and it contains no indeterminate form.
    /// An expression containing `0^0` is never fully simplified, even though no rule touches
    /// it.
    pub fully_simplified: bool,
}

impl SimplificationPath {
    /// Returns the number of transforms that were applied.
    pub fn transformation_count(&self) -> usize {
        self.steps.len()
    }
}

/// Applies the top suggestion repeatedly, up to `max_steps` times (or [`MAX_PATH_STEPS`] when
/// `None`), recording each rewrite.
pub fn suggest_simplification_path(text: &str, max_steps: Option<usize>) -> SimplificationPath {
    let Ok(expr) = parse_expression(text) else {
        return SimplificationPath {
            success: false,
            simplified: text.to_owned(),
            steps: Vec::new(),
            fully_simplified: false,
        };
    };

    let budget = max_steps.unwrap_or(MAX_PATH_STEPS);
    let mut current = expr;
    let mut steps = Vec::new();

    while steps.len() < budget {
        let Some((step, next)) = apply_next_transform(&current) else {
            break;
        };

        steps.push(SimplificationStep {
            ordinal: steps.len() + 1,
            before: current.to_string(),
            after: next.to_string(),
            transformation: step,
            description: step.description().to_owned(),
        });
        current = next;
    }

    SimplificationPath {
        success: true,
        simplified: current.to_string(),
        fully_simplified: applicable_transforms(&current).is_empty()
            && !contains_indeterminate(&current),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stepcheck_parser::Parser;

    fn parse(source: &str) -> Expr {
        let mut parser = Parser::new(source);
        parser.try_parse_full::<Expr>().unwrap()
    }

    #[test]
    fn path_eliminates_identities() {
        let path = suggest_simplification_path("(x + 0) * 1", None);
        assert!(path.success);
        assert_eq!(path.simplified, "x");
        assert!(path.fully_simplified);

        let transforms: Vec<_> = path.steps.iter().map(|step| step.transformation).collect();
        assert_eq!(transforms, vec![Step::AddZero, Step::MultiplyOne]);
        assert_eq!(path.transformation_count(), 2);
        assert_eq!(path.steps[0].ordinal, 1);
        assert_eq!(path.steps[0].before, "(x + 0) * 1");
        assert_eq!(path.steps[0].after, "x * 1");
        assert_eq!(path.steps[1].ordinal, 2);
        assert_eq!(path.steps[1].after, "x");
    }

    #[test]
    fn indeterminate_power_is_never_fully_simplified() {
        let path = suggest_simplification_path("0^0", None);
        assert!(path.success);
        assert_eq!(path.simplified, "0^0");
        assert!(path.steps.is_empty());
        assert!(!path.fully_simplified);
    }

    #[test]
    fn unparsable_input_fails() {
        let path = suggest_simplification_path("x +", None);
        assert!(!path.success);
        assert_eq!(path.simplified, "x +");
        assert!(path.steps.is_empty());

        let next = suggest_next_step("x +");
        assert_eq!(next.suggestion, None);
        assert!(next.all_applicable.is_empty());
    }

    #[test]
    fn suggests_like_term_combination() {
        let next = suggest_next_step("2x + 3x");
        assert_eq!(next.suggestion, Some(Step::CombineLikeTerms));
        assert_eq!(next.current_expression, "2x + 3x");

        let (step, combined) = apply_next_transform(&parse("2x + 3x")).unwrap();
        assert_eq!(step, Step::CombineLikeTerms);
        assert!(combined.strict_eq(&parse("5x")));
    }

    #[test]
    fn combines_implicit_and_negative_coefficients() {
        let (_, combined) = apply_next_transform(&parse("x + x")).unwrap();
        assert!(combined.strict_eq(&parse("2x")));

        let (_, combined) = apply_next_transform(&parse("5x - 2x")).unwrap();
        assert!(combined.strict_eq(&parse("3x")));

        let (_, combined) = apply_next_transform(&parse("-2x + 5x")).unwrap();
        assert!(combined.strict_eq(&parse("3x")));

        let (step, combined) = apply_next_transform(&parse("2x - 3x")).unwrap();
        assert_eq!(step, Step::CombineLikeTerms);
        assert!(combined.strict_eq(&Expr::unary(UnaryOpKind::Neg, Expr::symbol("x"))));
    }

    #[test]
    fn squared_terms_are_like_terms() {
        let (step, combined) = apply_next_transform(&parse("2x^2 + 3x^2")).unwrap();
        assert_eq!(step, Step::CombineLikeTerms);
        assert!(combined.strict_eq(&parse("5x^2")));
    }

    #[test]
    fn suggests_distribution() {
        let next = suggest_next_step("a(b + c)");
        assert_eq!(next.suggestion, Some(Step::Distribute));

        let (_, expanded) = apply_next_transform(&parse("a(b + c)")).unwrap();
        assert!(expanded.strict_eq(&parse("a * b + a * c")));

        let (_, expanded) = apply_next_transform(&parse("(a - b)c")).unwrap();
        assert!(expanded.strict_eq(&parse("a * c - b * c")));
    }

    #[test]
    fn distribution_path_settles() {
        let path = suggest_simplification_path("2(x + 1)", None);
        assert_eq!(path.simplified, "2x + 2");
        assert!(path.fully_simplified);

        let transforms: Vec<_> = path.steps.iter().map(|step| step.transformation).collect();
        assert_eq!(transforms, vec![Step::Distribute, Step::MultiplyOne]);
    }

    #[test]
    fn fraction_reduction_outranks_folding() {
        let next = suggest_next_step("6/8");
        assert_eq!(next.suggestion, Some(Step::ReduceFraction));
        assert_eq!(
            next.all_applicable,
            vec![Step::ReduceFraction, Step::ConstantFolding],
        );

        let (_, reduced) = apply_next_transform(&parse("6/8")).unwrap();
        assert!(reduced.strict_eq(&parse("3/4")));
    }

    #[test]
    fn reduction_to_a_whole_number() {
        let (step, reduced) = apply_next_transform(&parse("12/3")).unwrap();
        assert_eq!(step, Step::ReduceFraction);
        assert!(reduced.strict_eq(&Expr::number(4.0)));

        let (_, reduced) = apply_next_transform(&parse("6/-2")).unwrap();
        assert!(reduced.strict_eq(&Expr::number(-3.0)));
    }

    #[test]
    fn collapses_power_of_power() {
        let next = suggest_next_step("(x^2)^3");
        assert_eq!(next.suggestion, Some(Step::PowerOfPower));

        let path = suggest_simplification_path("(x^2)^3", None);
        assert_eq!(path.simplified, "x^6");
        assert!(path.fully_simplified);

        let transforms: Vec<_> = path.steps.iter().map(|step| step.transformation).collect();
        assert_eq!(transforms, vec![Step::PowerOfPower, Step::ConstantFolding]);
    }

    #[test]
    fn fully_reduced_expression_has_no_suggestion() {
        let next = suggest_next_step("x");
        assert_eq!(next.suggestion, None);
        assert_eq!(next.current_expression, "x");
        assert!(next.all_applicable.is_empty());
    }

    #[test]
    fn budget_caps_the_path() {
        let path = suggest_simplification_path("(x + 0) * 1", Some(1));
        assert_eq!(path.steps.len(), 1);
        assert_eq!(path.simplified, "x * 1");
        assert!(!path.fully_simplified);
    }

    #[test]
    fn splits_coefficients() {
        let (coefficient, factor) = split_coefficient(&parse("2x")).unwrap();
        assert_eq!(coefficient, 2.0);
        assert!(factor.strict_eq(&Expr::symbol("x")));

        let (coefficient, _) = split_coefficient(&parse("-x")).unwrap();
        assert_eq!(coefficient, -1.0);

        let (coefficient, factor) = split_coefficient(&parse("x y")).unwrap();
        assert_eq!(coefficient, 1.0);
        assert!(factor.strict_eq(&parse("x y")));

        assert_eq!(split_coefficient(&parse("42")), None);
        assert_eq!(split_coefficient(&parse("-42")), None);
    }
}
