//! Descriptions of the rewrite steps applied during simplification.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rewrite rule that was applied to an expression.
///
/// Steps double as the vocabulary of the suggestion engine, which names each proposed transform
/// with [`Step::tag`] and explains it with [`Step::description`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// `x+0 = x`, `0+x = x`
    AddZero,

    /// `x-0 = x`
    SubtractZero,

    /// `x-x = 0`
    CancelSubtraction,

    /// `x*0 = 0`, `0*x = 0`
    MultiplyZero,

    /// `x*1 = x`, `1*x = x`
    MultiplyOne,

    /// `x/1 = x`
    DivideOne,

    /// `x/x = 1`
    CancelDivision,

    /// `0/x = 0`
    ZeroNumerator,

    /// `x^0 = 1`
    PowerZero,

    /// `x^1 = x`
    PowerOne,

    /// `1^x = 1`
    OnePower,

    /// `--x = x`
    DoubleNegation,

    /// `+x = x`
    UnaryPlus,

    /// Arithmetic on literal numbers, such as `2*3 = 6`.
    ConstantFolding,

    /// `2x+3x = 5x`
    CombineLikeTerms,

    /// `a*(b+c) = a*b+a*c`
    Distribute,

    /// `6/8 = 3/4`
    ReduceFraction,

    /// `(x^a)^b = x^(a*b)`
    PowerOfPower,
}

impl Step {
    /// A short machine-readable name for the rule.
    pub fn tag(&self) -> &'static str {
        match self {
            Step::AddZero => "add_zero",
            Step::SubtractZero => "subtract_zero",
            Step::CancelSubtraction => "cancel_subtraction",
            Step::MultiplyZero => "multiply_zero",
            Step::MultiplyOne => "multiply_one",
            Step::DivideOne => "divide_one",
            Step::CancelDivision => "cancel_division",
            Step::ZeroNumerator => "zero_numerator",
            Step::PowerZero => "power_zero",
            Step::PowerOne => "power_one",
            Step::OnePower => "one_power",
            Step::DoubleNegation => "double_negation",
            Step::UnaryPlus => "unary_plus",
            Step::ConstantFolding => "constant_folding",
            Step::CombineLikeTerms => "combine_like_terms",
            Step::Distribute => "distribute",
            Step::ReduceFraction => "reduce_fraction",
            Step::PowerOfPower => "power_of_power",
        }
    }

    /// A human-readable explanation of the rule.
    pub fn description(&self) -> &'static str {
        match self {
            Step::AddZero => "adding zero leaves a value unchanged",
            Step::SubtractZero => "subtracting zero leaves a value unchanged",
            Step::CancelSubtraction => "subtracting a value from itself gives zero",
            Step::MultiplyZero => "multiplying by zero gives zero",
            Step::MultiplyOne => "multiplying by one leaves a value unchanged",
            Step::DivideOne => "dividing by one leaves a value unchanged",
            Step::CancelDivision => "dividing a value by itself gives one",
            Step::ZeroNumerator => "zero divided by any value is zero",
            Step::PowerZero => "any value raised to the power zero is one",
            Step::PowerOne => "raising a value to the power one leaves it unchanged",
            Step::OnePower => "one raised to any power is one",
            Step::DoubleNegation => "negating a value twice leaves it unchanged",
            Step::UnaryPlus => "a leading plus sign has no effect",
            Step::ConstantFolding => "arithmetic on known numbers can be carried out",
            Step::CombineLikeTerms => "terms with the same variable part can be combined",
            Step::Distribute => "multiplication distributes over each term of a sum",
            Step::ReduceFraction => "the numerator and denominator share a common factor",
            Step::PowerOfPower => "a power of a power multiplies the exponents",
        }
    }
}
