//! Numeric evaluation, rule-based simplification, equivalence checking, and symbolic
//! differentiation of algebraic expressions.
//!
//! The engine is fully deterministic: evaluation is ordinary IEEE 754 arithmetic with typed
//! errors instead of silent `NaN`s, simplification applies a fixed rule set bottom-up to a
//! fixed point, and the sampling-based equivalence oracle in [`equiv`] seeds its generator
//! from the expressions under test, so the same comparison always runs the same trials.

pub mod bindings;
pub mod derivative;
pub mod equiv;
pub mod error;
pub mod eval;
pub mod simplify;
pub mod step_collector;
pub mod suggest;
