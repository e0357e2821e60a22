//! Errors that can occur while evaluating an expression.

pub mod kind;

pub use stepcheck_error::Error;
