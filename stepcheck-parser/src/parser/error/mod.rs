//! Error types returned while tokenizing and parsing expressions.
//!
//! All errors share the [`Error`] carrier type, which pairs one or more source spans with a
//! [`kind`](mod@kind) describing what went wrong. The carrier can build an
//! [`ariadne`] report pointing into the offending source string.

pub mod kind;

pub use stepcheck_error::Error;
