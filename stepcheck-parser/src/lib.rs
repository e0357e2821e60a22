//! Tokenizer, parser, and formatter for algebraic expressions.
//!
//! The tokenizer understands the Unicode spellings of the common operators (`·`, `×`, `÷`,
//! `−`, `√`, `²`, `³`) alongside their ASCII forms, and classifies each `+` and `-` as a
//! binary operator or a prefix sign from context. The parser resolves precedence and
//! associativity, implicit multiplication, and postfix operators, and reports errors as
//! [`ariadne`]-backed diagnostics pointing into the source string.
//!
//! # Example
//!
//! ```
//! use stepcheck_parser::parser::{expr::Expr, Parser};
//!
//! let mut parser = Parser::new("4x^2 + 5x + 1");
//! let expr = parser.try_parse_full::<Expr>().unwrap();
//! assert_eq!(format!("{}", expr), "4x^2 + 5x + 1");
//! ```

pub mod parser;
pub mod tokenizer;

pub use parser::Parser;

/// Parses a complete expression from the given source string.
pub fn parse_expression(input: &str) -> Result<parser::expr::Expr, stepcheck_error::Error> {
    Parser::new(input).try_parse_full()
}
