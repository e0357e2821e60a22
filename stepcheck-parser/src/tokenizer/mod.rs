//! Tokenizer for algebraic expressions.
//!
//! The tokenizer is lossless: every character of the input, including whitespace and characters
//! it does not recognize, lands in some token, and concatenating the lexemes of the token stream
//! reproduces the input exactly. Unrecognized characters produce [`TokenKind::Unknown`] tokens
//! along with an error record, but scanning always continues to the end of the input.
//!
//! After the raw scan, each `+` and `-` token is classified as either a binary operator or a
//! prefix sign based on what precedes it. The parser relies on this classification; see
//! [`Token::prefix_sign`].

pub mod token;

pub use token::{Token, TokenKind};

use crate::parser::error::{kind, Error};
use logos::Logos;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Static descriptor for one operator surface form.
///
/// Every spelling of an operator, ASCII or Unicode, has its own entry; aliases share a
/// canonical form. The tokenizer consults this table when classifying signs, and tokens expose
/// their entry through [`Token::op_entry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpEntry {
    /// The canonical ASCII spelling of the operator.
    pub canonical: &'static str,

    /// The token kind this operator lexes to.
    pub kind: TokenKind,

    /// Precedence tier: 1 = additive, 2 = multiplicative, 3 = exponentiation, 4 = unary.
    pub tier: u8,

    /// Number of operands the operator takes.
    pub arity: u8,

    /// True if the operator groups right-to-left (exponentiation and the prefix operators).
    pub right_associative: bool,

    /// True if the lexeme doubles as a prefix sign when it appears in operand position.
    pub sign: bool,
}

/// All operator surface forms, keyed by lexeme.
pub static OPERATORS: Lazy<HashMap<&'static str, OpEntry>> = Lazy::new(|| {
    let mut map = HashMap::new();
    let mut insert = |lexemes: &[&'static str], entry: OpEntry| {
        for lexeme in lexemes {
            map.insert(*lexeme, entry);
        }
    };

    insert(
        &["+"],
        OpEntry {
            canonical: "+",
            kind: TokenKind::Add,
            tier: 1,
            arity: 2,
            right_associative: false,
            sign: true,
        },
    );
    insert(
        &["-", "−"],
        OpEntry {
            canonical: "-",
            kind: TokenKind::Sub,
            tier: 1,
            arity: 2,
            right_associative: false,
            sign: true,
        },
    );
    insert(
        &["*", "·", "×"],
        OpEntry {
            canonical: "*",
            kind: TokenKind::Mul,
            tier: 2,
            arity: 2,
            right_associative: false,
            sign: false,
        },
    );
    insert(
        &["/", "÷"],
        OpEntry {
            canonical: "/",
            kind: TokenKind::Div,
            tier: 2,
            arity: 2,
            right_associative: false,
            sign: false,
        },
    );
    insert(
        &["%"],
        OpEntry {
            canonical: "%",
            kind: TokenKind::Mod,
            tier: 2,
            arity: 2,
            right_associative: false,
            sign: false,
        },
    );
    insert(
        &["^"],
        OpEntry {
            canonical: "^",
            kind: TokenKind::Exp,
            tier: 3,
            arity: 2,
            right_associative: true,
            sign: false,
        },
    );
    insert(
        &["√", "sqrt"],
        OpEntry {
            canonical: "sqrt",
            kind: TokenKind::Sqrt,
            tier: 4,
            arity: 1,
            right_associative: true,
            sign: false,
        },
    );
    insert(
        &["²"],
        OpEntry {
            canonical: "²",
            kind: TokenKind::Square,
            tier: 4,
            arity: 1,
            right_associative: false,
            sign: false,
        },
    );
    insert(
        &["³"],
        OpEntry {
            canonical: "³",
            kind: TokenKind::Cube,
            tier: 4,
            arity: 1,
            right_associative: false,
            sign: false,
        },
    );
    insert(
        &["!"],
        OpEntry {
            canonical: "!",
            kind: TokenKind::Factorial,
            tier: 4,
            arity: 1,
            right_associative: false,
            sign: false,
        },
    );

    map
});

/// Scans the input and classifies signs, without collecting errors.
fn scan(input: &str) -> Vec<Token> {
    let mut tokens = TokenKind::lexer(input)
        .spanned()
        .map(|(kind, span)| Token {
            // the catch-all pattern makes the lexer total, so an `Err` cannot actually occur
            kind: kind.unwrap_or(TokenKind::Unknown),
            lexeme: &input[span.clone()],
            span,
            prefix_sign: false,
        })
        .collect::<Vec<_>>();
    classify_signs(&mut tokens);
    tokens
}

/// Marks each `+` or `-` token that appears in operand position as a prefix sign.
///
/// A sign-capable token is in operand position when the previous non-whitespace token cannot end
/// an operand: at the start of the input, after `(`, or after any operator that still expects an
/// operand to its right.
fn classify_signs(tokens: &mut [Token]) {
    let mut prev_ends_operand = false;
    for token in tokens.iter_mut() {
        if token.kind.is_whitespace() {
            continue;
        }
        if !prev_ends_operand && token.op_entry().is_some_and(|entry| entry.sign) {
            token.prefix_sign = true;
        }
        prev_ends_operand = token.kind.ends_operand();
    }
}

/// Tokenizes the input, returning the full token stream along with an error for each
/// unrecognized character.
///
/// Whitespace tokens are kept in the stream; callers that only care about meaningful tokens can
/// filter on [`TokenKind::is_whitespace`].
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<Error>) {
    let tokens = scan(input);
    let errors = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Unknown)
        .map(|token| {
            Error::new(
                vec![token.span.clone()],
                kind::UnknownCharacter {
                    symbol: token.lexeme.to_owned(),
                },
            )
        })
        .collect();
    (tokens, errors)
}

/// Tokenizes the input into a boxed slice for the parser.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    scan(input).into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Returns the kinds of all non-whitespace tokens in the input.
    fn kinds(input: &str) -> Vec<TokenKind> {
        let (tokens, _) = tokenize(input);
        tokens
            .iter()
            .filter(|token| !token.kind.is_whitespace())
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn simple_binary() {
        let (tokens, errors) = tokenize("2 + 3");
        assert!(errors.is_empty());

        let meaningful = tokens
            .iter()
            .filter(|token| !token.kind.is_whitespace())
            .collect::<Vec<_>>();
        assert_eq!(meaningful.len(), 3);
        assert_eq!(
            *meaningful[0],
            Token {
                span: 0..1,
                kind: TokenKind::Int,
                lexeme: "2",
                prefix_sign: false,
            }
        );
        assert_eq!(
            *meaningful[1],
            Token {
                span: 2..3,
                kind: TokenKind::Add,
                lexeme: "+",
                prefix_sign: false,
            }
        );
        assert_eq!(
            *meaningful[2],
            Token {
                span: 4..5,
                kind: TokenKind::Int,
                lexeme: "3",
                prefix_sign: false,
            }
        );
    }

    #[test]
    fn lossless() {
        let input = "2·x − √(y ÷ 3)! + $";
        let (tokens, _) = tokenize(input);
        let rebuilt = tokens
            .iter()
            .map(|token| token.lexeme)
            .collect::<String>();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn unicode_aliases() {
        assert_eq!(
            kinds("2 × 3 ÷ 4 · 5"),
            vec![
                TokenKind::Int,
                TokenKind::Mul,
                TokenKind::Int,
                TokenKind::Div,
                TokenKind::Int,
                TokenKind::Mul,
                TokenKind::Int,
            ]
        );
        assert_eq!(kinds("3 − 1"), vec![TokenKind::Int, TokenKind::Sub, TokenKind::Int]);
        assert_eq!(kinds("√x²"), vec![TokenKind::Sqrt, TokenKind::Name, TokenKind::Square]);
    }

    #[test]
    fn leading_sign_is_prefix() {
        let (tokens, _) = tokenize("-4 + 2");
        assert!(tokens[0].prefix_sign);
        let add = tokens.iter().find(|token| token.kind == TokenKind::Add);
        assert!(add.is_some_and(|token| !token.prefix_sign));
    }

    #[test]
    fn sign_after_operator_is_prefix() {
        let (tokens, _) = tokenize("3 - -4");
        let subs = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Sub)
            .collect::<Vec<_>>();
        assert_eq!(subs.len(), 2);
        assert!(!subs[0].prefix_sign);
        assert!(subs[1].prefix_sign);
    }

    #[test]
    fn sign_after_open_paren_is_prefix() {
        let (tokens, _) = tokenize("2 * (-3)");
        let sub = tokens.iter().find(|token| token.kind == TokenKind::Sub);
        assert!(sub.is_some_and(|token| token.prefix_sign));
    }

    #[test]
    fn sign_after_postfix_is_binary() {
        let (tokens, _) = tokenize("3! - 2");
        let sub = tokens.iter().find(|token| token.kind == TokenKind::Sub);
        assert!(sub.is_some_and(|token| !token.prefix_sign));
    }

    #[test]
    fn scientific_notation_is_one_token() {
        assert_eq!(kinds("2.5e3"), vec![TokenKind::Float]);
        assert_eq!(kinds("1e-9"), vec![TokenKind::Float]);
        assert_eq!(kinds("6E+23"), vec![TokenKind::Float]);
    }

    #[test]
    fn unknown_character_keeps_scanning() {
        let (tokens, errors) = tokenize("2 $ 3");
        assert_eq!(errors.len(), 1);
        assert_eq!(kinds("2 $ 3"), vec![TokenKind::Int, TokenKind::Unknown, TokenKind::Int]);
        assert!(tokens.iter().any(|token| token.lexeme == "3"));
    }

    #[test]
    fn sqrt_keyword_and_names() {
        assert_eq!(kinds("sqrt x"), vec![TokenKind::Sqrt, TokenKind::Name]);
        // longest match wins: an identifier containing "sqrt" stays an identifier
        assert_eq!(kinds("sqrty"), vec![TokenKind::Name]);
    }

    #[test]
    fn operator_entries() {
        let (tokens, _) = tokenize("x ^ 2");
        let exp = tokens
            .iter()
            .find(|token| token.kind == TokenKind::Exp)
            .and_then(Token::op_entry);
        assert!(exp.is_some_and(|entry| entry.tier == 3 && entry.right_associative));

        let (tokens, _) = tokenize("×");
        assert_eq!(
            tokens[0].op_entry().map(|entry| entry.canonical),
            Some("*")
        );
    }
}
