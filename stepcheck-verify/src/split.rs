//! Splits free-form derivation text into structured steps.
//!
//! Students rarely submit a neat list of `lhs = rhs` pairs; they write lines like
//! `2x + 3x = 5x, then 5x - x = 4x`. This module cuts such text at separators (`,`, `;`) and
//! connective words (`then`, `therefore`), then splits each segment at its `=` signs. A
//! chained equality `a = b = c` becomes two steps, `a = b` and `b = c`.
//!
//! Splitting is the only place prose is tolerated. Cuts never happen inside parentheses, so
//! an expression like `f(a, b)` survives intact, but the segments themselves must parse as
//! expressions or verification will reject them.

use crate::DerivationStep;

/// Connective words that separate steps when they appear between expressions.
const CONNECTIVES: &[&str] = &["therefore", "then"];

/// Splits derivation text into steps.
///
/// Returns an empty list when the text contains no equality at all.
pub fn split_steps(text: &str) -> Vec<DerivationStep> {
    let mut steps = Vec::new();
    for segment in split_segments(text) {
        push_equalities(segment, &mut steps);
    }
    steps
}

/// Cuts text at top-level `,` and `;`, and at connective words.
fn split_segments(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    let mut i = 0;
    while i < chars.len() {
        let (byte, c) = chars[i];
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' | ';' if depth == 0 => {
                segments.push(&text[start..byte]);
                start = byte + c.len_utf8();
            },
            _ if depth == 0 => {
                if let Some(word) = connective_at(text, &chars, i) {
                    segments.push(&text[start..byte]);
                    start = byte + word.len();
                    i += word.len();
                    continue;
                }
            },
            _ => {},
        }
        i += 1;
    }
    segments.push(&text[start..]);
    segments
}

/// Checks whether a connective word starts at `chars[idx]`, requiring word boundaries on
/// both sides so `x + then` cannot be cut inside an identifier like `strengthen`.
fn connective_at(text: &str, chars: &[(usize, char)], idx: usize) -> Option<&'static str> {
    let (byte, c) = chars[idx];
    if !c.is_ascii_alphabetic() {
        return None;
    }
    if idx > 0 && chars[idx - 1].1.is_ascii_alphanumeric() {
        return None;
    }

    let rest = &text[byte..];
    CONNECTIVES.iter().copied().find(|word| {
        let Some(candidate) = rest.get(..word.len()) else {
            return false;
        };
        if !candidate.eq_ignore_ascii_case(word) {
            return false;
        }
        // the word must end at a boundary too
        rest[word.len()..]
            .chars()
            .next()
            .map_or(true, |next| !next.is_ascii_alphanumeric())
    })
}

/// Splits one segment at its top-level `=` signs and pushes the resulting steps.
fn push_equalities(segment: &str, steps: &mut Vec<DerivationStep>) {
    let mut sides = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    for (byte, c) in segment.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => {
                sides.push(segment[start..byte].trim());
                start = byte + c.len_utf8();
            },
            _ => {},
        }
    }
    sides.push(segment[start..].trim());

    for pair in sides.windows(2) {
        if !pair[0].is_empty() && !pair[1].is_empty() {
            steps.push(DerivationStep::new(pair[0], pair[1]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comma_separated_steps() {
        let steps = split_steps("2x + 3x = 5x, then 5x - x = 4x");
        assert_eq!(
            steps,
            vec![
                DerivationStep::new("2x + 3x", "5x"),
                DerivationStep::new("5x - x", "4x"),
            ],
        );
    }

    #[test]
    fn chained_equality_becomes_adjacent_steps() {
        let steps = split_steps("x + x = 2x = 2 * x");
        assert_eq!(
            steps,
            vec![
                DerivationStep::new("x + x", "2x"),
                DerivationStep::new("2x", "2 * x"),
            ],
        );
    }

    #[test]
    fn connectives_are_case_insensitive() {
        let steps = split_steps("x + x = 2x Therefore 2x = 2 * x");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1], DerivationStep::new("2x", "2 * x"));
    }

    #[test]
    fn connective_inside_a_word_is_not_a_cut() {
        // "strengthen" contains "then"
        let steps = split_steps("strengthen = strengthen");
        assert_eq!(
            steps,
            vec![DerivationStep::new("strengthen", "strengthen")],
        );
    }

    #[test]
    fn separators_inside_parentheses_are_ignored() {
        let steps = split_steps("a = (b, c) = d");
        assert_eq!(
            steps,
            vec![
                DerivationStep::new("a", "(b, c)"),
                DerivationStep::new("(b, c)", "d"),
            ],
        );
    }

    #[test]
    fn text_without_equalities() {
        assert_eq!(split_steps("just words"), Vec::new());
        assert_eq!(split_steps(""), Vec::new());
    }

    #[test]
    fn dangling_equality_sides_are_dropped() {
        assert_eq!(split_steps("= x"), Vec::new());
        assert_eq!(split_steps("x ="), Vec::new());
    }
}
