//! LaTeX export of derivations.
//!
//! Renders a derivation either as an `aligned` environment with one step per row, aligned on
//! the equals signs, or as a single inline chain (`x+x = 2x = 2\cdot x`). The inline form
//! assumes the chain is continuous and renders the first left side followed by every right
//! side; the aligned form spells out both sides of every step.
//!
//! Sides written as `d/dx(...)` are typeset in Leibniz notation. A side that does not parse
//! is passed through verbatim; export must not lose the user's text.

use crate::{derivative_notation, parse_side, DerivationStep};
use stepcheck_parser::parse_expression;
use stepcheck_parser::parser::fmt::Latex;

/// Options controlling how a derivation is typeset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatexOptions {
    /// Render an `aligned` environment with one step per row, instead of a single inline
    /// chain. Defaults to true.
    pub aligned: bool,

    /// Number each row, as `&& (n)`. Only rendered in aligned mode. Defaults to false.
    pub numbered: bool,

    /// Close the aligned environment with a `\therefore` row restating the first left side
    /// and the final right side. Defaults to false.
    pub conclude: bool,

    /// A label typeset in front of the derivation. Defaults to none.
    pub label: Option<String>,
}

impl Default for LatexOptions {
    fn default() -> Self {
        Self {
            aligned: true,
            numbered: false,
            conclude: false,
            label: None,
        }
    }
}

/// Typesets one side of a step, rendering `d/dx(...)` in Leibniz notation and passing
/// unparsable text through unchanged.
fn render_side(text: &str) -> String {
    let text = text.trim();
    if let Some((var, inner)) = derivative_notation(text) {
        if let Some(expr) = parse_side(inner) {
            return format!("\\frac{{d}}{{d{}}}\\left({}\\right)", var, expr.as_display());
        }
    }
    match parse_expression(text) {
        Ok(expr) => expr.as_display().to_string(),
        Err(_) => text.to_owned(),
    }
}

/// Typesets a derivation as LaTeX.
pub fn derivation_to_latex(steps: &[DerivationStep], options: &LatexOptions) -> String {
    let mut out = String::new();
    if let Some(label) = &options.label {
        out.push_str(&format!("\\text{{{}}}:\\quad ", label));
    }

    if !options.aligned {
        if let Some(first) = steps.first() {
            out.push_str(&render_side(&first.lhs));
            for step in steps {
                out.push_str(&format!(" = {}", render_side(&step.rhs)));
            }
        }
        return out;
    }

    out.push_str("\\begin{aligned}\n");
    for (index, step) in steps.iter().enumerate() {
        out.push_str(&format!(
            "{} &= {}",
            render_side(&step.lhs),
            render_side(&step.rhs),
        ));
        if options.numbered {
            out.push_str(&format!(" && ({})", index + 1));
        }
        if index + 1 < steps.len() || options.conclude {
            out.push_str(" \\\\");
        }
        out.push('\n');
    }
    if options.conclude {
        if let (Some(first), Some(last)) = (steps.first(), steps.last()) {
            out.push_str(&format!(
                "\\therefore\\ {} &= {}\n",
                render_side(&first.lhs),
                render_side(&last.rhs),
            ));
        }
    }
    out.push_str("\\end{aligned}");
    out
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
    fn aligned_two_step_derivation() {
        let rendered = derivation_to_latex(
            &steps(&[("x + x", "2x"), ("2x", "2 * x")]),
            &LatexOptions::default(),
        );
        assert_eq!(
            rendered,
            "\\begin{aligned}\nx+x &= 2x \\\\\n2x &= 2\\cdot x\n\\end{aligned}",
        );
    }

    #[test]
    fn numbered_and_concluded() {
        let options = LatexOptions {
            numbered: true,
            conclude: true,
            ..LatexOptions::default()
        };
        let rendered = derivation_to_latex(&steps(&[("x + x", "2x")]), &options);
        assert_eq!(
            rendered,
            "\\begin{aligned}\nx+x &= 2x && (1) \\\\\n\\therefore\\ x+x &= 2x\n\\end{aligned}",
        );
    }

    #[test]
    fn derivative_notation_uses_leibniz_form() {
        let rendered = derivation_to_latex(
            &steps(&[("d/dx(x^2)", "2x")]),
            &LatexOptions::default(),
        );
        assert_eq!(
            rendered,
            "\\begin{aligned}\n\\frac{d}{dx}\\left(x^{2}\\right) &= 2x\n\\end{aligned}",
        );
    }

    #[test]
    fn inline_chain() {
        let options = LatexOptions {
            aligned: false,
            ..LatexOptions::default()
        };
        let rendered =
            derivation_to_latex(&steps(&[("x + x", "2x"), ("2x", "2 * x")]), &options);
        assert_eq!(rendered, "x+x = 2x = 2\\cdot x");
    }

    #[test]
    fn unparsable_text_passes_through() {
        let options = LatexOptions {
            aligned: false,
            ..LatexOptions::default()
        };
        let rendered = derivation_to_latex(&steps(&[("x +", "y")]), &options);
        assert_eq!(rendered, "x + = y");
    }

    #[test]
    fn labeled_derivation_with_constants() {
        let options = LatexOptions {
            label: Some(String::from("periods")),
            ..LatexOptions::default()
        };
        let rendered = derivation_to_latex(&steps(&[("2pi", "tau")]), &options);
        assert_eq!(
            rendered,
            "\\text{periods}:\\quad \\begin{aligned}\n2\\pi &= \\tau\n\\end{aligned}",
        );
    }
}
