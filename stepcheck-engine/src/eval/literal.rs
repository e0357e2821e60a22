use crate::bindings::Bindings;
use crate::error::{kind::{Overflow, UnboundVariable}, Error};
use crate::eval::Eval;
use levenshtein::levenshtein;
use stepcheck_parser::parser::literal::Literal;

/// Bound names within this edit distance of an unbound name are offered as corrections.
const MAX_SUGGESTION_DISTANCE: usize = 2;

impl Eval for Literal {
    fn eval(&self, bindings: &Bindings) -> Result<f64, Error> {
        match self {
            // literals beyond the range of an `f64` parse to infinity
            Literal::Number(num) => {
                if num.value.is_finite() {
                    Ok(num.value)
                } else {
                    Err(Error::new(vec![num.span.clone()], Overflow))
                }
            },
            Literal::Symbol(sym) => bindings.get(&sym.name).ok_or_else(|| {
                Error::new(
                    vec![sym.span.clone()],
                    UnboundVariable {
                        name: sym.name.clone(),
                        suggestions: similar_names(bindings, &sym.name),
                    },
                )
            }),
        }
    }
}

/// Collects the bound names close enough to `name` to plausibly be typos of it, sorted so that
/// the suggestions do not depend on hash order.
fn similar_names(bindings: &Bindings, name: &str) -> Vec<String> {
    let mut names = bindings
        .names()
        .filter(|known| levenshtein(known, name) <= MAX_SUGGESTION_DISTANCE)
        .map(str::to_owned)
        .collect::<Vec<_>>();
    names.sort_unstable();
    names
}
