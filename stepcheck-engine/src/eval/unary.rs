use crate::bindings::Bindings;
use crate::error::{
    kind::{FactorialDomain, NegativeRoot, Overflow},
    Error,
};
use crate::eval::Eval;
use stepcheck_parser::parser::{token::op::UnaryOpKind, unary::Unary};

/// The largest integer whose factorial fits in an `f64`; `171!` overflows.
const MAX_FACTORIAL: f64 = 170.0;

impl Eval for Unary {
    fn eval(&self, bindings: &Bindings) -> Result<f64, Error> {
        let operand = self.operand.eval(bindings)?;
        let spans = || vec![self.operand.span(), self.op.span.clone()];

        let value = match self.op.kind {
            UnaryOpKind::Pos => operand,
            UnaryOpKind::Neg => -operand,
            UnaryOpKind::Sqrt => {
                if operand < 0.0 {
                    return Err(Error::new(spans(), NegativeRoot { operand }));
                }
                operand.sqrt()
            },
            UnaryOpKind::Square => operand * operand,
            UnaryOpKind::Cube => operand * operand * operand,
            UnaryOpKind::Factorial => {
                if operand < 0.0 || operand.fract() != 0.0 {
                    return Err(Error::new(spans(), FactorialDomain { operand }));
                }
                factorial(operand)
            },
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::new(vec![self.span.clone()], Overflow))
        }
    }
}

/// Computes the factorial of a non-negative integer value.
fn factorial(n: f64) -> f64 {
    if n > MAX_FACTORIAL {
        return f64::INFINITY;
    }

    let mut product = 1.0;
    let mut factor = 2.0;
    while factor <= n {
        product *= factor;
        factor += 1.0;
    }
    product
}
