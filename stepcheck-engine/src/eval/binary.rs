use crate::bindings::Bindings;
use crate::error::{
    kind::{DivisionByZero, ModuloByZero, NonRealPower, Overflow},
    Error,
};
use crate::eval::Eval;
use stepcheck_parser::parser::{binary::Binary, token::op::BinOpKind};

impl Eval for Binary {
    fn eval(&self, bindings: &Bindings) -> Result<f64, Error> {
        let left = self.lhs.eval(bindings)?;
        let right = self.rhs.eval(bindings)?;
        let spans = || vec![self.lhs.span(), self.op.span.clone(), self.rhs.span()];

        let value = match self.op.kind {
            BinOpKind::Exp => {
                // `powf` already returns 1 for `0^0`, and only produces NaN for a negative
                // base raised to a fractional power
                let value = left.powf(right);
                if value.is_nan() {
                    return Err(Error::new(
                        spans(),
                        NonRealPower {
                            base: left,
                            exponent: right,
                        },
                    ));
                }
                value
            },
            BinOpKind::Mul => left * right,
            BinOpKind::Div => {
                if right == 0.0 {
                    return Err(Error::new(spans(), DivisionByZero));
                }
                left / right
            },
            BinOpKind::Mod => {
                if right == 0.0 {
                    return Err(Error::new(spans(), ModuloByZero));
                }
                left % right
            },
            BinOpKind::Add => left + right,
            BinOpKind::Sub => left - right,
        };

        // the operands are finite, so a non-finite result can only mean overflow
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::new(vec![self.span.clone()], Overflow))
        }
    }
}
