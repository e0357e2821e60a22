use super::expr::Expr;

/// An iterator that walks an expression tree in left-to-right post-order, without recursing.
///
/// Children are yielded before their parents, so the operands of a node always appear before
/// the node itself. Created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    pub(crate) fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the expression on top of the stack and records it as the most recently visited
    /// node.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression is the node visited most recently.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = self.stack.last()?;
            match expr {
                Expr::Literal(_) => return self.visit(),
                Expr::Unary(unary) => {
                    if self.is_last_visited(&unary.operand) {
                        return self.visit();
                    }
                    self.stack.push(&unary.operand);
                },
                Expr::Binary(binary) => {
                    if self.is_last_visited(&binary.rhs) {
                        return self.visit();
                    }
                    self.stack.push(&binary.rhs);
                    self.stack.push(&binary.lhs);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{expr::Expr, Parser};

    #[test]
    fn post_order() {
        let expr = Parser::new("1 + 2 * 3").try_parse_full::<Expr>().unwrap();
        let values = expr
            .post_order_iter()
            .filter_map(Expr::as_number)
            .collect::<Vec<_>>();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);

        // every node is visited once: three literals, the product, and the sum
        assert_eq!(expr.post_order_iter().count(), 5);
    }
}
