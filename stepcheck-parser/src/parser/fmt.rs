//! Formatting of expressions back to text.
//!
//! [`Expr`] implements [`Display`] with sensible defaults: spaces around binary operators
//! except exponentiation, ASCII operator spellings, juxtaposed implicit multiplication (`2x`),
//! and only the parentheses required for the output to reparse to the same tree.
//! [`FormatOptions`] selects other renderings, and the [`Latex`] trait renders LaTeX.
//!
//! One caveat: in ASCII style the postfix glyphs `²` and `³` are spelled `^2` and `^3`, which
//! reparse as ordinary exponentiation. The value is unchanged, but the tree shape is not
//! preserved for those two operators.

use super::{
    binary::Binary,
    expr::Expr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
    unary::Unary,
    Associativity, Precedence,
};
use std::fmt::{Display, Formatter, Result};

/// How operators are spelled in the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OperatorStyle {
    /// ASCII spellings: `*`, `/`, `-`, `sqrt(x)`, `^2`.
    #[default]
    Ascii,

    /// Unicode spellings: `·`, `÷`, `−`, `√x`, `²`.
    Unicode,
}

/// Options controlling how an expression is rendered back to text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Put spaces around binary operators, except exponentiation. Defaults to true.
    pub spacing: bool,

    /// Operator spelling. Defaults to ASCII.
    pub style: OperatorStyle,

    /// Parenthesize every compound operand, instead of only where grouping requires it.
    /// Defaults to false.
    pub full_parens: bool,

    /// Render implicit multiplications as juxtaposition (`2x`) wherever the result still
    /// reparses to the same product. Defaults to true.
    pub juxtapose: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            spacing: true,
            style: OperatorStyle::Ascii,
            full_parens: false,
            juxtapose: true,
        }
    }
}

/// A wrapper that renders an expression with a specific set of options. Created by
/// [`Expr::display_with`].
pub struct ExprFormatter<'a> {
    expr: &'a Expr,
    options: FormatOptions,
}

impl Expr {
    /// Wraps this expression in a formatter that renders with the given options.
    pub fn display_with(&self, options: FormatOptions) -> ExprFormatter<'_> {
        ExprFormatter {
            expr: self,
            options,
        }
    }
}

impl Display for ExprFormatter<'_> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        fmt_expr(f, self.expr, self.options)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> Result {
        fmt_expr(f, self, FormatOptions::default())
    }
}

fn fmt_expr(f: &mut Formatter, expr: &Expr, options: FormatOptions) -> Result {
    match expr {
        Expr::Literal(literal) => fmt_literal(f, literal),
        Expr::Unary(unary) => fmt_unary(f, unary, options),
        Expr::Binary(binary) => fmt_binary(f, binary, options),
    }
}

fn fmt_literal(f: &mut Formatter, literal: &Literal) -> Result {
    match literal {
        Literal::Number(num) => write!(f, "{}", num.value),
        Literal::Symbol(sym) => write!(f, "{}", sym.name),
    }
}

fn fmt_unary(f: &mut Formatter, unary: &Unary, options: FormatOptions) -> Result {
    let square_as_exp = options.style == OperatorStyle::Ascii;
    let parens = match rendered_precedence(&unary.operand, square_as_exp) {
        None => false,
        Some(_) if options.full_parens => true,
        Some(prec) => prec < Precedence::Unary,
    };

    match unary.op.kind {
        UnaryOpKind::Pos => {
            write!(f, "+")?;
            fmt_grouped(f, &unary.operand, parens, options)
        },
        UnaryOpKind::Neg => {
            match options.style {
                OperatorStyle::Ascii => write!(f, "-")?,
                OperatorStyle::Unicode => write!(f, "−")?,
            }
            fmt_grouped(f, &unary.operand, parens, options)
        },
        UnaryOpKind::Sqrt => match options.style {
            // the keyword spelling always parenthesizes its operand for readability
            OperatorStyle::Ascii => {
                write!(f, "sqrt(")?;
                fmt_expr(f, &unary.operand, options)?;
                write!(f, ")")
            },
            OperatorStyle::Unicode => {
                write!(f, "√")?;
                fmt_grouped(f, &unary.operand, parens, options)
            },
        },
        UnaryOpKind::Square => {
            fmt_grouped(f, &unary.operand, parens, options)?;
            match options.style {
                OperatorStyle::Ascii => write!(f, "^2"),
                OperatorStyle::Unicode => write!(f, "²"),
            }
        },
        UnaryOpKind::Cube => {
            fmt_grouped(f, &unary.operand, parens, options)?;
            match options.style {
                OperatorStyle::Ascii => write!(f, "^3"),
                OperatorStyle::Unicode => write!(f, "³"),
            }
        },
        UnaryOpKind::Factorial => {
            fmt_grouped(f, &unary.operand, parens, options)?;
            write!(f, "!")
        },
    }
}

fn fmt_binary(f: &mut Formatter, binary: &Binary, options: FormatOptions) -> Result {
    if binary.op.implicit
        && options.juxtapose
        && !options.full_parens
        && can_juxtapose(&binary.lhs, &binary.rhs, options)
    {
        fmt_operand(f, &binary.lhs, binary, Associativity::Left, options)?;
        return fmt_operand(f, &binary.rhs, binary, Associativity::Right, options);
    }

    fmt_operand(f, &binary.lhs, binary, Associativity::Left, options)?;
    let surface = match options.style {
        OperatorStyle::Ascii => binary.op.kind.surface(),
        OperatorStyle::Unicode => binary.op.kind.surface_unicode(),
    };
    if options.spacing && binary.op.kind != BinOpKind::Exp {
        write!(f, " {} ", surface)?;
    } else {
        write!(f, "{}", surface)?;
    }
    fmt_operand(f, &binary.rhs, binary, Associativity::Right, options)
}

/// Formats one operand of a binary operation, parenthesizing it if grouping requires.
fn fmt_operand(
    f: &mut Formatter,
    child: &Expr,
    parent: &Binary,
    side: Associativity,
    options: FormatOptions,
) -> Result {
    let parens = needs_parens(child, parent, side, options);
    fmt_grouped(f, child, parens, options)
}

fn fmt_grouped(f: &mut Formatter, expr: &Expr, parens: bool, options: FormatOptions) -> Result {
    if parens {
        write!(f, "(")?;
        fmt_expr(f, expr, options)?;
        write!(f, ")")
    } else {
        fmt_expr(f, expr, options)
    }
}

/// The binding precedence an expression renders at when it appears as an operand, or `None`
/// for literals, which never need parentheses.
///
/// When `square_as_exp` is set, the postfix squares count as exponentiation: in ASCII and
/// LaTeX they are spelled `^2`/`^{2}`, and the output must group accordingly.
fn rendered_precedence(expr: &Expr, square_as_exp: bool) -> Option<Precedence> {
    match expr {
        Expr::Literal(_) => None,
        Expr::Unary(unary) => match unary.op.kind {
            UnaryOpKind::Square | UnaryOpKind::Cube if square_as_exp => Some(Precedence::Exp),
            _ => Some(unary.op.precedence()),
        },
        Expr::Binary(binary) => Some(binary.op.precedence()),
    }
}

/// Returns true if the child must be parenthesized on the given side of the parent operation
/// for the output to reparse to the same tree.
fn needs_parens(child: &Expr, parent: &Binary, side: Associativity, options: FormatOptions) -> bool {
    let square_as_exp = options.style == OperatorStyle::Ascii;
    let Some(child_prec) = rendered_precedence(child, square_as_exp) else {
        return false;
    };
    if options.full_parens {
        return true;
    }
    let parent_prec = parent.op.precedence();
    child_prec < parent_prec || (child_prec == parent_prec && side != parent.op.associativity())
}

/// Character classes for the edges of a rendered operand, used to decide whether two operands
/// can be juxtaposed without an explicit operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LeafClass {
    /// The edge is a digit.
    Number,

    /// The edge is part of an identifier (including the `sqrt` keyword in ASCII style).
    Name,

    /// The edge is punctuation that cannot fuse with its neighbor.
    Group,

    /// The edge is a sign, which would reparse as a binary operator.
    Unsafe,
}

/// The class of the first character the right operand will render as.
fn leading_class(expr: &Expr, options: FormatOptions) -> LeafClass {
    match expr {
        Expr::Literal(Literal::Number(_)) => LeafClass::Number,
        Expr::Literal(Literal::Symbol(_)) => LeafClass::Name,
        Expr::Unary(unary) => match unary.op.kind {
            UnaryOpKind::Pos | UnaryOpKind::Neg => LeafClass::Unsafe,
            UnaryOpKind::Sqrt => match options.style {
                OperatorStyle::Ascii => LeafClass::Name,
                OperatorStyle::Unicode => LeafClass::Group,
            },
            // postfix operators render their operand first
            _ => leading_class(&unary.operand, options),
        },
        Expr::Binary(binary) => {
            if binary.op.precedence() <= Precedence::Factor {
                // such an operand is parenthesized on the right of a product
                LeafClass::Group
            } else {
                leading_class(&binary.lhs, options)
            }
        },
    }
}

/// The class of the last character the left operand will render as.
fn trailing_class(expr: &Expr, options: FormatOptions) -> LeafClass {
    match expr {
        Expr::Literal(Literal::Number(_)) => LeafClass::Number,
        Expr::Literal(Literal::Symbol(_)) => LeafClass::Name,
        Expr::Unary(unary) => match unary.op.kind {
            UnaryOpKind::Pos | UnaryOpKind::Neg | UnaryOpKind::Sqrt => {
                trailing_class(&unary.operand, options)
            },
            UnaryOpKind::Square | UnaryOpKind::Cube => match options.style {
                OperatorStyle::Ascii => LeafClass::Number,
                OperatorStyle::Unicode => LeafClass::Group,
            },
            UnaryOpKind::Factorial => LeafClass::Group,
        },
        Expr::Binary(binary) => {
            if binary.op.precedence() < Precedence::Factor {
                // such an operand is parenthesized on the left of a product
                LeafClass::Group
            } else {
                trailing_class(&binary.rhs, options)
            }
        },
    }
}

/// Returns true if rendering the product `lhs rhs` without an operator still reparses as the
/// same product: the right operand must not lead with a digit or sign, and the two sides must
/// not fuse into a single name.
fn can_juxtapose(lhs: &Expr, rhs: &Expr, options: FormatOptions) -> bool {
    match leading_class(rhs, options) {
        LeafClass::Number | LeafClass::Unsafe => false,
        LeafClass::Name => trailing_class(lhs, options) != LeafClass::Name,
        LeafClass::Group => true,
    }
}

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// Helper to format powers.
pub fn fmt_pow(f: &mut Formatter, left: &Expr, right: &Expr) -> Result {
    fmt_pow_base(f, left)?;
    write!(f, "^{{")?;
    right.fmt_latex(f)?;
    write!(f, "}}")
}

/// Formats the base of a power, parenthesizing it when it binds no tighter than the power
/// itself.
fn fmt_pow_base(f: &mut Formatter, base: &Expr) -> Result {
    match rendered_precedence(base, true) {
        Some(prec) if prec <= Precedence::Exp => {
            write!(f, "\\left(")?;
            base.fmt_latex(f)?;
            write!(f, "\\right)")
        },
        _ => base.fmt_latex(f),
    }
}

/// Formats an expression in LaTeX, wrapping it in `\left( \right)` if requested.
fn fmt_latex_grouped(f: &mut Formatter, expr: &Expr, parens: bool) -> Result {
    if parens {
        write!(f, "\\left(")?;
        expr.fmt_latex(f)?;
        write!(f, "\\right)")
    } else {
        expr.fmt_latex(f)
    }
}

impl Latex for Expr {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Expr::Literal(literal) => literal.fmt_latex(f),
            Expr::Unary(unary) => unary.fmt_latex(f),
            Expr::Binary(binary) => binary.fmt_latex(f),
        }
    }
}

impl Latex for Literal {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Literal::Number(num) => write!(f, "{}", num.value),
            Literal::Symbol(sym) => match sym.name.as_str() {
                "pi" => write!(f, "\\pi"),
                "tau" => write!(f, "\\tau"),
                name => write!(f, "{}", name),
            },
        }
    }
}

impl Latex for Unary {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        let parens = rendered_precedence(&self.operand, true)
            .is_some_and(|prec| prec < Precedence::Unary);
        match self.op.kind {
            UnaryOpKind::Pos => {
                write!(f, "+")?;
                fmt_latex_grouped(f, &self.operand, parens)
            },
            UnaryOpKind::Neg => {
                write!(f, "-")?;
                fmt_latex_grouped(f, &self.operand, parens)
            },
            UnaryOpKind::Sqrt => {
                write!(f, "\\sqrt{{")?;
                self.operand.fmt_latex(f)?;
                write!(f, "}}")
            },
            UnaryOpKind::Square => {
                fmt_pow_base(f, &self.operand)?;
                write!(f, "^{{2}}")
            },
            UnaryOpKind::Cube => {
                fmt_pow_base(f, &self.operand)?;
                write!(f, "^{{3}}")
            },
            UnaryOpKind::Factorial => {
                fmt_latex_grouped(f, &self.operand, parens)?;
                write!(f, "!")
            },
        }
    }
}

impl Latex for Binary {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        // LaTeX always uses the Unicode edge classes; `\sqrt{}` and friends never fuse
        let latex_options = FormatOptions {
            style: OperatorStyle::Unicode,
            ..FormatOptions::default()
        };
        match self.op.kind {
            BinOpKind::Exp => fmt_pow(f, &self.lhs, &self.rhs),
            BinOpKind::Div => {
                write!(f, "\\frac{{")?;
                self.lhs.fmt_latex(f)?;
                write!(f, "}}{{")?;
                self.rhs.fmt_latex(f)?;
                write!(f, "}}")
            },
            BinOpKind::Mul => {
                let lhs_parens = needs_parens(&self.lhs, self, Associativity::Left, latex_options);
                let rhs_parens = needs_parens(&self.rhs, self, Associativity::Right, latex_options);
                fmt_latex_grouped(f, &self.lhs, lhs_parens)?;
                if self.op.implicit
                    && !rhs_parens
                    && !matches!(
                        leading_class(&self.rhs, latex_options),
                        LeafClass::Number | LeafClass::Unsafe
                    )
                {
                    // juxtaposition, as in `2x`
                } else {
                    write!(f, "\\cdot ")?;
                }
                fmt_latex_grouped(f, &self.rhs, rhs_parens)
            },
            BinOpKind::Mod => {
                let lhs_parens = needs_parens(&self.lhs, self, Associativity::Left, latex_options);
                let rhs_parens = needs_parens(&self.rhs, self, Associativity::Right, latex_options);
                fmt_latex_grouped(f, &self.lhs, lhs_parens)?;
                write!(f, "\\bmod ")?;
                fmt_latex_grouped(f, &self.rhs, rhs_parens)
            },
            BinOpKind::Add | BinOpKind::Sub => {
                let lhs_parens = needs_parens(&self.lhs, self, Associativity::Left, latex_options);
                let rhs_parens = needs_parens(&self.rhs, self, Associativity::Right, latex_options);
                fmt_latex_grouped(f, &self.lhs, lhs_parens)?;
                write!(f, "{}", self.op.kind.surface())?;
                fmt_latex_grouped(f, &self.rhs, rhs_parens)
            },
        }
    }
}
