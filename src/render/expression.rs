//! # Expression Renderer
//!
//! Renders every expression node except identifiers. Operands are rendered
//! through the plugin chain and then grouped according to the precedence
//! table; grouping is emitted only when leaving it out would change the
//! parsed meaning.
//!
//! Special shapes layered over the general rule:
//!
//! - `a / b` is a fraction and `a // b` a floor-bracketed fraction; neither
//!   groups its operands.
//! - `a ** b` puts `b` in a superscript, which is never grouped.
//! - `a * b` drops `\cdot` where juxtaposition is unambiguous (`3 n`).
//! - `x[i][j]` collapses into `x_{i, j}`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::algotex_err;
use crate::ast::{BinOp, BoolOp, CmpOp, ComprehensionKind, Constant, Generator, Node, UnaryOp};
use crate::diagnostics::Result;
use crate::render::calls;
use crate::render::precedence::{needs_grouping, precedence_of, Side, RANK_ATOM};
use crate::render::{Plugin, RenderContext};

// ============================================================================
// OPERATOR MARKUP
// ============================================================================

/// `(left, middle, right)` markup around the two operands.
fn binop_markup(op: BinOp, set_symbols: bool) -> (&'static str, &'static str, &'static str) {
    match (op, set_symbols) {
        (BinOp::Pow, _) => ("", "^{", "}"),
        (BinOp::Mult | BinOp::MatMult, _) => ("", r" \cdot ", ""),
        (BinOp::Div, _) => (r"\frac{", "}{", "}"),
        (BinOp::FloorDiv, _) => (r"\left\lfloor\frac{", "}{", r"}\right\rfloor"),
        (BinOp::Mod, _) => ("", r" \mathbin{\%} ", ""),
        (BinOp::Add, _) => ("", " + ", ""),
        (BinOp::Sub, false) => ("", " - ", ""),
        (BinOp::Sub, true) => ("", r" \setminus ", ""),
        (BinOp::LShift, _) => ("", r" \ll ", ""),
        (BinOp::RShift, _) => ("", r" \gg ", ""),
        (BinOp::BitAnd, false) => ("", r" \mathbin{\&} ", ""),
        (BinOp::BitAnd, true) => ("", r" \cap ", ""),
        (BinOp::BitXor, false) => ("", r" \oplus ", ""),
        (BinOp::BitXor, true) => ("", r" \mathbin{\triangle} ", ""),
        (BinOp::BitOr, false) => ("", r" \mathbin{|} ", ""),
        (BinOp::BitOr, true) => ("", r" \cup ", ""),
    }
}

fn unary_markup(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Invert => r"\mathord{\sim} ",
        UnaryOp::UAdd => "+",
        UnaryOp::USub => "-",
        UnaryOp::Not => r"\lnot ",
    }
}

fn compare_markup(op: CmpOp, set_symbols: bool) -> &'static str {
    match (op, set_symbols) {
        (CmpOp::Eq, _) => "=",
        (CmpOp::NotEq, _) => r"\ne",
        (CmpOp::Lt, false) => "<",
        (CmpOp::Lt, true) => r"\subset",
        (CmpOp::LtE, false) => r"\le",
        (CmpOp::LtE, true) => r"\subseteq",
        (CmpOp::Gt, false) => ">",
        (CmpOp::Gt, true) => r"\supset",
        (CmpOp::GtE, false) => r"\ge",
        (CmpOp::GtE, true) => r"\supseteq",
        (CmpOp::Is, _) => r"\equiv",
        (CmpOp::IsNot, _) => r"\not\equiv",
        (CmpOp::In, _) => r"\in",
        (CmpOp::NotIn, _) => r"\notin",
    }
}

fn boolop_markup(op: BoolOp) -> &'static str {
    match op {
        BoolOp::And => r" \land ",
        BoolOp::Or => r" \lor ",
    }
}

/// Escapes characters that are special in LaTeX text mode.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '%' | '&' | '_' | '{' | '}' | '#' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Wraps markup in auto-sized grouping parentheses.
pub fn wrap_parens(latex: &str) -> String {
    format!(r"\mathopen{{}}\left( {latex} \mathclose{{}}\right)")
}

// ============================================================================
// PLUGIN
// ============================================================================

/// Built-in handler for every expression kind except `Name`/`Attribute`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionRenderer;

impl Plugin for ExpressionRenderer {
    fn name(&self) -> &str {
        "expression"
    }

    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
        let latex = match node {
            Node::Constant(value) => render_constant(value),
            Node::UnaryOp { op, operand } => render_unary(*op, operand, ctx)?,
            Node::BinOp { left, op, right } => render_binop(left, *op, right, ctx)?,
            Node::Compare {
                left,
                ops,
                comparators,
            } => render_compare(node, left, ops, comparators, ctx)?,
            Node::BoolOp { op, values } => {
                let parent = op.precedence();
                let parts = values
                    .iter()
                    .map(|v| operand(v, ctx, needs_grouping(parent, precedence_of(v), Side::Left)))
                    .collect::<Result<Vec<_>>>()?;
                parts.join(boolop_markup(*op))
            }
            Node::Call { func, args } => calls::render_call(node, func, args, ctx)?,
            Node::Subscript { .. } => render_subscript(node, ctx)?,
            Node::Tuple(items) => wrap_parens(&ctx.render_joined(items, ", ")?),
            Node::List(items) => format!(
                r"\mathopen{{}}\left[ {} \mathclose{{}}\right]",
                ctx.render_joined(items, ", ")?
            ),
            Node::Set(items) => format!(
                r"\mathopen{{}}\left\{{ {} \mathclose{{}}\right\}}",
                ctx.render_joined(items, ", ")?
            ),
            Node::Dict { keys, values } => render_dict(keys, values, ctx)?,
            Node::Comprehension {
                kind,
                element,
                generators,
            } => render_comprehension(*kind, element, generators, ctx)?,
            Node::Lambda { params, body } => {
                let params = params
                    .iter()
                    .map(|p| ctx.render(&Node::Name(p.clone())))
                    .collect::<Result<Vec<_>>>()?;
                let params = match params.as_slice() {
                    [single] => single.clone(),
                    _ => wrap_parens(&params.join(", ")),
                };
                format!(r"{} \mapsto {}", params, ctx.render(body)?)
            }
            Node::IfExp { .. } => render_if_exp(node, ctx)?,
            _ => return Ok(None),
        };
        Ok(Some(latex))
    }
}

/// Renders `node`, grouping it when `wrap` is set.
fn operand(node: &Node, ctx: &RenderContext, wrap: bool) -> Result<String> {
    let latex = ctx.render(node)?;
    Ok(if wrap { wrap_parens(&latex) } else { latex })
}

// ============================================================================
// LITERALS
// ============================================================================

pub fn render_constant(value: &Constant) -> String {
    match value {
        Constant::Int(n) => n.to_string(),
        Constant::Float(x) if x.is_nan() => r"\mathrm{NaN}".to_string(),
        Constant::Float(x) if x.is_infinite() => {
            if x.is_sign_negative() {
                r"-\infty".to_string()
            } else {
                r"\infty".to_string()
            }
        }
        Constant::Float(x) => format!("{x:?}"),
        Constant::Str(s) => format!(r#"\textrm{{"{}"}}"#, escape_text(s)),
        Constant::Bool(true) => r"\mathrm{True}".to_string(),
        Constant::Bool(false) => r"\mathrm{False}".to_string(),
        Constant::None => r"\mathrm{None}".to_string(),
        Constant::Ellipsis => r"\cdots".to_string(),
    }
}

// ============================================================================
// OPERATORS
// ============================================================================

fn render_unary(op: UnaryOp, operand_node: &Node, ctx: &RenderContext) -> Result<String> {
    let sign = matches!(op, UnaryOp::USub | UnaryOp::UAdd);
    let stacked_sign = sign && starts_with_sign(operand_node);
    let wrap = stacked_sign
        || needs_grouping(op.precedence(), precedence_of(operand_node), Side::Only);
    Ok(format!("{}{}", unary_markup(op), operand(operand_node, ctx, wrap)?))
}

/// Whether the markup of `node` begins with `+` or `-`.
fn starts_with_sign(node: &Node) -> bool {
    match node {
        Node::UnaryOp { op, .. } => matches!(op, UnaryOp::USub | UnaryOp::UAdd),
        Node::Constant(Constant::Int(n)) => *n < 0,
        Node::Constant(Constant::Float(x)) => x.is_sign_negative() && !x.is_nan(),
        Node::BinOp { left, op, .. } if !matches!(op, BinOp::Div | BinOp::FloorDiv | BinOp::Pow) => {
            starts_with_sign(left)
        }
        _ => false,
    }
}

fn render_binop(
    left: &Node,
    op: BinOp,
    right: &Node,
    ctx: &RenderContext,
) -> Result<String> {
    let parent = op.precedence();
    let (open, middle, close) = binop_markup(op, ctx.options().use_set_symbols);

    let (left_latex, right_latex) = match op {
        BinOp::Div | BinOp::FloorDiv => (ctx.render(left)?, ctx.render(right)?),
        BinOp::Pow => (
            operand(left, ctx, needs_grouping(parent, precedence_of(left), Side::Left))?,
            ctx.render(right)?,
        ),
        _ => {
            let absorbed = matches!(right, Node::BinOp { op: child, .. } if op.absorbs_right(*child));
            let signed = matches!(op, BinOp::Add | BinOp::Sub) && starts_with_sign(right);
            let wrap_right = signed
                || (!absorbed && needs_grouping(parent, precedence_of(right), Side::Right));
            (
                operand(left, ctx, needs_grouping(parent, precedence_of(left), Side::Left))?,
                operand(right, ctx, wrap_right)?,
            )
        }
    };

    // `(a % b) * c` juxtaposed would read as `a % (b c)`.
    let mixed_left = matches!(left, Node::BinOp { op: child, .. }
        if *child != op
            && child.precedence() == parent
            && !matches!(child, BinOp::Div | BinOp::FloorDiv));
    if matches!(op, BinOp::Mult | BinOp::MatMult)
        && !mixed_left
        && implicit_multiply(left, &left_latex, right, &right_latex)
    {
        return Ok(format!("{left_latex} {right_latex}"));
    }

    Ok(format!("{open}{left_latex}{middle}{right_latex}{close}"))
}

fn render_compare(
    node: &Node,
    left: &Node,
    ops: &[CmpOp],
    comparators: &[Node],
    ctx: &RenderContext,
) -> Result<String> {
    if ops.is_empty() || ops.len() != comparators.len() {
        return Err(algotex_err!(
            Unsupported,
            "comparison with {} operators and {} operands",
            ops.len(),
            comparators.len()
        ));
    }
    let parent = precedence_of(node);
    let set_symbols = ctx.options().use_set_symbols;
    let mut latex = operand(left, ctx, needs_grouping(parent, precedence_of(left), Side::Left))?;
    for (op, comparator) in ops.iter().zip(comparators) {
        let rhs = operand(
            comparator,
            ctx,
            needs_grouping(parent, precedence_of(comparator), Side::Right),
        )?;
        latex.push_str(&format!(" {} {}", compare_markup(*op, set_symbols), rhs));
    }
    Ok(latex)
}

// ============================================================================
// IMPLICIT MULTIPLICATION
// ============================================================================

static ENDS_WITH_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*\\mathclose[^ ]+$").expect("bracket pattern is valid"));
static UPRIGHT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\mathrm\{[^ ]+\}$").expect("word pattern is valid"));

/// Shape of the markup at the boundary of a product operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Function,
    Bracket,
    Word,
    Number,
    Letter,
    Other,
}

fn leaf_boundary(node: &Node) -> Boundary {
    match node {
        Node::Name(id) if id.chars().count() == 1 => Boundary::Letter,
        _ => Boundary::Other,
    }
}

/// Whether `a * b` may be typeset as `a b`.
///
/// Juxtaposition is used when the left operand ends in a number or a
/// bracket, or both sides are plain variables. A number or a leading minus
/// on the right always keeps the `\cdot`.
fn implicit_multiply(
    left: &Node,
    left_latex: &str,
    right: &Node,
    right_latex: &str,
) -> bool {
    let left_kind = if matches!(left, Node::Call { .. }) {
        Boundary::Function
    } else if ENDS_WITH_BRACKET.is_match(left_latex) {
        Boundary::Bracket
    } else if UPRIGHT_WORD.is_match(left_latex) {
        Boundary::Word
    } else if left_latex.chars().last().map_or(false, |c| c.is_ascii_digit()) {
        Boundary::Number
    } else {
        let mut leaf = left;
        loop {
            leaf = match leaf {
                Node::UnaryOp { operand, .. } => operand.as_ref(),
                Node::BinOp { right, .. } => right.as_ref(),
                Node::Compare { comparators, .. } => match comparators.last() {
                    Some(last) => last,
                    None => break,
                },
                Node::BoolOp { values, .. } => match values.last() {
                    Some(last) => last,
                    None => break,
                },
                _ => break,
            };
        }
        leaf_boundary(leaf)
    };

    let right_kind = if matches!(right, Node::Call { .. }) {
        Boundary::Function
    } else if right_latex.starts_with(r"\mathopen") {
        Boundary::Bracket
    } else if right_latex.starts_with(r"\mathrm") {
        Boundary::Word
    } else if right_latex.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        Boundary::Number
    } else {
        let mut leaf = right;
        loop {
            leaf = match leaf {
                Node::UnaryOp {
                    op: UnaryOp::USub, ..
                } => return false,
                Node::UnaryOp { operand, .. } => operand.as_ref(),
                Node::BinOp { left, .. } | Node::Compare { left, .. } => left.as_ref(),
                Node::BoolOp { values, .. } => match values.first() {
                    Some(first) => first,
                    None => break,
                },
                _ => break,
            };
        }
        leaf_boundary(leaf)
    };

    let plain = |b: Boundary| matches!(b, Boundary::Letter | Boundary::Other);
    if right_kind == Boundary::Number {
        return false;
    }
    if matches!(left_kind, Boundary::Bracket | Boundary::Number) {
        return true;
    }
    plain(left_kind) && plain(right_kind)
}

// ============================================================================
// SUBSCRIPTS & COLLECTIONS
// ============================================================================

/// Collapses `x[i][j]` into `x_{i, j}`.
fn render_subscript(node: &Node, ctx: &RenderContext) -> Result<String> {
    let mut indices = Vec::new();
    let mut value = node;
    while let Node::Subscript { value: inner, index } = value {
        indices.push(index.as_ref());
        value = inner;
    }
    indices.reverse();

    let mut rendered = Vec::with_capacity(indices.len());
    for index in indices {
        match index {
            Node::Tuple(items) => rendered.push(ctx.render_joined(items, ", ")?),
            other => rendered.push(ctx.render(other)?),
        }
    }

    let base = operand(value, ctx, precedence_of(value).rank != RANK_ATOM)?;
    Ok(format!("{}_{{{}}}", base, rendered.join(", ")))
}

fn render_dict(keys: &[Node], values: &[Node], ctx: &RenderContext) -> Result<String> {
    if keys.len() != values.len() {
        return Err(algotex_err!(
            Unsupported,
            "dictionary with {} keys and {} values",
            keys.len(),
            values.len()
        ));
    }
    let pairs = keys
        .iter()
        .zip(values)
        .map(|(k, v)| Ok(format!(r"{} \mapsto {}", ctx.render(k)?, ctx.render(v)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        r"\mathopen{{}}\left\{{ {} \mathclose{{}}\right\}}",
        pairs.join(", ")
    ))
}

/// `x \in xs` followed by any filter conditions joined with `\land`.
pub fn render_generator(generator: &Generator, ctx: &RenderContext) -> Result<String> {
    let head = format!(
        r"{} \in {}",
        ctx.render(&generator.target)?,
        ctx.render(&generator.iter)?
    );
    if generator.ifs.is_empty() {
        return Ok(head);
    }
    let mut conditions = vec![wrap_parens(&head)];
    for condition in &generator.ifs {
        conditions.push(wrap_parens(&ctx.render(condition)?));
    }
    Ok(conditions.join(r" \land "))
}

fn render_comprehension(
    kind: ComprehensionKind,
    element: &Node,
    generators: &[Generator],
    ctx: &RenderContext,
) -> Result<String> {
    let (open, close) = match kind {
        ComprehensionKind::List => (r"\left[", r"\right]"),
        ComprehensionKind::Set => (r"\left\{", r"\right\}"),
        ComprehensionKind::Generator => (r"\left(", r"\right)"),
    };
    let generators = generators
        .iter()
        .map(|g| render_generator(g, ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        r"\mathopen{{}}{} {} \mid {} \mathclose{{}}{}",
        open,
        ctx.render(element)?,
        generators.join(", "),
        close
    ))
}

// ============================================================================
// CONDITIONAL EXPRESSIONS
// ============================================================================

/// `a if c else b if d else e` → a cases block with one row per arm.
fn render_if_exp(node: &Node, ctx: &RenderContext) -> Result<String> {
    let mut rows = Vec::new();
    let mut current = node;
    while let Node::IfExp { test, body, orelse } = current {
        rows.push(format!(
            r"{}, & \mathrm{{if}} \ {}",
            ctx.render(body)?,
            ctx.render(test)?
        ));
        current = orelse;
    }
    rows.push(format!(r"{}, & \mathrm{{otherwise}}", ctx.render(current)?));
    Ok(format!(
        r"\left\{{ \begin{{array}}{{ll}} {} \end{{array}} \right.",
        rows.join(r" \\ ")
    ))
}
