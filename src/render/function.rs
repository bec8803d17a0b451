//! Function style: a function body typeset as a mathematical definition.
//!
//! ```text
//! def f(x):            f(x) = \left\{ \begin{array}{ll}
//!     if x > 0:              x, & \mathrm{if} \ x > 0 \\
//!         return x           -x, & \mathrm{otherwise}
//!     else:                \end{array} \right.
//!         return -x
//! ```
//!
//! The body must be a run of assignments followed by a `return`, a
//! conditional whose every arm is a single `return`, or a `match` over
//! literal values that ends in a `case _:` arm. Anything else is reported
//! as unsupported rather than approximated.

use crate::algotex_err;
use crate::ast::{Branch, FunctionDef, MatchCase, Node, Pattern};
use crate::diagnostics::Result;
use crate::render::algorithm::render_params;
use crate::render::{Plugin, RenderContext};

/// Plugin claiming `FunctionDef`, `Assign`, `Return`, `If` and `Match`.
///
/// The translator places it ahead of the default handlers so that it
/// overrides the algorithm assembler for those kinds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionStyle;

impl Plugin for FunctionStyle {
    fn name(&self) -> &str {
        "function-style"
    }

    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
        let latex = match node {
            Node::FunctionDef(def) => render_definition(def, ctx)?,
            Node::Assign { targets, value } => {
                let mut operands = Vec::with_capacity(targets.len() + 1);
                for target in targets {
                    operands.push(ctx.render(target)?);
                }
                operands.push(ctx.render(value)?);
                operands.join(" = ")
            }
            Node::Return(Some(value)) => ctx.render(value)?,
            Node::Return(None) => r"\mathrm{None}".to_string(),
            Node::If { branches, orelse } => render_cases(branches, orelse, ctx)?,
            Node::Match { subject, cases } => render_match(subject, cases, ctx)?,
            _ => return Ok(None),
        };
        Ok(Some(latex))
    }
}

fn render_definition(def: &FunctionDef, ctx: &RenderContext) -> Result<String> {
    let Some((last, leading)) = def.body.split_last() else {
        return Err(algotex_err!(Unsupported, "function `{}` has an empty body", def.name));
    };

    let mut lines = Vec::new();
    for statement in leading {
        match statement {
            Node::Expr(value) if matches!(value.as_ref(), Node::Constant(_)) => continue,
            Node::Assign { .. } => lines.push(ctx.render(statement)?),
            other => {
                return Err(algotex_err!(
                    Unsupported,
                    "function style supports only assignments before the result, got {}",
                    other.kind()
                ))
            }
        }
    }

    if !matches!(last, Node::Return(_) | Node::If { .. } | Node::Match { .. }) {
        return Err(algotex_err!(
            Unsupported,
            "function style needs a return or conditional as the last statement, got {}",
            last.kind()
        ));
    }

    let mut result = ctx.render(last)?;
    if ctx.options().use_signature {
        let name = ctx.render(&Node::Name(def.name.clone()))?;
        result = format!("{}({}) = {}", name, render_params(def, ctx)?, result);
    }

    if lines.is_empty() {
        return Ok(result);
    }
    lines.push(result);
    Ok(format!(r"\begin{{array}}{{l}} {} \end{{array}}", lines.join(r" \\ ")))
}

fn render_cases(branches: &[Branch], orelse: &[Node], ctx: &RenderContext) -> Result<String> {
    let single = |body: &[Node]| -> Result<String> {
        match body {
            [statement] => ctx.render(statement),
            _ => Err(algotex_err!(
                Unsupported,
                "each conditional arm must hold exactly one statement"
            )),
        }
    };

    let mut rows = Vec::with_capacity(branches.len() + 1);
    for branch in branches {
        rows.push(format!(
            r"{}, & \mathrm{{if}} \ {}",
            single(&branch.body)?,
            ctx.render(&branch.test)?
        ));
    }
    rows.push(format!(r"{}, & \mathrm{{otherwise}}", single(orelse)?));
    Ok(cases(&rows))
}

/// `match x` over literal values, closed by a wildcard arm.
fn render_match(subject: &Node, arms: &[MatchCase], ctx: &RenderContext) -> Result<String> {
    let Some((last, leading)) = arms.split_last() else {
        return Err(algotex_err!(Unsupported, "match statement without any case"));
    };
    if leading.is_empty() || last.pattern != Pattern::Wildcard {
        return Err(algotex_err!(
            Unsupported,
            "match statement must end with a wildcard case after at least one value case"
        ));
    }

    let result = |arm: &MatchCase| -> Result<String> {
        match arm.body.as_slice() {
            [statement @ Node::Return(_)] => ctx.render(statement),
            _ => Err(algotex_err!(
                Unsupported,
                "each match case must hold exactly one return statement"
            )),
        }
    };

    let subject = ctx.render(subject)?;
    let mut rows = Vec::with_capacity(arms.len());
    for arm in leading {
        let value = match &arm.pattern {
            Pattern::Value(value) => ctx.render(value)?,
            Pattern::Wildcard => {
                return Err(algotex_err!(Unsupported, "wildcard case before the last case"))
            }
            Pattern::Unsupported { kind } => {
                return Err(algotex_err!(Unsupported, "match pattern {}", kind))
            }
        };
        rows.push(format!(
            r"{}, & \mathrm{{if}} \ {} = {}",
            result(arm)?,
            subject,
            value
        ));
    }
    rows.push(format!(r"{}, & \mathrm{{otherwise}}", result(last)?));
    Ok(cases(&rows))
}

fn cases(rows: &[String]) -> String {
    format!(
        r"\left\{{ \begin{{array}}{{ll}} {} \end{{array}} \right.",
        rows.join(r" \\ ")
    )
}
