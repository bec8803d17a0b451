//! Opt-in plugin for array and linear-algebra calls.
//!
//! Recognizes `array`/`ndarray` literals, `zeros`, `identity`, `transpose`,
//! `det`, `matrix_rank`, `matrix_power`, `inv`, `pinv` and `grad` by callee name
//! (so `np.linalg.inv(A)` matches too). Calls whose arguments do not have
//! the expected shape are declined and fall through to the default call
//! rendering.

use crate::ast::{Constant, Node};
use crate::diagnostics::Result;
use crate::render::expression::wrap_parens;
use crate::render::{Plugin, RenderContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixPlugin {
    pinv_symbol: String,
}

impl Default for MatrixPlugin {
    fn default() -> Self {
        Self {
            pinv_symbol: r"\dagger".to_string(),
        }
    }
}

impl MatrixPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Superscript used for the pseudo-inverse.
    pub fn with_pinv_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.pinv_symbol = symbol.into();
        self
    }
}

impl Plugin for MatrixPlugin {
    fn name(&self) -> &str {
        "matrix"
    }

    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
        let Node::Call { args, .. } = node else {
            return Ok(None);
        };
        match (node.callee_name(), args.as_slice()) {
            (Some("array" | "ndarray"), [data]) => bmatrix(data, ctx),
            (Some("zeros"), [shape]) => Ok(zeros(shape)),
            (Some("identity"), [n]) => Ok(n.as_int().map(|n| format!(r"\mathbf{{I}}_{{{n}}}"))),
            (Some("transpose"), [Node::Name(id)]) => Ok(Some(format!(r"{}^\intercal", bold(id)))),
            (Some("det"), [operand]) => Ok(matrix_operand(operand, ctx)?
                .map(|m| format!(r"\det \mathopen{{}}\left( {m} \mathclose{{}}\right)"))),
            (Some("matrix_rank"), [operand]) => Ok(matrix_operand(operand, ctx)?
                .map(|m| format!(r"\mathrm{{rank}} \mathopen{{}}\left( {m} \mathclose{{}}\right)"))),
            (Some("matrix_power"), [operand, Node::Constant(Constant::Int(k))]) => {
                Ok(matrix_operand(operand, ctx)?.map(|m| format!("{m}^{{{k}}}")))
            }
            (Some("inv"), [operand]) => {
                Ok(matrix_operand(operand, ctx)?.map(|m| format!("{m}^{{-1}}")))
            }
            (Some("pinv"), [operand]) => Ok(matrix_operand(operand, ctx)?
                .map(|m| format!("{}^{{{}}}", m, self.pinv_symbol))),
            (Some("grad"), [operand]) => {
                Ok(Some(format!(r"\nabla {}", wrap_parens(&ctx.render(operand)?))))
            }
            _ => Ok(None),
        }
    }
}

/// A bold matrix name, or an inline literal matrix.
fn matrix_operand(node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
    match node {
        Node::Name(id) => Ok(Some(bold(id))),
        Node::List(_) => bmatrix(node, ctx),
        _ => Ok(None),
    }
}

fn bold(id: &str) -> String {
    format!(r"\mathbf{{{}}}", id.replace('_', r"\_"))
}

/// `[[a, b], [c, d]]` → `\begin{bmatrix} a & b \\ c & d \end{bmatrix}`.
///
/// A flat list is a single row. Ragged or empty data is declined.
fn bmatrix(data: &Node, ctx: &RenderContext) -> Result<Option<String>> {
    let Node::List(rows) = data else {
        return Ok(None);
    };
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    let cells: Vec<Vec<&Node>> = match first {
        Node::List(first_row) => {
            if first_row.is_empty() {
                return Ok(None);
            }
            let mut cells = Vec::with_capacity(rows.len());
            for row in rows {
                match row {
                    Node::List(items) if items.len() == first_row.len() => {
                        cells.push(items.iter().collect())
                    }
                    _ => return Ok(None),
                }
            }
            cells
        }
        _ => vec![rows.iter().collect()],
    };

    let mut lines = Vec::with_capacity(cells.len());
    for row in cells {
        let rendered = row
            .into_iter()
            .map(|cell| ctx.render(cell))
            .collect::<Result<Vec<_>>>()?;
        lines.push(rendered.join(" & "));
    }
    Ok(Some(format!(
        r"\begin{{bmatrix}} {} \end{{bmatrix}}",
        lines.join(r" \\ ")
    )))
}

/// `zeros(n)` → `\mathbf{0}^{1 \times n}`; `zeros((m, n))` → `\mathbf{0}^{m \times n}`.
fn zeros(shape: &Node) -> Option<String> {
    let dims: Vec<i64> = match shape {
        Node::Tuple(items) => {
            let dims = items.iter().map(Node::as_int).collect::<Option<Vec<_>>>()?;
            if dims.is_empty() {
                return Some("0".to_string());
            }
            if dims.len() == 1 {
                vec![1, dims[0]]
            } else {
                dims
            }
        }
        other => vec![1, other.as_int()?],
    };
    let dims = dims
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(r" \times ");
    Some(format!(r"\mathbf{{0}}^{{{dims}}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;
    use crate::ast::BinOp;

    fn render(node: &Node) -> String {
        crate::Translator::builder()
            .matrix(true)
            .build()
            .unwrap()
            .render_expression(node)
            .unwrap()
    }

    #[test]
    fn test_grad() {
        assert_eq!(
            render(&call("grad", vec![name("f")])),
            r"\nabla \mathopen{}\left( f \mathclose{}\right)"
        );
        assert_eq!(
            render(&call_node(path("jax.grad"), vec![binop(name("x"), BinOp::Pow, int(2))])),
            r"\nabla \mathopen{}\left( x^{2} \mathclose{}\right)"
        );
    }

    #[test]
    fn test_grad_of_two_arguments_is_declined() {
        let out = render(&call("grad", vec![name("f"), name("x")]));
        assert!(out.starts_with(r"\mathrm{grad}"), "{out}");
    }

    #[test]
    fn test_zeros_shapes() {
        assert_eq!(zeros(&int(3)), Some(r"\mathbf{0}^{1 \times 3}".to_string()));
        assert_eq!(zeros(&tuple(vec![])), Some("0".to_string()));
        assert_eq!(zeros(&name("n")), None);
    }
}
