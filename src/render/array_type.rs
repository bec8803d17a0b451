//! Opt-in plugin for shape-annotated array types.
//!
//! `Float[Array, "m n"]` renders as `\mathbb{R}^{m \times n}` and
//! `Int[Array, "n"]` as `\mathbb{Z}^{n}`, so parameter and variable
//! annotations read as the sets their values live in. Any other subscript is
//! declined.

use crate::ast::{Constant, Node};
use crate::diagnostics::Result;
use crate::render::{Plugin, RenderContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayTypePlugin;

impl Plugin for ArrayTypePlugin {
    fn name(&self) -> &str {
        "array-types"
    }

    fn render(&self, node: &Node, _ctx: &RenderContext) -> Result<Option<String>> {
        let Node::Subscript { value, index } = node else {
            return Ok(None);
        };
        let field = match value.as_ref() {
            Node::Name(id) if id == "Float" => r"\mathbb{R}",
            Node::Name(id) if id == "Int" => r"\mathbb{Z}",
            _ => return Ok(None),
        };
        let Node::Tuple(items) = index.as_ref() else {
            return Ok(None);
        };
        let [Node::Name(container), Node::Constant(Constant::Str(shape))] = items.as_slice() else {
            return Ok(None);
        };
        if container != "Array" {
            return Ok(None);
        }
        Ok(Some(array_type(field, shape)))
    }
}

/// A blank shape is a scalar.
fn array_type(field: &str, shape: &str) -> String {
    let dims: Vec<String> = shape
        .split_whitespace()
        .map(|dim| dim.replace('_', r"\_"))
        .collect();
    if dims.is_empty() {
        return field.to_string();
    }
    format!("{}^{{{}}}", field, dims.join(r" \times "))
}
