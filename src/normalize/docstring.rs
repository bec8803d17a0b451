//! Lifts leading documentation strings into [`FunctionDef::description`].
//!
//! Every string-constant expression statement at the head of a function body
//! is removed from the body. The texts are joined with newlines and appended
//! to any description the tree already carried.

use crate::ast::{Constant, FunctionDef, Node};
use crate::normalize::rewrite::rewrite_children;

pub fn extract_docstrings(node: &Node) -> Node {
    match rewrite_children(node, &mut extract_docstrings) {
        Node::FunctionDef(def) => Node::FunctionDef(lift(def)),
        other => other,
    }
}

fn lift(mut def: FunctionDef) -> FunctionDef {
    let mut texts = Vec::new();
    let mut body = def.body.into_iter().peekable();
    while let Some(Node::Expr(value)) = body.peek() {
        let Node::Constant(Constant::Str(text)) = value.as_ref() else {
            break;
        };
        texts.push(text.trim().to_string());
        body.next();
    }
    def.body = body.collect();

    if !texts.is_empty() {
        let lifted = texts.join("\n");
        def.description = Some(match def.description.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{lifted}"),
            _ => lifted,
        });
    }
    def
}
