//! `x op= v` becomes `x = x op v`.
//!
//! The block assembler only knows plain assignment, so every augmented
//! assignment is expanded before rendering.

use crate::ast::builder::{assign, binop};
use crate::ast::Node;
use crate::normalize::rewrite::rewrite_children;

pub fn expand_aug_assign(node: &Node) -> Node {
    match rewrite_children(node, &mut expand_aug_assign) {
        Node::AugAssign { target, op, value } => {
            let current = target.as_ref().clone();
            assign(*target, binop(current, op, *value))
        }
        other => other,
    }
}
