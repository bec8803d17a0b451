//! Collapses `else: if ...` into an `elif` arm.
//!
//! Parsers emit `elif B` as an `else` block holding a single `If`. When that
//! inner `If` is the only statement of the `else` block, its arms and its own
//! `else` are folded into the outer conditional. An `else` block holding
//! anything besides the conditional is left alone: merging it would move the
//! trailing statements into the last arm.

use crate::ast::Node;
use crate::normalize::rewrite::rewrite_children;

pub fn merge_elif(node: &Node) -> Node {
    match rewrite_children(node, &mut merge_elif) {
        Node::If {
            mut branches,
            orelse,
        } => match <[Node; 1]>::try_from(orelse) {
            Ok([Node::If {
                branches: inner,
                orelse: inner_orelse,
            }]) => {
                branches.extend(inner);
                Node::If {
                    branches,
                    orelse: inner_orelse,
                }
            }
            Ok([single]) => Node::If {
                branches,
                orelse: vec![single],
            },
            Err(orelse) => Node::If { branches, orelse },
        },
        other => other,
    }
}
