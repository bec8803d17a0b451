//! Structural child rewriting shared by the normalizer passes.

use crate::ast::{Branch, FunctionDef, Generator, MatchCase, Node, Param, Pattern};

/// Rebuilds `node` with every direct child replaced by `f(child)`.
///
/// Leaves (`Constant`, `Name`, `Pass`, ...) are cloned unchanged. Passes call
/// this first and then transform the result, which makes them bottom-up.
pub fn rewrite_children<F>(node: &Node, f: &mut F) -> Node
where
    F: FnMut(&Node) -> Node,
{
    match node {
        Node::Constant(_)
        | Node::Name(_)
        | Node::Pass
        | Node::Break
        | Node::Continue
        | Node::Unsupported { .. } => node.clone(),
        Node::Attribute { value, attr } => Node::Attribute {
            value: boxed(value, f),
            attr: attr.clone(),
        },
        Node::UnaryOp { op, operand } => Node::UnaryOp {
            op: *op,
            operand: boxed(operand, f),
        },
        Node::BinOp { left, op, right } => Node::BinOp {
            left: boxed(left, f),
            op: *op,
            right: boxed(right, f),
        },
        Node::Compare {
            left,
            ops,
            comparators,
        } => Node::Compare {
            left: boxed(left, f),
            ops: ops.clone(),
            comparators: all(comparators, f),
        },
        Node::BoolOp { op, values } => Node::BoolOp {
            op: *op,
            values: all(values, f),
        },
        Node::Call { func, args } => Node::Call {
            func: boxed(func, f),
            args: all(args, f),
        },
        Node::Subscript { value, index } => Node::Subscript {
            value: boxed(value, f),
            index: boxed(index, f),
        },
        Node::Tuple(items) => Node::Tuple(all(items, f)),
        Node::List(items) => Node::List(all(items, f)),
        Node::Set(items) => Node::Set(all(items, f)),
        Node::Dict { keys, values } => Node::Dict {
            keys: all(keys, f),
            values: all(values, f),
        },
        Node::Comprehension {
            kind,
            element,
            generators,
        } => {
            let element = boxed(element, f);
            let mut rewritten = Vec::with_capacity(generators.len());
            for generator in generators {
                rewritten.push(Generator {
                    target: f(&generator.target),
                    iter: f(&generator.iter),
                    ifs: all(&generator.ifs, f),
                });
            }
            Node::Comprehension {
                kind: *kind,
                element,
                generators: rewritten,
            }
        }
        Node::Lambda { params, body } => Node::Lambda {
            params: params.clone(),
            body: boxed(body, f),
        },
        Node::IfExp { test, body, orelse } => Node::IfExp {
            test: boxed(test, f),
            body: boxed(body, f),
            orelse: boxed(orelse, f),
        },
        Node::Assign { targets, value } => Node::Assign {
            targets: all(targets, f),
            value: boxed(value, f),
        },
        Node::AugAssign { target, op, value } => Node::AugAssign {
            target: boxed(target, f),
            op: *op,
            value: boxed(value, f),
        },
        Node::AnnAssign {
            target,
            annotation,
            value,
        } => Node::AnnAssign {
            target: boxed(target, f),
            annotation: boxed(annotation, f),
            value: match value {
                Some(value) => Some(boxed(value, f)),
                None => None,
            },
        },
        Node::Expr(value) => Node::Expr(boxed(value, f)),
        Node::If { branches, orelse } => {
            let mut rewritten = Vec::with_capacity(branches.len());
            for branch in branches {
                rewritten.push(Branch {
                    test: f(&branch.test),
                    body: all(&branch.body, f),
                });
            }
            Node::If {
                branches: rewritten,
                orelse: all(orelse, f),
            }
        }
        Node::While { test, body, orelse } => Node::While {
            test: boxed(test, f),
            body: all(body, f),
            orelse: all(orelse, f),
        },
        Node::For {
            target,
            iter,
            body,
            orelse,
        } => Node::For {
            target: boxed(target, f),
            iter: boxed(iter, f),
            body: all(body, f),
            orelse: all(orelse, f),
        },
        Node::Match { subject, cases } => {
            let subject = boxed(subject, f);
            let mut rewritten = Vec::with_capacity(cases.len());
            for case in cases {
                rewritten.push(MatchCase {
                    pattern: match &case.pattern {
                        Pattern::Value(value) => Pattern::Value(f(value)),
                        other => other.clone(),
                    },
                    body: all(&case.body, f),
                });
            }
            Node::Match {
                subject,
                cases: rewritten,
            }
        }
        Node::Return(value) => Node::Return(match value {
            Some(value) => Some(boxed(value, f)),
            None => None,
        }),
        Node::FunctionDef(def) => {
            let mut params = Vec::with_capacity(def.params.len());
            for param in &def.params {
                params.push(Param {
                    name: param.name.clone(),
                    annotation: match &param.annotation {
                        Some(annotation) => Some(f(annotation)),
                        None => None,
                    },
                });
            }
            Node::FunctionDef(FunctionDef {
                name: def.name.clone(),
                params,
                body: all(&def.body, f),
                description: def.description.clone(),
            })
        }
    }
}

fn boxed<F>(node: &Node, f: &mut F) -> Box<Node>
where
    F: FnMut(&Node) -> Node,
{
    Box::new(f(node))
}

fn all<F>(nodes: &[Node], f: &mut F) -> Vec<Node>
where
    F: FnMut(&Node) -> Node,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        out.push(f(node));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;
    use crate::ast::BinOp;

    fn rename(node: &Node) -> Node {
        match rewrite_children(node, &mut rename) {
            Node::Name(id) if id == "a" => name("b"),
            other => other,
        }
    }

    #[test]
    fn test_rewrites_every_depth() {
        let tree = function(
            "f",
            &["x"],
            vec![
                assign(name("a"), binop(name("a"), BinOp::Add, int(1))),
                ret(call("g", vec![name("a")])),
            ],
        );
        let expected = function(
            "f",
            &["x"],
            vec![
                assign(name("b"), binop(name("b"), BinOp::Add, int(1))),
                ret(call("g", vec![name("b")])),
            ],
        );
        assert_eq!(rename(&tree), expected);
    }

    #[test]
    fn test_rewrites_match_arms() {
        let tree = match_stmt(
            name("a"),
            vec![case_value(name("a"), vec![ret(int(1))]), case_wildcard(vec![ret(name("a"))])],
        );
        let expected = match_stmt(
            name("b"),
            vec![case_value(name("b"), vec![ret(int(1))]), case_wildcard(vec![ret(name("b"))])],
        );
        assert_eq!(rename(&tree), expected);
    }

    #[test]
    fn test_identity_leaves_input_untouched() {
        let tree = if_stmt(name("c"), vec![Node::Pass], vec![Node::Break]);
        let copy = rewrite_children(&tree, &mut |n: &Node| n.clone());
        assert_eq!(copy, tree);
    }
}
