//! # AST Builder Helpers
//!
//! Free functions that construct [`Node`] values without spelling out every
//! `Box::new`. The normalizer uses them for its rewrites; tests and embedders
//! use them in place of a source parser.
//!
//! ```rust
//! use algotex::ast::builder::*;
//! use algotex::ast::BinOp;
//! // n = 3 * n + 1
//! let stmt = assign(name("n"), binop(binop(int(3), BinOp::Mult, name("n")), BinOp::Add, int(1)));
//! assert!(stmt.is_statement());
//! ```

use crate::ast::{
    BinOp, BoolOp, Branch, CmpOp, ComprehensionKind, Constant, FunctionDef, Generator, MatchCase,
    Node, Param, Pattern, UnaryOp,
};

// ============================================================================
// EXPRESSIONS
// ============================================================================

pub fn name(id: &str) -> Node {
    Node::Name(id.to_string())
}

pub fn int(value: i64) -> Node {
    Node::Constant(Constant::Int(value))
}

pub fn float(value: f64) -> Node {
    Node::Constant(Constant::Float(value))
}

pub fn string(value: &str) -> Node {
    Node::Constant(Constant::Str(value.to_string()))
}

pub fn boolean(value: bool) -> Node {
    Node::Constant(Constant::Bool(value))
}

pub fn none() -> Node {
    Node::Constant(Constant::None)
}

pub fn attr(value: Node, attr: &str) -> Node {
    Node::Attribute {
        value: Box::new(value),
        attr: attr.to_string(),
    }
}

/// Builds a `Name`/`Attribute` chain from a dotted path such as `"math.pi"`.
pub fn path(dotted: &str) -> Node {
    let mut parts = dotted.split('.');
    let head = name(parts.next().unwrap_or_default());
    parts.fold(head, attr)
}

/// Same as [`path`], from already-split parts.
pub fn path_from_parts<S: AsRef<str>>(parts: &[S]) -> Node {
    let mut iter = parts.iter();
    let head = name(iter.next().map(|s| s.as_ref()).unwrap_or_default());
    iter.fold(head, |value, part| attr(value, part.as_ref()))
}

pub fn unary(op: UnaryOp, operand: Node) -> Node {
    Node::UnaryOp {
        op,
        operand: Box::new(operand),
    }
}

pub fn neg(operand: Node) -> Node {
    unary(UnaryOp::USub, operand)
}

pub fn binop(left: Node, op: BinOp, right: Node) -> Node {
    Node::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// A single comparison `left op right`.
pub fn compare(left: Node, op: CmpOp, right: Node) -> Node {
    Node::Compare {
        left: Box::new(left),
        ops: vec![op],
        comparators: vec![right],
    }
}

/// A comparison chain `left op0 c0 op1 c1 ...`.
pub fn compare_chain(left: Node, rest: Vec<(CmpOp, Node)>) -> Node {
    let (ops, comparators) = rest.into_iter().unzip();
    Node::Compare {
        left: Box::new(left),
        ops,
        comparators,
    }
}

pub fn boolop(op: BoolOp, values: Vec<Node>) -> Node {
    Node::BoolOp { op, values }
}

/// Call of a plain function name.
pub fn call(func: &str, args: Vec<Node>) -> Node {
    call_node(name(func), args)
}

pub fn call_node(func: Node, args: Vec<Node>) -> Node {
    Node::Call {
        func: Box::new(func),
        args,
    }
}

pub fn subscript(value: Node, index: Node) -> Node {
    Node::Subscript {
        value: Box::new(value),
        index: Box::new(index),
    }
}

pub fn tuple(items: Vec<Node>) -> Node {
    Node::Tuple(items)
}

pub fn list(items: Vec<Node>) -> Node {
    Node::List(items)
}

pub fn set(items: Vec<Node>) -> Node {
    Node::Set(items)
}

pub fn generator(target: Node, iter: Node, ifs: Vec<Node>) -> Generator {
    Generator { target, iter, ifs }
}

pub fn comprehension(kind: ComprehensionKind, element: Node, generators: Vec<Generator>) -> Node {
    Node::Comprehension {
        kind,
        element: Box::new(element),
        generators,
    }
}

/// Generator expression `element for target in iter`.
pub fn genexp(element: Node, target: Node, iter: Node) -> Node {
    comprehension(
        ComprehensionKind::Generator,
        element,
        vec![generator(target, iter, vec![])],
    )
}

pub fn lambda(params: &[&str], body: Node) -> Node {
    Node::Lambda {
        params: params.iter().map(|p| p.to_string()).collect(),
        body: Box::new(body),
    }
}

pub fn if_exp(test: Node, body: Node, orelse: Node) -> Node {
    Node::IfExp {
        test: Box::new(test),
        body: Box::new(body),
        orelse: Box::new(orelse),
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

pub fn assign(target: Node, value: Node) -> Node {
    Node::Assign {
        targets: vec![target],
        value: Box::new(value),
    }
}

pub fn aug_assign(target: Node, op: BinOp, value: Node) -> Node {
    Node::AugAssign {
        target: Box::new(target),
        op,
        value: Box::new(value),
    }
}

pub fn expr_stmt(value: Node) -> Node {
    Node::Expr(Box::new(value))
}

/// `if test: body` with an optional `else` block, as a parser emits it
/// (one arm; `elif` appears as a nested `If` inside `orelse`).
pub fn if_stmt(test: Node, body: Vec<Node>, orelse: Vec<Node>) -> Node {
    Node::If {
        branches: vec![Branch { test, body }],
        orelse,
    }
}

pub fn while_stmt(test: Node, body: Vec<Node>) -> Node {
    Node::While {
        test: Box::new(test),
        body,
        orelse: vec![],
    }
}

pub fn for_stmt(target: Node, iter: Node, body: Vec<Node>) -> Node {
    Node::For {
        target: Box::new(target),
        iter: Box::new(iter),
        body,
        orelse: vec![],
    }
}

pub fn match_stmt(subject: Node, cases: Vec<MatchCase>) -> Node {
    Node::Match {
        subject: Box::new(subject),
        cases,
    }
}

/// `case value: body`
pub fn case_value(value: Node, body: Vec<Node>) -> MatchCase {
    MatchCase {
        pattern: Pattern::Value(value),
        body,
    }
}

/// `case _: body`
pub fn case_wildcard(body: Vec<Node>) -> MatchCase {
    MatchCase {
        pattern: Pattern::Wildcard,
        body,
    }
}

pub fn ret(value: Node) -> Node {
    Node::Return(Some(Box::new(value)))
}

pub fn ret_none() -> Node {
    Node::Return(None)
}

pub fn param(name: &str) -> Param {
    Param {
        name: name.to_string(),
        annotation: None,
    }
}

pub fn function(name: &str, params: &[&str], body: Vec<Node>) -> Node {
    Node::FunctionDef(FunctionDef {
        name: name.to_string(),
        params: params.iter().map(|p| param(p)).collect(),
        body,
        description: None,
    })
}
