//! AST module for algotex
//!
//! This module provides the syntax tree consumed by the translation pipeline.
//! Trees are produced by an external parsing collaborator (directly, through
//! the [`builder`] helpers, or as JSON through serde) and are treated as
//! immutable values: every stage that rewrites a tree returns a new one.

// ============================================================================
// IMPORTS
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::ast::ops::{BinOp, BoolOp, CmpOp, UnaryOp};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

static IDENTIFIER_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("identifier path pattern is valid")
});

/// Whether `s` is a single identifier such as `alpha` or `x_1`.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Whether `s` is a dotted identifier path such as `math.pi`.
pub fn is_identifier_path(s: &str) -> bool {
    IDENTIFIER_PATH.is_match(s)
}

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A literal value appearing in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    Ellipsis,
}

/// One `if`/`elif` arm: a condition and the statements guarded by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub test: Node,
    pub body: Vec<Node>,
}

/// One `for target in iter if cond ...` clause of a comprehension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub target: Node,
    pub iter: Node,
    #[serde(default)]
    pub ifs: Vec<Node>,
}

/// Which brackets a comprehension produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComprehensionKind {
    List,
    Set,
    Generator,
}

/// What a `case` arm compares the match subject against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// `case 0:` matches when the subject equals the value.
    Value(Node),
    /// `case _:`
    Wildcard,
    /// Captures, sequences, class patterns and the other forms the
    /// translator does not typeset.
    Unsupported { kind: String },
}

/// One `case pattern: body` arm of a `match` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Vec<Node>,
}

/// A function parameter with its optional annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<Node>,
}

/// A function definition, possibly nested inside another body.
///
/// `description` holds leading documentation strings once the normalizer has
/// lifted them out of `body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    pub body: Vec<Node>,
    #[serde(default)]
    pub description: Option<String>,
}

/// The core syntax tree node: expressions and statements share one type.
///
/// # Examples
///
/// ```rust
/// use algotex::ast::{Node, NodeKind};
/// let node = Node::Name("x".to_string());
/// assert_eq!(node.kind(), NodeKind::Name);
/// assert!(!node.is_statement());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    // --- expressions ---
    Constant(Constant),
    Name(String),
    Attribute {
        value: Box<Node>,
        attr: String,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Node>,
    },
    BinOp {
        left: Box<Node>,
        op: BinOp,
        right: Box<Node>,
    },
    /// Comparison chain: `left ops[0] comparators[0] ops[1] comparators[1] ...`
    Compare {
        left: Box<Node>,
        ops: Vec<CmpOp>,
        comparators: Vec<Node>,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<Node>,
    },
    Call {
        func: Box<Node>,
        #[serde(default)]
        args: Vec<Node>,
    },
    Subscript {
        value: Box<Node>,
        index: Box<Node>,
    },
    Tuple(Vec<Node>),
    List(Vec<Node>),
    Set(Vec<Node>),
    Dict {
        keys: Vec<Node>,
        values: Vec<Node>,
    },
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Node>,
        generators: Vec<Generator>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Node>,
    },
    IfExp {
        test: Box<Node>,
        body: Box<Node>,
        orelse: Box<Node>,
    },

    // --- statements ---
    Assign {
        targets: Vec<Node>,
        value: Box<Node>,
    },
    AugAssign {
        target: Box<Node>,
        op: BinOp,
        value: Box<Node>,
    },
    AnnAssign {
        target: Box<Node>,
        annotation: Box<Node>,
        #[serde(default)]
        value: Option<Box<Node>>,
    },
    /// Expression evaluated as a statement.
    Expr(Box<Node>),
    /// Conditional with its `if`/`elif` arms in order and the final `else`.
    If {
        branches: Vec<Branch>,
        #[serde(default)]
        orelse: Vec<Node>,
    },
    While {
        test: Box<Node>,
        body: Vec<Node>,
        #[serde(default)]
        orelse: Vec<Node>,
    },
    For {
        target: Box<Node>,
        iter: Box<Node>,
        body: Vec<Node>,
        #[serde(default)]
        orelse: Vec<Node>,
    },
    Match {
        subject: Box<Node>,
        cases: Vec<MatchCase>,
    },
    Return(Option<Box<Node>>),
    Pass,
    Break,
    Continue,
    FunctionDef(FunctionDef),

    /// Placeholder for a syntax category the parser saw but the tree model
    /// does not cover. No built-in handler claims it.
    Unsupported {
        kind: String,
    },
}

/// Field-less tag of a [`Node`] variant, used for dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Constant,
    Name,
    Attribute,
    UnaryOp,
    BinOp,
    Compare,
    BoolOp,
    Call,
    Subscript,
    Tuple,
    List,
    Set,
    Dict,
    Comprehension,
    Lambda,
    IfExp,
    Assign,
    AugAssign,
    AnnAssign,
    Expr,
    If,
    While,
    For,
    Match,
    Return,
    Pass,
    Break,
    Continue,
    FunctionDef,
    Unsupported,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Node {
    /// Returns the variant tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Constant(_) => NodeKind::Constant,
            Node::Name(_) => NodeKind::Name,
            Node::Attribute { .. } => NodeKind::Attribute,
            Node::UnaryOp { .. } => NodeKind::UnaryOp,
            Node::BinOp { .. } => NodeKind::BinOp,
            Node::Compare { .. } => NodeKind::Compare,
            Node::BoolOp { .. } => NodeKind::BoolOp,
            Node::Call { .. } => NodeKind::Call,
            Node::Subscript { .. } => NodeKind::Subscript,
            Node::Tuple(_) => NodeKind::Tuple,
            Node::List(_) => NodeKind::List,
            Node::Set(_) => NodeKind::Set,
            Node::Dict { .. } => NodeKind::Dict,
            Node::Comprehension { .. } => NodeKind::Comprehension,
            Node::Lambda { .. } => NodeKind::Lambda,
            Node::IfExp { .. } => NodeKind::IfExp,
            Node::Assign { .. } => NodeKind::Assign,
            Node::AugAssign { .. } => NodeKind::AugAssign,
            Node::AnnAssign { .. } => NodeKind::AnnAssign,
            Node::Expr(_) => NodeKind::Expr,
            Node::If { .. } => NodeKind::If,
            Node::While { .. } => NodeKind::While,
            Node::For { .. } => NodeKind::For,
            Node::Match { .. } => NodeKind::Match,
            Node::Return(_) => NodeKind::Return,
            Node::Pass => NodeKind::Pass,
            Node::Break => NodeKind::Break,
            Node::Continue => NodeKind::Continue,
            Node::FunctionDef(_) => NodeKind::FunctionDef,
            Node::Unsupported { .. } => NodeKind::Unsupported,
        }
    }

    /// Whether this node is a statement rather than an expression.
    pub fn is_statement(&self) -> bool {
        self.kind().is_statement()
    }

    /// Flattens a `Name`/`Attribute` chain into its dotted parts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use algotex::ast::builder::path;
    /// let node = path("numpy.random.rand");
    /// assert_eq!(node.attribute_path(), Some(vec!["numpy", "random", "rand"]));
    /// ```
    pub fn attribute_path(&self) -> Option<Vec<&str>> {
        match self {
            Node::Name(id) => Some(vec![id.as_str()]),
            Node::Attribute { value, attr } => {
                let mut parts = value.attribute_path()?;
                parts.push(attr.as_str());
                Some(parts)
            }
            _ => None,
        }
    }

    /// Name of the called function for `f(...)` and `obj.f(...)` calls.
    pub fn callee_name(&self) -> Option<&str> {
        let Node::Call { func, .. } = self else {
            return None;
        };
        match func.as_ref() {
            Node::Name(id) => Some(id.as_str()),
            Node::Attribute { attr, .. } => Some(attr.as_str()),
            _ => None,
        }
    }

    /// The integer value of an `Int` constant, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Constant(Constant::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Whether this is a string constant (the shape of a docstring).
    pub fn is_str_constant(&self) -> bool {
        matches!(self, Node::Constant(Constant::Str(_)))
    }
}

impl NodeKind {
    /// Whether nodes of this kind are statements.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Assign
                | NodeKind::AugAssign
                | NodeKind::AnnAssign
                | NodeKind::Expr
                | NodeKind::If
                | NodeKind::While
                | NodeKind::For
                | NodeKind::Match
                | NodeKind::Return
                | NodeKind::Pass
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::FunctionDef
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// MODULE EXPORTS
// ============================================================================

pub mod builder;
pub mod ops;
