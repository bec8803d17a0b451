//! # Precedence Table
//!
//! Ranks and associativity of every operator token, plus the rank of every
//! node shape when it appears as an operand. Parenthesization decisions in
//! the expression renderer are made only through [`needs_grouping`], so the
//! answer for a given `(parent, child, side)` triple is single-valued.
//!
//! Ranks follow the source language's binding strength. Two shapes are
//! placed deliberately:
//!
//! - unary-style function application (`\sin x`) binds tighter than unary
//!   minus but looser than `**`, so `\sin (-x)` and `(\sin x)^{2}` keep
//!   their parentheses;
//! - a fraction is self-delimiting, so it only needs grouping as the base of
//!   a power.

use crate::ast::{BinOp, BoolOp, CmpOp, Constant, Node, UnaryOp};
use crate::render::calls;

// ============================================================================
// RANKS
// ============================================================================

pub const RANK_LAMBDA: u32 = 0;
pub const RANK_OR: u32 = 10;
pub const RANK_AND: u32 = 20;
pub const RANK_COMPARE: u32 = 40;
pub const RANK_BIT_OR: u32 = 50;
pub const RANK_BIT_XOR: u32 = 60;
pub const RANK_BIT_AND: u32 = 70;
pub const RANK_SHIFT: u32 = 80;
pub const RANK_ADDITIVE: u32 = 90;
pub const RANK_MULTIPLICATIVE: u32 = 100;
pub const RANK_UNARY: u32 = 110;
pub const RANK_CALL: u32 = RANK_UNARY + 1;
pub const RANK_FRACTION: u32 = 115;
pub const RANK_POW: u32 = 120;
/// Literals, names, bracketed forms: never need grouping.
pub const RANK_ATOM: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
    None,
}

/// One entry of the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precedence {
    pub rank: u32,
    pub assoc: Assoc,
}

/// Position of an operand relative to its operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    /// Sole operand of a prefix operator or unary-style call.
    Only,
}

impl Precedence {
    pub const fn new(rank: u32, assoc: Assoc) -> Self {
        Self { rank, assoc }
    }

    pub const ATOM: Precedence = Precedence::new(RANK_ATOM, Assoc::None);
    pub const CALL: Precedence = Precedence::new(RANK_CALL, Assoc::Right);
    pub const UNARY: Precedence = Precedence::new(RANK_UNARY, Assoc::Right);
    pub const FRACTION: Precedence = Precedence::new(RANK_FRACTION, Assoc::None);
    pub const LAMBDA: Precedence = Precedence::new(RANK_LAMBDA, Assoc::Right);
}

// ============================================================================
// OPERATOR TOKENS
// ============================================================================

impl BinOp {
    pub fn precedence(self) -> Precedence {
        match self {
            BinOp::Pow => Precedence::new(RANK_POW, Assoc::Right),
            BinOp::Mult | BinOp::MatMult | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => {
                Precedence::new(RANK_MULTIPLICATIVE, Assoc::Left)
            }
            BinOp::Add | BinOp::Sub => Precedence::new(RANK_ADDITIVE, Assoc::Left),
            BinOp::LShift | BinOp::RShift => Precedence::new(RANK_SHIFT, Assoc::Left),
            BinOp::BitAnd => Precedence::new(RANK_BIT_AND, Assoc::Left),
            BinOp::BitXor => Precedence::new(RANK_BIT_XOR, Assoc::Left),
            BinOp::BitOr => Precedence::new(RANK_BIT_OR, Assoc::Left),
        }
    }

    /// Whether `a self (b child c)` means the same as `a self b child c`.
    ///
    /// Holds for associative operators applied to themselves, and for `+`
    /// followed by `-`.
    pub fn absorbs_right(self, child: BinOp) -> bool {
        match self {
            BinOp::Add => matches!(child, BinOp::Add | BinOp::Sub),
            BinOp::Mult | BinOp::MatMult | BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor => {
                self == child
            }
            _ => false,
        }
    }
}

impl UnaryOp {
    /// `not` shares the rank of the arithmetic prefix operators because
    /// `\lnot` reads as tightly binding.
    pub fn precedence(self) -> Precedence {
        Precedence::UNARY
    }
}

impl CmpOp {
    pub fn precedence(self) -> Precedence {
        Precedence::new(RANK_COMPARE, Assoc::None)
    }
}

impl BoolOp {
    pub fn precedence(self) -> Precedence {
        match self {
            BoolOp::And => Precedence::new(RANK_AND, Assoc::Left),
            BoolOp::Or => Precedence::new(RANK_OR, Assoc::Left),
        }
    }
}

// ============================================================================
// NODE RANKS
// ============================================================================

/// Precedence of the markup a node renders to, seen from its parent.
///
/// Total over every node shape; shapes that render bracketed or atomic
/// markup report [`Precedence::ATOM`].
pub fn precedence_of(node: &Node) -> Precedence {
    match node {
        Node::BinOp { op: BinOp::FloorDiv, .. } => Precedence::ATOM,
        Node::BinOp { op: BinOp::Div, .. } => Precedence::FRACTION,
        Node::BinOp { op, .. } => op.precedence(),
        Node::UnaryOp { op, .. } => op.precedence(),
        Node::Compare { ops, .. } => ops
            .first()
            .map(|op| op.precedence())
            .unwrap_or(Precedence::ATOM),
        Node::BoolOp { op, .. } => op.precedence(),
        Node::Call { .. } if calls::renders_as_operator(node) => Precedence::CALL,
        Node::Constant(Constant::Int(n)) if *n < 0 => Precedence::UNARY,
        Node::Constant(Constant::Float(x)) if x.is_sign_negative() && !x.is_nan() => {
            Precedence::UNARY
        }
        Node::Lambda { .. } => Precedence::LAMBDA,
        _ => Precedence::ATOM,
    }
}

/// Decides whether an operand needs explicit grouping delimiters.
///
/// Groups iff the operand binds looser than the operator, or binds equally
/// and sits on the side the operator does not associate towards.
pub fn needs_grouping(parent: Precedence, child: Precedence, side: Side) -> bool {
    if child.rank != parent.rank {
        return child.rank < parent.rank;
    }
    match (parent.assoc, side) {
        (Assoc::None, _) => true,
        (Assoc::Left, Side::Right) => true,
        (Assoc::Right, Side::Left) => true,
        _ => false,
    }
}
