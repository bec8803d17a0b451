//! # algotex
//!
//! Translates a function's syntax tree into LaTeX pseudocode.
//!
//! ```rust
//! use algotex::ast::builder::*;
//! use algotex::ast::{BinOp, CmpOp};
//!
//! // def f(n):
//! //     while n > 1:
//! //         n = n - 1
//! //     return n
//! let tree = function(
//!     "f",
//!     &["n"],
//!     vec![
//!         while_stmt(
//!             compare(name("n"), CmpOp::Gt, int(1)),
//!             vec![assign(name("n"), binop(name("n"), BinOp::Sub, int(1)))],
//!         ),
//!         ret(name("n")),
//!     ],
//! );
//! let latex = algotex::translate(&tree).unwrap();
//! assert!(latex.starts_with(r"\begin{array}{l} \mathbf{function} \ f(n)"));
//! assert!(latex.contains(r"\hspace{2em} n \gets n - 1"));
//! ```

pub use crate::diagnostics::{AlgotexError, ErrorType, Result};
pub use crate::engine::{Style, Translator, TranslatorBuilder, TranslatorConfig};
pub use crate::render::{
    append_defaults, Accent, IdentifierEntry, IdentifierRule, IdentifierTable, Layout, Plugin,
    PluginChain, RenderContext, RenderOptions,
};

pub mod ast;
pub mod diagnostics;
pub mod engine;
pub mod normalize;
pub mod render;

/// Translates `tree` with the default configuration.
pub fn translate(tree: &ast::Node) -> Result<String> {
    Translator::new(TranslatorConfig::default())?.translate(tree)
}
