//! # Rendering
//!
//! Everything that turns a normalized tree into markup: the plugin chain,
//! the immutable render context, and the built-in handlers.
//!
//! | Handler | Claims |
//! |---|---|
//! | [`AlgorithmAssembler`] | statements and function definitions |
//! | [`ExpressionRenderer`] | every expression except identifiers |
//! | [`IdentifierRenderer`] | `Name` and `Attribute` |
//! | [`FunctionStyle`] | definitions in function style (opt-in) |
//! | [`MatrixPlugin`] | array and linear-algebra calls (opt-in) |
//! | [`ArrayTypePlugin`] | `Float[Array, "m n"]` annotations (opt-in) |
//!
//! The three default handlers claim disjoint node kinds, so the chain built
//! by [`append_defaults`] is total over every kind the tree model defines
//! except `AugAssign` (expanded by the normalizer) and `Unsupported`.
//! `Match` is claimed only to be rejected; the function style renders it.

use std::sync::Arc;

// ============================================================================
// MODULES
// ============================================================================

pub mod algorithm;
pub mod array_type;
pub mod calls;
pub mod context;
pub mod expression;
pub mod function;
pub mod identifier;
pub mod matrix;
pub mod plugin;
pub mod precedence;
pub mod table;

pub use algorithm::{AlgorithmAssembler, Layout};
pub use array_type::ArrayTypePlugin;
pub use context::{RenderContext, RenderOptions};
pub use expression::ExpressionRenderer;
pub use function::FunctionStyle;
pub use identifier::IdentifierRenderer;
pub use matrix::MatrixPlugin;
pub use plugin::{Plugin, PluginChain};
pub use table::{Accent, IdentifierEntry, IdentifierRule, IdentifierTable};

// ============================================================================
// DEFAULT CHAIN ASSEMBLY
// ============================================================================

/// Builds a chain from `plugins` followed by the default handlers.
///
/// User plugins keep their order and take precedence; the defaults come
/// last so every built-in node kind is still handled.
///
/// ```rust
/// use algotex::{append_defaults, Layout};
/// let chain = append_defaults(Vec::new(), Layout::Array);
/// assert_eq!(chain.names(), vec!["algorithm", "expression", "identifier"]);
/// ```
pub fn append_defaults(plugins: Vec<Arc<dyn Plugin>>, layout: Layout) -> PluginChain {
    let mut chain = PluginChain::new(plugins);
    register_default_plugins(&mut chain, layout);
    chain
}

fn register_default_plugins(chain: &mut PluginChain, layout: Layout) {
    chain.push(Arc::new(AlgorithmAssembler::new(layout)));
    chain.push(Arc::new(ExpressionRenderer));
    chain.push(Arc::new(IdentifierRenderer));
}
