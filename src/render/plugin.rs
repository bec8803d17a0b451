//! # Plugin Dispatch
//!
//! A [`Plugin`] renders the node kinds it recognizes and declines the rest.
//! A [`PluginChain`] is an ordered list of plugins: the first plugin that
//! claims a node produces its markup, so user plugins placed ahead of the
//! built-in renderers override them without modifying them.
//!
//! Built-in renderers never call each other directly. They recurse through
//! [`RenderContext::render`], which dispatches back through the full chain,
//! so an override for a leaf kind is honored even deep inside a compound
//! expression.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::ast::Node;
use crate::diagnostics::{AlgotexError, Result};
use crate::render::RenderContext;

// ============================================================================
// PLUGIN TRAIT
// ============================================================================

/// A renderer for some subset of node kinds.
///
/// Return `Ok(None)` to decline a node; dispatch then continues with the next
/// plugin. An error from a claimed node aborts the whole render call.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use algotex::ast::{builder, Node};
/// use algotex::{Plugin, RenderContext, Result, Translator};
///
/// struct Shout;
///
/// impl Plugin for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn render(&self, node: &Node, _ctx: &RenderContext) -> Result<Option<String>> {
///         Ok(match node {
///             Node::Name(id) => Some(format!(r"\mathbf{{{}}}", id.to_uppercase())),
///             _ => None,
///         })
///     }
/// }
///
/// let translator = Translator::builder().plugin(Arc::new(Shout)).build().unwrap();
/// let out = translator.translate(&builder::name("x")).unwrap();
/// assert_eq!(out, r"\mathbf{X}");
/// ```
pub trait Plugin: Send + Sync {
    /// Short name used in dispatch logs.
    fn name(&self) -> &str;

    /// Renders `node`, or declines it with `Ok(None)`.
    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>>;
}

// ============================================================================
// PLUGIN CHAIN
// ============================================================================

/// Ordered plugin list; earlier plugins take priority.
#[derive(Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginChain {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    /// Adds a plugin at the lowest priority.
    pub fn push(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Offers `node` to each plugin in order and returns the first claim.
    ///
    /// Fails with [`AlgotexError::UnhandledNodeKind`] when every plugin
    /// declines.
    pub fn dispatch(&self, node: &Node, ctx: &RenderContext) -> Result<String> {
        for plugin in &self.plugins {
            if let Some(markup) = plugin.render(node, ctx)? {
                trace!("{} rendered {} at depth {}", plugin.name(), node.kind(), ctx.depth());
                return Ok(markup);
            }
        }
        debug!("no plugin claimed {}", node.kind());
        Err(AlgotexError::UnhandledNodeKind { kind: node.kind() })
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
