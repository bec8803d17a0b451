//! Immutable per-call render state shared by every plugin.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::diagnostics::Result;
use crate::render::table::IdentifierTable;
use crate::render::PluginChain;

/// Switches that change how built-in renderers typeset their nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Greek letters, decoration suffixes and subscript splitting.
    pub use_math_symbols: bool,
    /// Set-theoretic symbols for `-`, `&`, `^`, `|` and order comparisons.
    pub use_set_symbols: bool,
    /// Wrap multi-letter identifiers in `\mathrm{}`.
    pub use_mathrm: bool,
    /// Show `f(x) =` in front of function-style output.
    pub use_signature: bool,
    /// Emit a function's description as a comment line.
    pub show_descriptions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            use_math_symbols: false,
            use_set_symbols: false,
            use_mathrm: true,
            use_signature: true,
            show_descriptions: false,
        }
    }
}

/// Everything a plugin may consult while rendering one node.
///
/// Cloning is cheap: the chain and identifier table are shared. Contexts are
/// never mutated; [`RenderContext::nested`] returns a new one for the next
/// indentation level.
#[derive(Clone)]
pub struct RenderContext {
    chain: Arc<PluginChain>,
    identifiers: Arc<IdentifierTable>,
    options: RenderOptions,
    depth: usize,
}

impl RenderContext {
    pub fn new(
        chain: Arc<PluginChain>,
        identifiers: Arc<IdentifierTable>,
        options: RenderOptions,
    ) -> Self {
        Self {
            chain,
            identifiers,
            options,
            depth: 0,
        }
    }

    /// Renders `node` by dispatching it through the full plugin chain.
    pub fn render(&self, node: &Node) -> Result<String> {
        self.chain.dispatch(node, self)
    }

    /// Renders every node and joins the results with `separator`.
    pub fn render_joined(&self, nodes: &[Node], separator: &str) -> Result<String> {
        let parts = nodes
            .iter()
            .map(|node| self.render(node))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(separator))
    }

    /// Context for the statements one indentation level deeper.
    pub fn nested(&self) -> Self {
        self.at_depth(self.depth + 1)
    }

    pub fn at_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            ..self.clone()
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn identifiers(&self) -> &IdentifierTable {
        &self.identifiers
    }

    pub fn chain(&self) -> &PluginChain {
        &self.chain
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("chain", &self.chain)
            .field("identifiers", &self.identifiers.len())
            .field("options", &self.options)
            .field("depth", &self.depth)
            .finish()
    }
}
