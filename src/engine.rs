//! # Translation Engine
//!
//! Wires the pipeline together: configuration is validated once into a
//! [`Translator`], which then normalizes and renders any number of trees.
//!
//! ```text
//! tree ──► Normalizer ──► RenderContext::render ──► markup
//!                          (user plugins, style plugins, defaults)
//! ```
//!
//! A `Translator` holds only immutable, shared state, so one instance can
//! serve concurrent translations from several threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::diagnostics::{AlgotexError, Result};
use crate::normalize::Normalizer;
use crate::render::{
    append_defaults, ArrayTypePlugin, FunctionStyle, IdentifierEntry, IdentifierTable, Layout,
    MatrixPlugin, Plugin, RenderContext, RenderOptions,
};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// How a function definition is typeset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Line-by-line pseudocode with block keywords.
    #[default]
    Algorithmic,
    /// A mathematical definition `f(x) = ...`.
    Function,
}

/// Complete translator configuration.
///
/// Every field has a default, so a JSON document only names what it changes:
///
/// ```rust
/// use algotex::{Layout, Style, TranslatorConfig};
/// let config = TranslatorConfig::from_json(r#"{"style": "function", "use_math_symbols": true}"#).unwrap();
/// assert_eq!(config.style, Style::Function);
/// assert_eq!(config.layout, Layout::Array);
/// assert!(config.use_mathrm);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub style: Style,
    pub layout: Layout,
    pub use_math_symbols: bool,
    pub use_set_symbols: bool,
    pub use_mathrm: bool,
    pub use_signature: bool,
    pub show_descriptions: bool,
    /// Adds [`MatrixPlugin`] ahead of the defaults.
    pub matrix: bool,
    /// Adds [`ArrayTypePlugin`] ahead of the defaults.
    pub array_types: bool,
    pub identifiers: Vec<IdentifierEntry>,
    pub prefixes: Vec<String>,
    pub replacements: BTreeMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            style: Style::default(),
            layout: Layout::default(),
            use_math_symbols: options.use_math_symbols,
            use_set_symbols: options.use_set_symbols,
            use_mathrm: options.use_mathrm,
            use_signature: options.use_signature,
            show_descriptions: options.show_descriptions,
            matrix: false,
            array_types: false,
            identifiers: Vec::new(),
            prefixes: Vec::new(),
            replacements: BTreeMap::new(),
        }
    }
}

impl TranslatorConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AlgotexError::InvalidConfig {
            message: e.to_string(),
        })
    }

    fn options(&self) -> RenderOptions {
        RenderOptions {
            use_math_symbols: self.use_math_symbols,
            use_set_symbols: self.use_set_symbols,
            use_mathrm: self.use_mathrm,
            use_signature: self.use_signature,
            show_descriptions: self.show_descriptions,
        }
    }
}

// ============================================================================
// TRANSLATOR
// ============================================================================

/// A validated, reusable translation pipeline.
#[derive(Debug, Clone)]
pub struct Translator {
    normalizer: Normalizer,
    context: RenderContext,
}

impl Translator {
    /// Builds a translator with only the built-in plugins.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        Self::with_plugins(config, Vec::new())
    }

    /// Builds a translator whose chain starts with `plugins`.
    ///
    /// # Errors
    ///
    /// Configuration errors (`AmbiguousIdentifierMapping`, `InvalidConfig`)
    /// are reported here, never from a render call.
    pub fn with_plugins(config: TranslatorConfig, plugins: Vec<Arc<dyn Plugin>>) -> Result<Self> {
        let normalizer = Normalizer::new()
            .with_prefixes(&config.prefixes)?
            .with_replacements(config.replacements.clone())?;
        let identifiers = IdentifierTable::from_entries(config.identifiers.iter().cloned())?;

        let mut plugins = plugins;
        if config.style == Style::Function {
            plugins.push(Arc::new(FunctionStyle));
        }
        if config.matrix {
            plugins.push(Arc::new(MatrixPlugin::new()));
        }
        if config.array_types {
            plugins.push(Arc::new(ArrayTypePlugin));
        }
        let chain = append_defaults(plugins, config.layout);
        debug!("plugin chain: {:?}", chain.names());

        let context = RenderContext::new(Arc::new(chain), Arc::new(identifiers), config.options());
        Ok(Self {
            normalizer,
            context,
        })
    }

    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::default()
    }

    /// Normalizes and renders `tree`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use algotex::ast::builder::*;
    /// use algotex::Translator;
    /// let tree = function("f", &["x"], vec![ret(name("x"))]);
    /// let out = Translator::builder().build().unwrap().translate(&tree).unwrap();
    /// assert_eq!(
    ///     out,
    ///     r"\begin{array}{l} \mathbf{function} \ f(x) \\ \hspace{1em} \mathbf{return} \ x \\ \mathbf{end\ function} \end{array}"
    /// );
    /// ```
    pub fn translate(&self, tree: &Node) -> Result<String> {
        let normalized = self.normalizer.normalize(tree);
        self.context.render(&normalized)
    }

    /// Translates a tree handed over as JSON by the parsing collaborator.
    ///
    /// A malformed document is reported as `UpstreamParseFailure` with the
    /// `serde_json` error as its source.
    pub fn translate_json(&self, json: &str) -> Result<String> {
        let tree: Node = serde_json::from_str(json).map_err(AlgotexError::upstream)?;
        self.translate(&tree)
    }

    /// Renders a single expression without normalization.
    pub fn render_expression(&self, expr: &Node) -> Result<String> {
        self.context.render(expr)
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Programmatic counterpart of [`TranslatorConfig`].
#[derive(Default, Clone)]
pub struct TranslatorBuilder {
    config: TranslatorConfig,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl TranslatorBuilder {
    pub fn config(mut self, config: TranslatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.config.style = style;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn use_math_symbols(mut self, enabled: bool) -> Self {
        self.config.use_math_symbols = enabled;
        self
    }

    pub fn use_set_symbols(mut self, enabled: bool) -> Self {
        self.config.use_set_symbols = enabled;
        self
    }

    pub fn use_mathrm(mut self, enabled: bool) -> Self {
        self.config.use_mathrm = enabled;
        self
    }

    pub fn use_signature(mut self, enabled: bool) -> Self {
        self.config.use_signature = enabled;
        self
    }

    pub fn show_descriptions(mut self, enabled: bool) -> Self {
        self.config.show_descriptions = enabled;
        self
    }

    pub fn matrix(mut self, enabled: bool) -> Self {
        self.config.matrix = enabled;
        self
    }

    pub fn array_types(mut self, enabled: bool) -> Self {
        self.config.array_types = enabled;
        self
    }

    pub fn identifier(mut self, entry: IdentifierEntry) -> Self {
        self.config.identifiers.push(entry);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefixes.push(prefix.into());
        self
    }

    pub fn replace(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.config.replacements.insert(from.into(), to.into());
        self
    }

    /// Appends a plugin ahead of the built-in ones, after earlier plugins.
    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn build(self) -> Result<Translator> {
        Translator::with_plugins(self.config, self.plugins)
    }
}
