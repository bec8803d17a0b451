//! # Tree Normalizer
//!
//! Canonicalizes tree shapes before rendering so that the plugins see one
//! spelling of each construct.
//!
//! ## Passes, in order
//!
//! 1. augmented assignment expansion (`x += 1` → `x = x + 1`)
//! 2. prefix trimming (`math.sqrt` → `sqrt`), when configured
//! 3. identifier replacement, when configured
//! 4. docstring extraction into [`FunctionDef::description`](crate::ast::FunctionDef)
//! 5. elif merging (`else: if` → one conditional with several arms)
//!
//! ## Invariants
//!
//! - The input tree is never modified; every pass returns a fresh tree.
//! - Normalization cannot fail. Prefixes and replacements are validated when
//!   the [`Normalizer`] is built.
//! - Elif merging runs last, so arms produced by earlier passes are merged
//!   too.

use std::collections::BTreeMap;

use log::debug;

use crate::ast::Node;
use crate::diagnostics::Result;

// ============================================================================
// MODULES
// ============================================================================

pub mod aug_assign;
pub mod docstring;
pub mod elif;
pub mod prefix;
pub mod replace;
pub mod rewrite;

pub use aug_assign::expand_aug_assign;
pub use docstring::extract_docstrings;
pub use elif::merge_elif;
pub use prefix::PrefixTrimmer;
pub use replace::IdentifierReplacer;
pub use rewrite::rewrite_children;

// ============================================================================
// NORMALIZER
// ============================================================================

/// The configured pass pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalizer {
    prefixes: Option<PrefixTrimmer>,
    replacer: Option<IdentifierReplacer>,
}

impl Normalizer {
    /// A normalizer running only the structural passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables prefix trimming. An empty set disables it.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trimmer = PrefixTrimmer::new(prefixes)?;
        self.prefixes = (!trimmer.is_empty()).then_some(trimmer);
        Ok(self)
    }

    /// Enables identifier replacement. An empty mapping disables it.
    pub fn with_replacements(mut self, mapping: BTreeMap<String, String>) -> Result<Self> {
        let replacer = IdentifierReplacer::new(mapping)?;
        self.replacer = (!replacer.is_empty()).then_some(replacer);
        Ok(self)
    }

    /// Runs every pass over `tree` and returns the canonical tree.
    pub fn normalize(&self, tree: &Node) -> Node {
        debug!("normalizing {} tree", tree.kind());
        let mut node = expand_aug_assign(tree);
        if let Some(trimmer) = &self.prefixes {
            node = trimmer.apply(&node);
        }
        if let Some(replacer) = &self.replacer {
            node = replacer.apply(&node);
        }
        node = extract_docstrings(&node);
        merge_elif(&node)
    }
}
