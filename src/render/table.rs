//! # Identifier Table
//!
//! Exact overrides for identifier rendering, keyed by a name or a dotted
//! path. A table entry pre-empts every naming convention the identifier
//! renderer would otherwise apply.
//!
//! The table is validated once, when a translator is built: each key must be
//! an identifier (or, for literal markup, a dotted identifier path) and no
//! key may appear twice.

use im::HashMap;
use serde::{Deserialize, Serialize};

use crate::algotex_err;
use crate::ast::{is_identifier, is_identifier_path};
use crate::diagnostics::{AlgotexError, Result};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A diacritic placed over an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Hat,
    Bar,
    Tilde,
    Dot,
    Ddot,
    Vec,
}

impl Accent {
    /// The markup command, without its argument.
    pub fn command(self) -> &'static str {
        match self {
            Accent::Hat => r"\widehat",
            Accent::Bar => r"\overline",
            Accent::Tilde => r"\widetilde",
            Accent::Dot => r"\dot",
            Accent::Ddot => r"\ddot",
            Accent::Vec => r"\vec",
        }
    }

    /// Maps a snake-case name suffix (`hat` in `y_hat`) to its accent.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "hat" => Some(Accent::Hat),
            "bar" => Some(Accent::Bar),
            "tilde" => Some(Accent::Tilde),
            "dot" => Some(Accent::Dot),
            "ddot" => Some(Accent::Ddot),
            "vec" => Some(Accent::Vec),
            _ => None,
        }
    }

    /// Wraps already-rendered markup in this accent.
    pub fn apply(self, base: &str) -> String {
        format!("{}{{{}}}", self.command(), base)
    }
}

/// How a table key is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierRule {
    /// Emit this markup verbatim.
    Literal(String),
    /// Render the key normally, then place an accent over it.
    Accent(Accent),
    /// Emit a named symbol command such as `\lambda`.
    Symbol(String),
    /// Split the key at its first underscore into base and subscript,
    /// whether or not math symbols are enabled.
    Subscript,
}

impl IdentifierRule {
    fn allows_dotted_key(&self) -> bool {
        matches!(self, IdentifierRule::Literal(_))
    }
}

/// One `(key, rule)` pair as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierEntry {
    pub key: String,
    pub rule: IdentifierRule,
}

impl IdentifierEntry {
    pub fn new(key: impl Into<String>, rule: IdentifierRule) -> Self {
        Self {
            key: key.into(),
            rule,
        }
    }
}

/// Validated, immutable key-to-rule mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifierTable {
    rules: HashMap<String, IdentifierRule>,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> IdentifierTableBuilder {
        IdentifierTableBuilder::default()
    }

    /// Validates and collects configuration entries.
    ///
    /// # Errors
    ///
    /// - [`AlgotexError::AmbiguousIdentifierMapping`] when a key repeats.
    /// - [`AlgotexError::InvalidConfig`] when a key is not an identifier, or
    ///   a non-literal rule is given a dotted key.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = IdentifierEntry>,
    {
        let mut rules = HashMap::new();
        for IdentifierEntry { key, rule } in entries {
            validate_key(&key, &rule)?;
            if rules.contains_key(&key) {
                return Err(AlgotexError::AmbiguousIdentifierMapping { key });
            }
            rules.insert(key, rule);
        }
        Ok(Self { rules })
    }

    pub fn get(&self, key: &str) -> Option<&IdentifierRule> {
        self.rules.get(key)
    }

    /// Finds the longest leading run of `parts` whose dotted join is a key.
    ///
    /// Returns how many parts matched together with the rule.
    pub fn longest_prefix(&self, parts: &[&str]) -> Option<(usize, &IdentifierRule)> {
        (1..=parts.len())
            .rev()
            .find_map(|n| self.get(&parts[..n].join(".")).map(|rule| (n, rule)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate_key(key: &str, rule: &IdentifierRule) -> Result<()> {
    if is_identifier(key) {
        return Ok(());
    }
    if rule.allows_dotted_key() && is_identifier_path(key) {
        return Ok(());
    }
    Err(algotex_err!(
        InvalidConfig,
        "`{}` is not a valid identifier table key for a {:?} rule",
        key,
        rule
    ))
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects entries in order; validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct IdentifierTableBuilder {
    entries: Vec<IdentifierEntry>,
}

impl IdentifierTableBuilder {
    pub fn entry(mut self, entry: IdentifierEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn literal(self, key: &str, markup: &str) -> Self {
        self.entry(IdentifierEntry::new(key, IdentifierRule::Literal(markup.to_string())))
    }

    pub fn accent(self, key: &str, accent: Accent) -> Self {
        self.entry(IdentifierEntry::new(key, IdentifierRule::Accent(accent)))
    }

    pub fn symbol(self, key: &str, symbol: &str) -> Self {
        self.entry(IdentifierEntry::new(key, IdentifierRule::Symbol(symbol.to_string())))
    }

    pub fn subscript(self, key: &str) -> Self {
        self.entry(IdentifierEntry::new(key, IdentifierRule::Subscript))
    }

    pub fn build(self) -> Result<IdentifierTable> {
        IdentifierTable::from_entries(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_is_ambiguous() {
        let err = IdentifierTable::builder()
            .literal("alpha", r"\alpha")
            .symbol("alpha", "beta")
            .build()
            .unwrap_err();
        match err {
            AlgotexError::AmbiguousIdentifierMapping { key } => assert_eq!(key, "alpha"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dotted_keys_only_for_literals() {
        assert!(IdentifierTable::builder()
            .literal("math.pi", r"\pi")
            .build()
            .is_ok());
        let err = IdentifierTable::builder()
            .accent("a.b", Accent::Hat)
            .build()
            .unwrap_err();
        assert!(matches!(err, AlgotexError::InvalidConfig { .. }));
        let err = IdentifierTable::builder()
            .literal("1x", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, AlgotexError::InvalidConfig { .. }));
    }

    #[test]
    fn test_longest_prefix() {
        let table = IdentifierTable::builder()
            .literal("np", r"\mathrm{np}")
            .literal("np.random", r"\mathcal{R}")
            .build()
            .unwrap();
        let (n, rule) = table.longest_prefix(&["np", "random", "rand"]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(rule, &IdentifierRule::Literal(r"\mathcal{R}".to_string()));
        assert!(table.longest_prefix(&["scipy", "special"]).is_none());
    }

    #[test]
    fn test_entries_deserialize() {
        let entries: Vec<IdentifierEntry> = serde_json::from_str(
            r#"[{"key": "y_pred", "rule": {"accent": "hat"}},
                {"key": "lam", "rule": {"symbol": "lambda"}},
                {"key": "x_max", "rule": "subscript"}]"#,
        )
        .unwrap();
        let table = IdentifierTable::from_entries(entries).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("y_pred"), Some(&IdentifierRule::Accent(Accent::Hat)));
    }
}
