//! AST-level identifier renaming.
//!
//! Runs before rendering, so plugins and the identifier table see the
//! renamed tree. Variable references and attribute paths may be replaced by
//! dotted paths (`x` → `self.x`); parameter and function names only take
//! plain identifiers, and a dotted replacement for them is ignored.

use std::collections::BTreeMap;

use log::debug;

use crate::algotex_err;
use crate::ast::builder::path;
use crate::ast::{is_identifier_path, FunctionDef, Node};
use crate::diagnostics::Result;
use crate::normalize::rewrite::rewrite_children;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierReplacer {
    mapping: BTreeMap<String, String>,
}

impl IdentifierReplacer {
    /// Validates every key and value; keywords and non-identifiers are
    /// rejected with `InvalidConfig`.
    pub fn new(mapping: BTreeMap<String, String>) -> Result<Self> {
        for (key, value) in &mapping {
            check_valid(key)?;
            check_valid(value)?;
        }
        Ok(Self { mapping })
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn apply(&self, node: &Node) -> Node {
        match node {
            Node::Name(id) => self.replace_path(id),
            Node::Attribute { .. } => match node.attribute_path() {
                Some(parts) => self.replace_path(&parts.join(".")),
                None => self.descend(node),
            },
            Node::Lambda { params, body } => Node::Lambda {
                params: params.iter().map(|p| self.replace_plain(p)).collect(),
                body: Box::new(self.apply(body)),
            },
            Node::FunctionDef(_) => match self.descend(node) {
                Node::FunctionDef(def) => Node::FunctionDef(self.rename_signature(def)),
                other => other,
            },
            _ => self.descend(node),
        }
    }

    fn descend(&self, node: &Node) -> Node {
        rewrite_children(node, &mut |child: &Node| self.apply(child))
    }

    fn rename_signature(&self, mut def: FunctionDef) -> FunctionDef {
        def.name = self.replace_plain(&def.name);
        for param in &mut def.params {
            param.name = self.replace_plain(&param.name);
        }
        def
    }

    fn replace_path(&self, dotted: &str) -> Node {
        match self.mapping.get(dotted) {
            Some(replacement) => {
                debug!("replaced identifier `{}` with `{}`", dotted, replacement);
                path(replacement)
            }
            None => path(dotted),
        }
    }

    fn replace_plain(&self, name: &str) -> String {
        match self.mapping.get(name) {
            Some(replacement) if !replacement.contains('.') => replacement.clone(),
            _ => name.to_string(),
        }
    }
}

fn check_valid(name: &str) -> Result<()> {
    if KEYWORDS.contains(&name) || !is_identifier_path(name) {
        return Err(algotex_err!(
            InvalidConfig,
            "`{}` is not an identifier name",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;
    use crate::ast::BinOp;

    fn replacer(pairs: &[(&str, &str)]) -> IdentifierReplacer {
        let mapping = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IdentifierReplacer::new(mapping).unwrap()
    }

    #[test]
    fn test_renames_signature_and_body() {
        let r = replacer(&[("foo", "x"), ("bar", "y"), ("baz", "z")]);
        let tree = function("foo", &["bar"], vec![ret(name("baz"))]);
        assert_eq!(r.apply(&tree), function("x", &["y"], vec![ret(name("z"))]));
    }

    #[test]
    fn test_dotted_replacement_applies_to_references_only() {
        let r = replacer(&[("x", "self.x")]);
        let tree = function("f", &["x"], vec![ret(binop(name("x"), BinOp::Add, int(1)))]);
        let expected = function(
            "f",
            &["x"],
            vec![ret(binop(path("self.x"), BinOp::Add, int(1)))],
        );
        assert_eq!(r.apply(&tree), expected);
    }

    #[test]
    fn test_attribute_path_is_matched_whole() {
        let r = replacer(&[("math.pi", "pi"), ("np", "numpy")]);
        assert_eq!(r.apply(&path("math.pi")), name("pi"));
        // Only the full path is looked up.
        assert_eq!(r.apply(&path("np.array")), path("np.array"));
    }

    #[test]
    fn test_lambda_params() {
        let r = replacer(&[("t", "tau")]);
        assert_eq!(
            r.apply(&lambda(&["t"], name("t"))),
            lambda(&["tau"], name("tau"))
        );
    }

    #[test]
    fn test_rejects_keywords_and_non_identifiers() {
        for (k, v) in [("x", "lambda"), ("if", "y"), ("x", "1y"), ("a b", "c")] {
            let mapping = BTreeMap::from([(k.to_string(), v.to_string())]);
            assert!(IdentifierReplacer::new(mapping).is_err(), "{k} -> {v} accepted");
        }
    }
}
