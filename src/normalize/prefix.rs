//! Trims module prefixes from attribute paths (`math.sqrt` → `sqrt`).

use log::debug;

use crate::algotex_err;
use crate::ast::builder::path_from_parts;
use crate::ast::{is_identifier_path, Node};
use crate::diagnostics::Result;
use crate::normalize::rewrite::rewrite_children;

/// A validated set of dotted prefixes.
///
/// For `value.attr`, the longest registered prefix of the path of `value` is
/// removed; the attribute itself is never trimmed, so `math.pi` becomes `pi`
/// and never the empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTrimmer {
    prefixes: Vec<Vec<String>>,
}

impl PrefixTrimmer {
    /// Fails with `InvalidConfig` if a prefix is not a dotted identifier.
    pub fn new<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.as_ref();
            if !is_identifier_path(prefix) {
                return Err(algotex_err!(InvalidConfig, "invalid prefix `{}`", prefix));
            }
            parsed.push(prefix.split('.').map(str::to_string).collect());
        }
        Ok(Self { prefixes: parsed })
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn apply(&self, node: &Node) -> Node {
        if let Node::Attribute { value, attr } = node {
            if let Some(parts) = value.attribute_path() {
                let matched = self.longest_match(&parts);
                if matched > 0 {
                    debug!("trimmed prefix `{}`", parts[..matched].join("."));
                }
                let mut kept: Vec<&str> = parts[matched..].to_vec();
                kept.push(attr.as_str());
                return path_from_parts(&kept);
            }
        }
        rewrite_children(node, &mut |child: &Node| self.apply(child))
    }

    fn longest_match(&self, parts: &[&str]) -> usize {
        let mut matched = 0;
        for prefix in &self.prefixes {
            let fits = prefix.len() <= parts.len()
                && prefix.iter().zip(parts).all(|(p, part)| p == part);
            if fits && prefix.len() > matched {
                matched = prefix.len();
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;

    #[test]
    fn test_trims_longest_prefix() {
        let trimmer = PrefixTrimmer::new(["numpy", "numpy.random"]).unwrap();
        assert_eq!(trimmer.apply(&path("numpy.random.rand")), name("rand"));
        assert_eq!(trimmer.apply(&path("numpy.linalg.inv")), path("linalg.inv"));
    }

    #[test]
    fn test_attribute_itself_is_kept() {
        let trimmer = PrefixTrimmer::new(["math"]).unwrap();
        assert_eq!(trimmer.apply(&path("math.pi")), name("pi"));
        assert_eq!(trimmer.apply(&name("math")), name("math"));
    }

    #[test]
    fn test_unmatched_path_is_unchanged() {
        let trimmer = PrefixTrimmer::new(["math"]).unwrap();
        assert_eq!(trimmer.apply(&path("mathx.sqrt")), path("mathx.sqrt"));
        assert_eq!(trimmer.apply(&path("cmath.math.sqrt")), path("cmath.math.sqrt"));
    }

    #[test]
    fn test_descends_into_calls() {
        let trimmer = PrefixTrimmer::new(["math"]).unwrap();
        let tree = ret(call_node(path("math.sqrt"), vec![path("math.pi")]));
        assert_eq!(
            trimmer.apply(&tree),
            ret(call("sqrt", vec![name("pi")]))
        );
    }

    #[test]
    fn test_rejects_invalid_prefix() {
        for bad in ["", "math.", "1abc", "a..b", "a-b"] {
            assert!(PrefixTrimmer::new([bad]).is_err(), "{bad:?} accepted");
        }
    }
}
