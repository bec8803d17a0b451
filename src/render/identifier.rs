//! # Identifier Renderer
//!
//! Maps identifiers and dotted attribute paths to markup. Resolution order:
//!
//! 1. an exact [`IdentifierTable`] entry (for dotted paths, the longest
//!    matching prefix; the remainder is rendered part by part);
//! 2. with math symbols on, a recognized Greek spelling becomes its symbol;
//! 3. with math symbols on, a decoration suffix (`y_hat`) becomes an accent
//!    over the rendered base;
//! 4. with math symbols on, `x_max` splits into `x_{\mathrm{max}}` when the
//!    base is a single letter or a Greek spelling;
//! 5. otherwise single letters stay italic and longer names go upright.
//!
//! At most one of steps 2 to 4 applies to a given token.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::ast::Node;
use crate::diagnostics::Result;
use crate::render::context::RenderOptions;
use crate::render::table::{Accent, IdentifierRule, IdentifierTable};
use crate::render::{Plugin, RenderContext};

// ============================================================================
// SYMBOL TABLES
// ============================================================================

/// Spellings that become `\name` in math-symbol mode.
static MATH_SYMBOLS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "aleph", "alpha", "beta", "beth", "chi", "daleth", "delta", "digamma", "epsilon",
        "eta", "gamma", "gimel", "hbar", "infty", "iota", "kappa", "lambda", "mu", "nabla",
        "nu", "omega", "phi", "pi", "psi", "rho", "sigma", "tau", "theta", "upsilon",
        "varepsilon", "varkappa", "varphi", "varpi", "varrho", "varsigma", "vartheta", "xi",
        "zeta", "Delta", "Gamma", "Lambda", "Omega", "Phi", "Pi", "Psi", "Sigma", "Theta",
        "Upsilon", "Xi",
    ]
    .into_iter()
    .collect()
});

pub fn is_math_symbol(name: &str) -> bool {
    MATH_SYMBOLS.contains(name)
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Renders one identifier, consulting the table first.
pub fn convert_identifier(name: &str, table: &IdentifierTable, options: &RenderOptions) -> String {
    match table.get(name) {
        Some(rule) => apply_rule(name, rule, options),
        None => convert_by_convention(name, options),
    }
}

/// Renders `key` according to an explicit table rule.
///
/// The conventions never run inside a rule: an accented or subscripted key
/// keeps its spelling, so `alpha` under `Accent(Vec)` is `\vec{\mathrm{alpha}}`.
pub fn apply_rule(key: &str, rule: &IdentifierRule, options: &RenderOptions) -> String {
    match rule {
        IdentifierRule::Literal(markup) => markup.clone(),
        IdentifierRule::Symbol(symbol) if symbol.starts_with('\\') => symbol.clone(),
        IdentifierRule::Symbol(symbol) => format!("\\{symbol}"),
        IdentifierRule::Accent(accent) => accent.apply(&upright(key, options)),
        IdentifierRule::Subscript => match key.split_once('_') {
            Some((base, rest)) if !base.is_empty() && !rest.is_empty() => {
                format!("{}_{{{}}}", upright(base, options), subscript_text(rest, options))
            }
            _ => upright(key, options),
        },
    }
}

/// Naming conventions applied when no table entry matches.
fn convert_by_convention(name: &str, options: &RenderOptions) -> String {
    if options.use_math_symbols {
        if is_math_symbol(name) {
            return format!("\\{name}");
        }
        if let Some(decorated) = decorate(name, options) {
            return decorated;
        }
        if let Some(split) = split_subscript(name, options) {
            return split;
        }
    }
    upright(name, options)
}

fn decorate(name: &str, options: &RenderOptions) -> Option<String> {
    let (base, suffix) = name.rsplit_once('_')?;
    let accent = Accent::from_suffix(suffix)?;
    if base.is_empty() {
        return None;
    }
    Some(accent.apply(&convert_by_convention(base, options)))
}

fn split_subscript(name: &str, options: &RenderOptions) -> Option<String> {
    let (base, rest) = name.split_once('_')?;
    if rest.is_empty() || rest.contains('_') {
        return None;
    }
    let base = if is_math_symbol(base) {
        format!("\\{base}")
    } else if is_single_letter(base) {
        base.to_string()
    } else {
        return None;
    };
    Some(format!("{}_{{{}}}", base, subscript_text(rest, options)))
}

fn subscript_text(rest: &str, options: &RenderOptions) -> String {
    if rest.chars().all(|c| c.is_ascii_digit()) || is_single_letter(rest) {
        rest.to_string()
    } else {
        upright(rest, &RenderOptions {
            use_mathrm: true,
            ..*options
        })
    }
}

fn upright(name: &str, options: &RenderOptions) -> String {
    if is_single_letter(name) {
        return name.to_string();
    }
    let escaped = name.replace('_', r"\_");
    if options.use_mathrm {
        format!(r"\mathrm{{{escaped}}}")
    } else {
        escaped
    }
}

fn is_single_letter(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

// ============================================================================
// PLUGIN
// ============================================================================

/// Built-in handler for `Name` and `Attribute` nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentifierRenderer;

impl Plugin for IdentifierRenderer {
    fn name(&self) -> &str {
        "identifier"
    }

    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
        match node {
            Node::Name(id) => Ok(Some(convert_identifier(id, ctx.identifiers(), ctx.options()))),
            Node::Attribute { value, attr } => match node.attribute_path() {
                Some(parts) => render_path(&parts, ctx).map(Some),
                None => {
                    let base = ctx.render(value)?;
                    let attr = convert_identifier(attr, ctx.identifiers(), ctx.options());
                    Ok(Some(format!("{base}.{attr}")))
                }
            },
            _ => Ok(None),
        }
    }
}

/// Renders a dotted path, substituting the longest table prefix first.
fn render_path(parts: &[&str], ctx: &RenderContext) -> Result<String> {
    let table = ctx.identifiers();
    let options = ctx.options();
    let (consumed, head) = match table.longest_prefix(parts) {
        Some((n, rule)) => (n, apply_rule(&parts[..n].join("."), rule, options)),
        None => (1, ctx.render(&Node::Name(parts[0].to_string()))?),
    };
    let mut rendered = vec![head];
    rendered.extend(
        parts[consumed..]
            .iter()
            .map(|part| convert_identifier(part, table, options)),
    );
    Ok(rendered.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math() -> RenderOptions {
        RenderOptions {
            use_math_symbols: true,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_convention_without_math_symbols() {
        let options = RenderOptions::default();
        let table = IdentifierTable::new();
        assert_eq!(convert_identifier("x", &table, &options), "x");
        assert_eq!(convert_identifier("alpha", &table, &options), r"\mathrm{alpha}");
        assert_eq!(convert_identifier("y_hat", &table, &options), r"\mathrm{y\_hat}");
        assert_eq!(convert_identifier("_", &table, &options), r"\mathrm{\_}");
    }

    #[test]
    fn test_convention_with_math_symbols() {
        let options = math();
        let table = IdentifierTable::new();
        assert_eq!(convert_identifier("alpha", &table, &options), r"\alpha");
        assert_eq!(convert_identifier("y_hat", &table, &options), r"\widehat{y}");
        assert_eq!(convert_identifier("mu_bar", &table, &options), r"\overline{\mu}");
        assert_eq!(convert_identifier("x_max", &table, &options), r"x_{\mathrm{max}}");
        assert_eq!(convert_identifier("x_1", &table, &options), "x_{1}");
        assert_eq!(convert_identifier("beta_i", &table, &options), r"\beta_{i}");
        assert_eq!(convert_identifier("speed_max", &table, &options), r"\mathrm{speed\_max}");
        assert_eq!(convert_identifier("a_b_c", &table, &options), r"\mathrm{a\_b\_c}");
    }

    #[test]
    fn test_rules() {
        let options = RenderOptions::default();
        assert_eq!(
            apply_rule("lam", &IdentifierRule::Symbol("lambda".into()), &options),
            r"\lambda"
        );
        assert_eq!(
            apply_rule("v", &IdentifierRule::Accent(Accent::Vec), &options),
            r"\vec{v}"
        );
        assert_eq!(
            apply_rule("rate_init", &IdentifierRule::Subscript, &options),
            r"\mathrm{rate}_{\mathrm{init}}"
        );
        assert_eq!(
            apply_rule("x_0", &IdentifierRule::Subscript, &options),
            "x_{0}"
        );
    }

    #[test]
    fn test_without_mathrm() {
        let options = RenderOptions {
            use_mathrm: false,
            ..RenderOptions::default()
        };
        assert_eq!(
            convert_identifier("my_var", &IdentifierTable::new(), &options),
            r"my\_var"
        );
    }
}
