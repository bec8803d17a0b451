//! # Function Calls
//!
//! Typesetting of calls: well-known math functions get operator markup
//! (`\sin x`, `\sqrt{x}`, `\left| x \right|`), reductions over a generator
//! become big operators, and everything else renders as
//! `name \mathopen{}\left( args \mathclose{}\right)`.
//!
//! Big-operator detection is structural and total: when a `sum`/`prod`
//! call does not have exactly the expected shape it falls back to the plain
//! function rendering.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::{builder, BinOp, ComprehensionKind, Generator, Node};
use crate::diagnostics::Result;
use crate::render::expression::{render_generator, wrap_parens};
use crate::render::precedence::{needs_grouping, precedence_of, Precedence, Side};
use crate::render::RenderContext;

// ============================================================================
// FUNCTION RULES
// ============================================================================

/// Markup placed around the arguments of a known function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRule {
    pub left: &'static str,
    pub right: &'static str,
    /// Single-argument calls render like a prefix operator.
    pub is_unary: bool,
    /// `left`/`right` already delimit the arguments.
    pub is_wrapped: bool,
}

impl FunctionRule {
    const fn unary(left: &'static str) -> Self {
        Self {
            left,
            right: "",
            is_unary: true,
            is_wrapped: false,
        }
    }

    const fn wrapped(left: &'static str, right: &'static str) -> Self {
        Self {
            left,
            right,
            is_unary: false,
            is_wrapped: true,
        }
    }

    const PLAIN: FunctionRule = FunctionRule {
        left: "",
        right: "",
        is_unary: false,
        is_wrapped: false,
    };
}

static BUILTIN_FUNCTIONS: Lazy<HashMap<&'static str, FunctionRule>> = Lazy::new(|| {
    use FunctionRule as R;
    HashMap::from([
        ("abs", R::wrapped(r"\mathopen{}\left|", r"\mathclose{}\right|")),
        ("fabs", R::wrapped(r"\mathopen{}\left|", r"\mathclose{}\right|")),
        ("ceil", R::wrapped(r"\mathopen{}\left\lceil", r"\mathclose{}\right\rceil")),
        ("floor", R::wrapped(r"\mathopen{}\left\lfloor", r"\mathclose{}\right\rfloor")),
        ("sqrt", R::wrapped(r"\sqrt{", "}")),
        ("sin", R::unary(r"\sin")),
        ("cos", R::unary(r"\cos")),
        ("tan", R::unary(r"\tan")),
        ("cot", R::unary(r"\cot")),
        ("sec", R::unary(r"\sec")),
        ("csc", R::unary(r"\csc")),
        ("sinh", R::unary(r"\sinh")),
        ("cosh", R::unary(r"\cosh")),
        ("tanh", R::unary(r"\tanh")),
        ("coth", R::unary(r"\coth")),
        ("sech", R::unary(r"\mathrm{sech}")),
        ("csch", R::unary(r"\mathrm{csch}")),
        ("asin", R::unary(r"\arcsin")),
        ("acos", R::unary(r"\arccos")),
        ("atan", R::unary(r"\arctan")),
        ("arcsin", R::unary(r"\arcsin")),
        ("arccos", R::unary(r"\arccos")),
        ("arctan", R::unary(r"\arctan")),
        ("arccot", R::unary(r"\mathrm{arccot}")),
        ("arcsec", R::unary(r"\mathrm{arcsec}")),
        ("arccsc", R::unary(r"\mathrm{arccsc}")),
        ("asinh", R::unary(r"\mathrm{arsinh}")),
        ("acosh", R::unary(r"\mathrm{arcosh}")),
        ("atanh", R::unary(r"\mathrm{artanh}")),
        ("arsinh", R::unary(r"\mathrm{arsinh}")),
        ("arcosh", R::unary(r"\mathrm{arcosh}")),
        ("artanh", R::unary(r"\mathrm{artanh}")),
        ("arcoth", R::unary(r"\mathrm{arcoth}")),
        ("arsech", R::unary(r"\mathrm{arsech}")),
        ("arcsch", R::unary(r"\mathrm{arcsch}")),
        ("exp", R::unary(r"\exp")),
        ("log", R::unary(r"\log")),
        ("log2", R::unary(r"\log_2")),
        ("log10", R::unary(r"\log_{10}")),
        ("gamma", R::unary(r"\Gamma")),
        (
            "factorial",
            FunctionRule {
                left: "",
                right: "!",
                is_unary: true,
                is_wrapped: false,
            },
        ),
        ("sum", R::unary(r"\sum")),
        ("fsum", R::unary(r"\sum")),
        ("prod", R::unary(r"\prod")),
    ])
});

pub fn builtin_rule(name: &str) -> Option<&'static FunctionRule> {
    BUILTIN_FUNCTIONS.get(name)
}

/// Whether a call renders as a prefix operator applied to one argument.
pub fn renders_as_operator(node: &Node) -> bool {
    let Node::Call { args, .. } = node else {
        return false;
    };
    args.len() == 1
        && node
            .callee_name()
            .and_then(builtin_rule)
            .map_or(false, |rule| rule.is_unary)
}

/// Whether a call renders already delimited (`\sqrt{}`, `\left| \right|`).
pub fn renders_wrapped(node: &Node) -> bool {
    node.callee_name()
        .and_then(builtin_rule)
        .map_or(false, |rule| rule.is_wrapped)
}

// ============================================================================
// RENDERING
// ============================================================================

/// Renders a `Call` node.
pub fn render_call(node: &Node, func: &Node, args: &[Node], ctx: &RenderContext) -> Result<String> {
    let callee = node.callee_name();

    if let Some(reduction) = render_reduction(callee, args, ctx)? {
        return Ok(reduction);
    }

    let (left, rule) = match callee.and_then(builtin_rule) {
        Some(rule) => (rule.left.to_string(), *rule),
        None => (ctx.render(func)?, FunctionRule::PLAIN),
    };

    let elements: Vec<String> = if rule.is_unary && args.len() == 1 {
        let arg = &args[0];
        let force_factorial = matches!(arg, Node::Call { .. })
            && (callee == Some("factorial") || arg.callee_name() == Some("factorial"));
        let force_pow = matches!(arg, Node::BinOp { op: BinOp::Pow, .. });
        let mut latex = ctx.render(arg)?;
        if force_factorial
            || force_pow
            || needs_grouping(Precedence::CALL, precedence_of(arg), Side::Only)
        {
            latex = wrap_parens(&latex);
        }
        vec![left, latex, rule.right.to_string()]
    } else {
        let latex = ctx.render_joined(args, ", ")?;
        if rule.is_wrapped {
            vec![left, latex, rule.right.to_string()]
        } else {
            vec![
                left,
                r"\mathopen{}\left(".to_string(),
                latex,
                r"\mathclose{}\right)".to_string(),
                rule.right.to_string(),
            ]
        }
    };

    Ok(elements
        .into_iter()
        .filter(|e| !e.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

// ============================================================================
// BIG OPERATORS
// ============================================================================

/// `sum(e for i in range(n))` → `\sum_{i = 0}^{n - 1} \mathopen{}\left({e}\mathclose{}\right)`.
fn render_reduction(
    callee: Option<&str>,
    args: &[Node],
    ctx: &RenderContext,
) -> Result<Option<String>> {
    let command = match callee {
        Some("sum") | Some("fsum") => r"\sum",
        Some("prod") => r"\prod",
        _ => return Ok(None),
    };
    let [Node::Comprehension {
        kind: ComprehensionKind::Generator,
        element,
        generators,
    }] = args
    else {
        return Ok(None);
    };

    let element = ctx.render(element)?;
    let mut scripts = Vec::with_capacity(generators.len());
    for generator in generators {
        let (lower, upper) = match range_bounds(generator, ctx)? {
            Some((lo, hi)) if generator.ifs.is_empty() => {
                (format!("{} = {}", ctx.render(&generator.target)?, lo), hi)
            }
            _ => (render_generator(generator, ctx)?, String::new()),
        };
        scripts.push(format!("{command}_{{{lower}}}^{{{upper}}}"));
    }

    Ok(Some(format!(
        r"{} \mathopen{{}}\left({{{}}}\mathclose{{}}\right)",
        scripts.join(" "),
        element
    )))
}

/// Lower and upper bound markup for a `range(...)` iteration, when the range
/// is ascending with step 1.
fn range_bounds(generator: &Generator, ctx: &RenderContext) -> Result<Option<(String, String)>> {
    let Node::Call { func, args } = &generator.iter else {
        return Ok(None);
    };
    if !matches!(func.as_ref(), Node::Name(id) if id == "range") {
        return Ok(None);
    }

    let zero = builder::int(0);
    let one = builder::int(1);
    let (start, stop, step) = match args.as_slice() {
        [stop] => (&zero, stop, &one),
        [start, stop] => (start, stop, &one),
        [start, stop, step] => (start, stop, step),
        _ => return Ok(None),
    };

    if step.as_int() != Some(1) {
        return Ok(None);
    }
    if let (Some(lo), Some(hi)) = (start.as_int(), stop.as_int()) {
        if lo >= hi {
            return Ok(None);
        }
    }

    let lower = match start.as_int() {
        Some(lo) => lo.to_string(),
        None => ctx.render(start)?,
    };
    let upper = match stop.as_int() {
        Some(hi) => match hi.checked_sub(1) {
            Some(last) => last.to_string(),
            None => return Ok(None),
        },
        None => match reduce_stop(stop) {
            Some(last) => ctx.render(&last)?,
            None => return Ok(None),
        },
    };
    Ok(Some((lower, upper)))
}

/// Rewrites an exclusive stop bound to the inclusive one:
/// `n + 1` → `n`, `n + 2` → `n + 1`, `n - 1` → `n - 2`, `n` → `n - 1`.
///
/// Returns `None` when the shifted literal would overflow.
pub fn reduce_stop(stop: &Node) -> Option<Node> {
    if let Node::BinOp { left, op, right } = stop {
        let shift = match op {
            BinOp::Add => Some(1),
            BinOp::Sub => Some(-1),
            _ => None,
        };
        if let (Some(shift), Some(value)) = (shift, right.as_int()) {
            if value == shift {
                return Some(left.as_ref().clone());
            }
            let shifted = value.checked_sub(shift)?;
            return Some(builder::binop(left.as_ref().clone(), *op, builder::int(shifted)));
        }
    }
    Some(builder::binop(stop.clone(), BinOp::Sub, builder::int(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;

    fn render(node: &Node) -> String {
        crate::Translator::new(Default::default())
            .unwrap()
            .render_expression(node)
            .unwrap()
    }

    #[test]
    fn test_reduce_stop() {
        assert_eq!(reduce_stop(&binop(name("n"), BinOp::Add, int(1))), Some(name("n")));
        assert_eq!(
            reduce_stop(&binop(name("n"), BinOp::Add, int(2))),
            Some(binop(name("n"), BinOp::Add, int(1)))
        );
        assert_eq!(
            reduce_stop(&binop(name("n"), BinOp::Sub, int(1))),
            Some(binop(name("n"), BinOp::Sub, int(2)))
        );
        assert_eq!(
            reduce_stop(&name("n")),
            Some(binop(name("n"), BinOp::Sub, int(1)))
        );
        assert_eq!(
            reduce_stop(&binop(name("n"), BinOp::Mult, int(2))),
            Some(binop(binop(name("n"), BinOp::Mult, int(2)), BinOp::Sub, int(1)))
        );
    }

    #[test]
    fn test_reduce_stop_overflow() {
        assert_eq!(reduce_stop(&binop(name("n"), BinOp::Add, int(i64::MIN))), None);
        assert_eq!(reduce_stop(&binop(name("n"), BinOp::Sub, int(i64::MAX))), None);
    }

    #[test]
    fn test_extreme_bounds_fall_back_to_generator_script() {
        let literal_stop = call(
            "sum",
            vec![genexp(name("i"), name("i"), call("range", vec![name("a"), int(i64::MIN)]))],
        );
        assert!(render(&literal_stop).starts_with(r"\sum_{i \in \mathrm{range}"));

        let shifted_stop = call(
            "sum",
            vec![genexp(
                name("i"),
                name("i"),
                call("range", vec![binop(name("n"), BinOp::Add, int(i64::MIN))]),
            )],
        );
        assert!(render(&shifted_stop).starts_with(r"\sum_{i \in \mathrm{range}"));
    }

    #[test]
    fn test_operator_shape() {
        assert!(renders_as_operator(&call("sin", vec![name("x")])));
        assert!(!renders_as_operator(&call("log", vec![name("x"), int(2)])));
        assert!(!renders_as_operator(&call("sqrt", vec![name("x")])));
        assert!(renders_wrapped(&call("sqrt", vec![name("x")])));
        assert!(!renders_as_operator(&call("f", vec![name("x")])));
    }
}
