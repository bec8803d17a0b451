//! Plugin chain dispatch: ordering, overrides and unclaimed nodes.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use algotex::ast::builder::*;
use algotex::ast::{BinOp, Node, NodeKind};
use algotex::{
    algotex_err, append_defaults, AlgotexError, IdentifierTable, Layout, Plugin, PluginChain,
    RenderContext, RenderOptions, Result, Translator,
};

/// Renders `BinOp::Add` as `\oplus`, recursing through the chain.
struct OplusAdd;

impl Plugin for OplusAdd {
    fn name(&self) -> &str {
        "oplus"
    }

    fn render(&self, node: &Node, ctx: &RenderContext) -> Result<Option<String>> {
        match node {
            Node::BinOp {
                left,
                op: BinOp::Add,
                right,
            } => Ok(Some(format!(
                r"{} \oplus {}",
                ctx.render(left)?,
                ctx.render(right)?
            ))),
            _ => Ok(None),
        }
    }
}

/// Declines everything but counts what it saw.
#[derive(Default)]
struct Observer {
    seen: AtomicUsize,
}

impl Plugin for Observer {
    fn name(&self) -> &str {
        "observer"
    }

    fn render(&self, _node: &Node, _ctx: &RenderContext) -> Result<Option<String>> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

/// Refuses to render string constants.
struct NoStrings;

impl Plugin for NoStrings {
    fn name(&self) -> &str {
        "no-strings"
    }

    fn render(&self, node: &Node, _ctx: &RenderContext) -> Result<Option<String>> {
        if node.is_str_constant() {
            return Err(algotex_err!(Unsupported, "string literal"));
        }
        Ok(None)
    }
}

#[test]
fn test_user_plugin_overrides_default() {
    let e = binop(name("a"), BinOp::Add, name("b"));
    let plain = Translator::builder().build().unwrap();
    let custom = Translator::builder().plugin(Arc::new(OplusAdd)).build().unwrap();

    assert_eq!(custom.render_expression(&e).unwrap(), r"a \oplus b");
    // Without the plugin the defaults take over again.
    assert_eq!(plain.render_expression(&e).unwrap(), "a + b");
}

#[test]
fn test_override_applies_inside_default_handlers() {
    let custom = Translator::builder().plugin(Arc::new(OplusAdd)).build().unwrap();
    let e = call("sin", vec![binop(name("x"), BinOp::Add, int(1))]);
    // The call is rendered by the defaults; its argument by the plugin.
    assert_eq!(
        custom.render_expression(&e).unwrap(),
        r"\sin \mathopen{}\left( x \oplus 1 \mathclose{}\right)"
    );

    let tree = function("f", &["x"], vec![ret(binop(name("x"), BinOp::Add, int(1)))]);
    let out = custom.translate(&tree).unwrap();
    assert!(out.contains(r"\mathbf{return} \ x \oplus 1"), "{out}");
}

#[test]
fn test_declining_plugin_sees_every_node() {
    let observer = Arc::new(Observer::default());
    let translator = Translator::builder()
        .plugin(observer.clone())
        .build()
        .unwrap();
    let out = translator
        .render_expression(&binop(name("a"), BinOp::Mult, int(2)))
        .unwrap();
    assert_eq!(out, r"a \cdot 2");
    // BinOp, Name, Constant.
    assert_eq!(observer.seen.load(Ordering::SeqCst), 3);
}

#[test]
fn test_plugin_error_aborts_render() {
    let translator = Translator::builder().plugin(Arc::new(NoStrings)).build().unwrap();
    let tree = function("f", &[], vec![ret(call("g", vec![string("s")]))]);
    let err = translator.translate(&tree).unwrap_err();
    assert!(matches!(err, AlgotexError::Unsupported { .. }));
}

#[test]
fn test_unclaimed_node_is_an_error() {
    let translator = Translator::builder().build().unwrap();
    let tree = function(
        "f",
        &[],
        vec![Node::Unsupported {
            kind: "Try".to_string(),
        }],
    );
    match translator.translate(&tree) {
        Err(AlgotexError::UnhandledNodeKind { kind }) => assert_eq!(kind, NodeKind::Unsupported),
        other => panic!("expected an unhandled node, got {other:?}"),
    }
}

#[test]
fn test_empty_chain_claims_nothing() {
    let ctx = RenderContext::new(
        Arc::new(PluginChain::default()),
        Arc::new(IdentifierTable::new()),
        RenderOptions::default(),
    );
    let err = ctx.render(&name("x")).unwrap_err();
    assert!(matches!(
        err,
        AlgotexError::UnhandledNodeKind {
            kind: NodeKind::Name
        }
    ));
}

#[test]
fn test_append_defaults_keeps_user_order() {
    let chain = append_defaults(
        vec![Arc::new(OplusAdd), Arc::new(Observer::default())],
        Layout::Algpseudocode,
    );
    assert_eq!(
        chain.names(),
        vec!["oplus", "observer", "algorithm", "expression", "identifier"]
    );
    assert_eq!(chain.len(), 5);
}
