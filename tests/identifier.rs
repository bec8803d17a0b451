//! Identifier resolution through the table and naming conventions.

mod common;

use algotex::ast::builder::*;
use algotex::ast::BinOp;
use algotex::{Accent, AlgotexError, IdentifierEntry, IdentifierRule, Translator};
use common::expr_with;

fn math() -> algotex::TranslatorBuilder {
    Translator::builder().use_math_symbols(true)
}

#[test]
fn test_decoration_suffix() {
    assert_eq!(expr_with(math(), &name("y_hat")), r"\widehat{y}");
    assert_eq!(expr_with(math(), &name("x_bar")), r"\overline{x}");
    assert_eq!(expr_with(math(), &name("v_vec")), r"\vec{v}");
    assert_eq!(expr_with(math(), &name("theta_tilde")), r"\widetilde{\theta}");
}

#[test]
fn test_greek_only_in_math_mode() {
    assert_eq!(expr_with(math(), &name("alpha")), r"\alpha");
    assert_eq!(
        expr_with(Translator::builder(), &name("alpha")),
        r"\mathrm{alpha}"
    );
    assert_eq!(
        expr_with(Translator::builder(), &name("y_hat")),
        r"\mathrm{y\_hat}"
    );
}

#[test]
fn test_subscript_convention() {
    assert_eq!(expr_with(math(), &name("x_max")), r"x_{\mathrm{max}}");
    assert_eq!(expr_with(math(), &name("a_0")), "a_{0}");
    assert_eq!(expr_with(math(), &name("sigma_k")), r"\sigma_{k}");
}

#[test]
fn test_exact_override_wins() {
    let builder = math()
        .identifier(IdentifierEntry::new("f", IdentifierRule::Literal(r"\mathcal{F}".into())))
        .identifier(IdentifierEntry::new("phi", IdentifierRule::Literal(r"\varphi".into())));
    let e = binop(call("f", vec![name("x")]), BinOp::Add, name("phi"));
    assert_eq!(
        expr_with(builder, &e),
        r"\mathcal{F} \mathopen{}\left( x \mathclose{}\right) + \varphi"
    );
}

#[test]
fn test_table_rules_skip_conventions() {
    let builder = math()
        .identifier(IdentifierEntry::new("y_hat", IdentifierRule::Accent(Accent::Bar)))
        .identifier(IdentifierEntry::new("alpha", IdentifierRule::Accent(Accent::Vec)))
        .identifier(IdentifierEntry::new("beta_max", IdentifierRule::Subscript));
    assert_eq!(
        expr_with(builder.clone(), &name("y_hat")),
        r"\overline{\mathrm{y\_hat}}"
    );
    assert_eq!(expr_with(builder.clone(), &name("alpha")), r"\vec{\mathrm{alpha}}");
    assert_eq!(
        expr_with(builder, &name("beta_max")),
        r"\mathrm{beta}_{\mathrm{max}}"
    );
}

#[test]
fn test_table_rules() {
    let builder = Translator::builder()
        .identifier(IdentifierEntry::new("lam", IdentifierRule::Symbol("lambda".into())))
        .identifier(IdentifierEntry::new("u", IdentifierRule::Accent(Accent::Dot)))
        .identifier(IdentifierEntry::new("rate_init", IdentifierRule::Subscript));
    let e = binop(
        binop(name("lam"), BinOp::Mult, name("u")),
        BinOp::Add,
        name("rate_init"),
    );
    assert_eq!(
        expr_with(builder, &e),
        r"\lambda \dot{u} + \mathrm{rate}_{\mathrm{init}}"
    );
}

#[test]
fn test_dotted_paths() {
    let builder = Translator::builder()
        .identifier(IdentifierEntry::new("math.pi", IdentifierRule::Literal(r"\pi".into())));
    assert_eq!(expr_with(builder, &path("math.pi")), r"\pi");
    assert_eq!(
        expr_with(Translator::builder(), &path("np.linalg.norm")),
        r"\mathrm{np}.\mathrm{linalg}.\mathrm{norm}"
    );
}

#[test]
fn test_mathrm_can_be_disabled() {
    assert_eq!(
        expr_with(Translator::builder().use_mathrm(false), &name("total_sum")),
        r"total\_sum"
    );
}

#[test]
fn test_ambiguous_mapping_rejected_before_rendering() {
    let result = Translator::builder()
        .identifier(IdentifierEntry::new("x", IdentifierRule::Literal("X".into())))
        .identifier(IdentifierEntry::new("x", IdentifierRule::Accent(Accent::Hat)))
        .build();
    match result {
        Err(AlgotexError::AmbiguousIdentifierMapping { key }) => assert_eq!(key, "x"),
        other => panic!("expected an ambiguous mapping, got {other:?}"),
    }
}
