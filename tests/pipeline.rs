//! Whole-pipeline behavior: styles, JSON input, extensions and threading.

mod common;

use std::sync::Arc;
use std::thread;

use algotex::ast::builder::*;
use algotex::ast::{BinOp, CmpOp, FunctionDef, MatchCase, Node, Param, Pattern};
use algotex::{AlgotexError, ErrorType, Style, Translator, TranslatorConfig};
use common::translator;

#[test]
fn test_hat_identifier_end_to_end() {
    let tree = function(
        "predict",
        &["x"],
        vec![
            assign(name("y_hat"), binop(int(2), BinOp::Mult, name("x"))),
            ret(name("y_hat")),
        ],
    );
    let out = Translator::builder()
        .use_math_symbols(true)
        .build()
        .unwrap()
        .translate(&tree)
        .unwrap();
    assert!(out.contains(r"\widehat{y} \gets 2 x"), "{out}");
    assert!(!out.contains("y_{"));
}

#[test]
fn test_function_style() {
    let tree = function(
        "f",
        &["x"],
        vec![
            expr_stmt(string("Absolute value.")),
            if_stmt(
                compare(name("x"), CmpOp::Gt, int(0)),
                vec![ret(name("x"))],
                vec![ret(neg(name("x")))],
            ),
        ],
    );
    let function_tr = Translator::builder().style(Style::Function).build().unwrap();
    assert_eq!(
        function_tr.translate(&tree).unwrap(),
        r"f(x) = \left\{ \begin{array}{ll} x, & \mathrm{if} \ x > 0 \\ -x, & \mathrm{otherwise} \end{array} \right."
    );

    let unsigned = Translator::builder()
        .style(Style::Function)
        .use_signature(false)
        .build()
        .unwrap();
    let simple = function("g", &["a", "b"], vec![ret(binop(name("a"), BinOp::Div, name("b")))]);
    assert_eq!(unsigned.translate(&simple).unwrap(), r"\frac{a}{b}");
}

#[test]
fn test_function_style_with_assignments() {
    let tree = function(
        "h",
        &["x"],
        vec![
            assign(name("y"), binop(name("x"), BinOp::Pow, int(2))),
            ret(binop(name("y"), BinOp::Add, int(1))),
        ],
    );
    let out = Translator::builder()
        .style(Style::Function)
        .build()
        .unwrap()
        .translate(&tree)
        .unwrap();
    assert_eq!(
        out,
        r"\begin{array}{l} y = x^{2} \\ h(x) = y + 1 \end{array}"
    );
}

fn function_style() -> Translator {
    Translator::builder().style(Style::Function).build().unwrap()
}

#[test]
fn test_function_style_match() {
    let tree = function(
        "f",
        &["x"],
        vec![match_stmt(
            name("x"),
            vec![
                case_value(int(0), vec![ret(int(1))]),
                case_value(int(1), vec![ret(int(2))]),
                case_wildcard(vec![ret(binop(int(3), BinOp::Mult, name("x")))]),
            ],
        )],
    );
    assert_eq!(
        function_style().translate(&tree).unwrap(),
        r"f(x) = \left\{ \begin{array}{ll} 1, & \mathrm{if} \ x = 0 \\ 2, & \mathrm{if} \ x = 1 \\ 3 x, & \mathrm{otherwise} \end{array} \right."
    );
}

#[test]
fn test_function_style_match_needs_wildcard_and_returns() {
    let no_wildcard = function(
        "f",
        &["x"],
        vec![match_stmt(
            name("x"),
            vec![
                case_value(int(0), vec![ret(int(1))]),
                case_value(int(1), vec![ret(int(2))]),
            ],
        )],
    );
    let only_wildcard = function(
        "f",
        &["x"],
        vec![match_stmt(name("x"), vec![case_wildcard(vec![ret(int(2))])])],
    );
    let assigning = function(
        "f",
        &["x"],
        vec![match_stmt(
            name("x"),
            vec![
                case_value(int(0), vec![assign(name("x"), int(5))]),
                case_wildcard(vec![ret(int(0))]),
            ],
        )],
    );
    let capture = function(
        "f",
        &["x"],
        vec![match_stmt(
            name("x"),
            vec![
                MatchCase {
                    pattern: Pattern::Unsupported {
                        kind: "MatchAs".to_string(),
                    },
                    body: vec![ret(int(1))],
                },
                case_wildcard(vec![ret(int(2))]),
            ],
        )],
    );
    for tree in [no_wildcard, only_wildcard, assigning, capture] {
        let err = function_style().translate(&tree).unwrap_err();
        assert!(matches!(err, AlgotexError::Unsupported { .. }), "{err:?}");
    }
}

#[test]
fn test_array_type_annotations() {
    let tree = Node::FunctionDef(FunctionDef {
        name: "norm".to_string(),
        params: vec![Param {
            name: "x".to_string(),
            annotation: Some(subscript(
                name("Float"),
                tuple(vec![name("Array"), string("m n")]),
            )),
        }],
        body: vec![ret(name("x"))],
        description: None,
    });
    let out = Translator::builder()
        .array_types(true)
        .build()
        .unwrap()
        .translate(&tree)
        .unwrap();
    assert!(
        out.contains(r"\mathbf{function} \ \mathrm{norm}(x: \mathbb{R}^{m \times n})"),
        "{out}"
    );

    let plain = translator().translate(&tree).unwrap();
    assert!(!plain.contains(r"\mathbb{R}"), "{plain}");
}

#[test]
fn test_function_style_rejects_loops() {
    let tree = function(
        "f",
        &["n"],
        vec![while_stmt(name("n"), vec![Node::Pass]), ret(name("n"))],
    );
    let err = Translator::builder()
        .style(Style::Function)
        .build()
        .unwrap()
        .translate(&tree)
        .unwrap_err();
    assert!(matches!(err, AlgotexError::Unsupported { .. }));
}

#[test]
fn test_matrix_plugin_is_opt_in() {
    let e = call_node(
        path("np.array"),
        vec![list(vec![
            list(vec![int(1), int(2)]),
            list(vec![int(3), int(4)]),
        ])],
    );
    let matrix = Translator::builder().matrix(true).build().unwrap();
    assert_eq!(
        matrix.render_expression(&e).unwrap(),
        r"\begin{bmatrix} 1 & 2 \\ 3 & 4 \end{bmatrix}"
    );
    assert_eq!(
        matrix
            .render_expression(&call_node(path("np.linalg.inv"), vec![name("A")]))
            .unwrap(),
        r"\mathbf{A}^{-1}"
    );
    assert_eq!(
        matrix
            .render_expression(&call("zeros", vec![tuple(vec![int(2), int(3)])]))
            .unwrap(),
        r"\mathbf{0}^{2 \times 3}"
    );
    // Without the flag the call renders like any other.
    let plain = translator().render_expression(&e).unwrap();
    assert!(plain.starts_with(r"\mathrm{np}.\mathrm{array}"), "{plain}");
}

#[test]
fn test_matrix_names_escape_underscores() {
    let matrix = Translator::builder().matrix(true).build().unwrap();
    assert_eq!(
        matrix
            .render_expression(&call("transpose", vec![name("my_mat")]))
            .unwrap(),
        r"\mathbf{my\_mat}^\intercal"
    );
    assert_eq!(
        matrix
            .render_expression(&call("det", vec![name("w_in")]))
            .unwrap(),
        r"\det \mathopen{}\left( \mathbf{w\_in} \mathclose{}\right)"
    );
}

#[test]
fn test_json_input() {
    let tree = function("f", &["x"], vec![ret(binop(name("x"), BinOp::Add, int(1)))]);
    let json = serde_json::to_string(&tree).unwrap();
    let translator = translator();
    assert_eq!(
        translator.translate_json(&json).unwrap(),
        translator.translate(&tree).unwrap()
    );
}

#[test]
fn test_malformed_json_is_upstream_failure() {
    let err = translator().translate_json(r#"{"FunctionDef": "#).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Upstream);
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_config_from_json() {
    let config = TranslatorConfig::from_json(
        r#"{
            "use_math_symbols": true,
            "identifiers": [{"key": "n", "rule": {"literal": "N"}}],
            "prefixes": ["math"]
        }"#,
    )
    .unwrap();
    let translator = Translator::new(config).unwrap();
    let out = translator
        .translate(&function(
            "f",
            &["alpha"],
            vec![ret(binop(name("alpha"), BinOp::Mult, path("math.n")))],
        ))
        .unwrap();
    assert!(out.contains(r"\mathbf{return} \ \alpha N"), "{out}");
}

#[test]
fn test_concurrent_translations() {
    let translator = Arc::new(Translator::builder().use_math_symbols(true).build().unwrap());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let translator = Arc::clone(&translator);
            thread::spawn(move || {
                let tree = function(
                    "f",
                    &["x"],
                    vec![ret(binop(name("x"), BinOp::Add, int(i)))],
                );
                translator.translate(&tree).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.join().unwrap();
        assert!(out.contains(&format!(r"\mathbf{{return}} \ x + {i}")), "{out}");
    }
}

#[test]
fn test_translate_free_function() {
    let tree = function("f", &[], vec![ret(int(0))]);
    assert_eq!(
        algotex::translate(&tree).unwrap(),
        translator().translate(&tree).unwrap()
    );
}
