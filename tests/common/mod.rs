//! Shared helpers for the integration tests.
#![allow(dead_code)]

use algotex::ast::Node;
use algotex::{Translator, TranslatorBuilder};

/// Default translator.
pub fn translator() -> Translator {
    Translator::builder().build().expect("default configuration is valid")
}

/// Renders one expression with the default configuration.
pub fn expr(node: &Node) -> String {
    translator()
        .render_expression(node)
        .expect("expression renders")
}

/// Renders one expression with a customized configuration.
pub fn expr_with(builder: TranslatorBuilder, node: &Node) -> String {
    builder
        .build()
        .expect("configuration is valid")
        .render_expression(node)
        .expect("expression renders")
}

/// Joins block lines the way the array layout does.
pub fn array_block(lines: &[&str]) -> String {
    format!(r"\begin{{array}}{{l}} {} \end{{array}}", lines.join(r" \\ "))
}
