//!
//! # Overview
//!
//! This module defines the unified, `miette`-based diagnostic system for algotex.
//! Every failure of configuration building, normalization, dispatch, or block
//! assembly is one variant of [`AlgotexError`].
//!
//! # Error Families
//!
//! - **Input** errors describe a tree the pipeline cannot render
//!   (`UnhandledNodeKind`, `Unsupported`).
//! - **Config** errors are raised while building a translator, before any
//!   render call (`AmbiguousIdentifierMapping`, `InvalidConfig`).
//! - **Internal** errors are invariant violations inside the assembler
//!   (`UnbalancedBlockStructure`). They indicate a defect, not bad input.
//! - **Upstream** errors come from the parsing collaborator and are passed
//!   through untouched (`UpstreamParseFailure`).
//!
//! There is no partial output: a render call returns complete markup or one
//! of these errors.

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::NodeKind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AlgotexError>;

/// Boxed upstream failure, kept as the `#[source]` of `UpstreamParseFailure`.
pub type UpstreamError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type-safe classification of [`AlgotexError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The tree holds a construct that cannot be rendered
    Input,
    /// Translator configuration was rejected at build time
    Config,
    /// An assembler invariant was violated
    Internal,
    /// The parsing collaborator failed
    Upstream,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Input => "Input",
            ErrorType::Config => "Config",
            ErrorType::Internal => "Internal",
            ErrorType::Upstream => "Upstream",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for all algotex failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum AlgotexError {
    #[error("Unhandled node kind: {kind}")]
    #[diagnostic(
        code(algotex::unhandled_node_kind),
        help("no plugin in the chain claims this node; add a plugin that renders it")
    )]
    UnhandledNodeKind { kind: NodeKind },

    #[error("Ambiguous identifier mapping: `{key}` has more than one rule")]
    #[diagnostic(
        code(algotex::ambiguous_identifier_mapping),
        help("keep exactly one identifier table entry per key")
    )]
    AmbiguousIdentifierMapping { key: String },

    #[error("Unbalanced block structure: {message}")]
    #[diagnostic(
        code(algotex::internal::unbalanced_block_structure),
        help("this is a defect in algotex, not in the input tree")
    )]
    UnbalancedBlockStructure { message: String },

    #[error("Upstream parse failure: {source}")]
    #[diagnostic(code(algotex::upstream_parse_failure))]
    UpstreamParseFailure {
        #[source]
        source: UpstreamError,
    },

    #[error("Unsupported construct: {message}")]
    #[diagnostic(code(algotex::unsupported))]
    Unsupported { message: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(algotex::invalid_config))]
    InvalidConfig { message: String },
}

impl AlgotexError {
    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            AlgotexError::UnhandledNodeKind { .. } => ErrorType::Input,
            AlgotexError::Unsupported { .. } => ErrorType::Input,
            AlgotexError::AmbiguousIdentifierMapping { .. } => ErrorType::Config,
            AlgotexError::InvalidConfig { .. } => ErrorType::Config,
            AlgotexError::UnbalancedBlockStructure { .. } => ErrorType::Internal,
            AlgotexError::UpstreamParseFailure { .. } => ErrorType::Upstream,
        }
    }

    /// Whether this error signals a defect in algotex itself.
    pub fn is_internal(&self) -> bool {
        self.error_type() == ErrorType::Internal
    }

    /// Wraps a parsing collaborator failure without altering it.
    pub fn upstream<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AlgotexError::UpstreamParseFailure {
            source: Box::new(source),
        }
    }
}

/// Constructs an [`AlgotexError`] variant that carries a formatted `message`.
///
/// ```rust
/// use algotex::{algotex_err, AlgotexError};
/// let err = algotex_err!(Unsupported, "{} with an else clause", "while");
/// assert!(matches!(err, AlgotexError::Unsupported { .. }));
/// assert_eq!(err.to_string(), "Unsupported construct: while with an else clause");
/// ```
#[macro_export]
macro_rules! algotex_err {
    ($variant:ident, $msg:literal $(, $arg:expr)* $(,)?) => {
        $crate::AlgotexError::$variant {
            message: format!($msg $(, $arg)*),
        }
    };
}
