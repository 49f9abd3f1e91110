//! Fatal error types and rich terminal rendering.
//!
//! Recoverable anomalies become [`Diagnostic`]s in a bag; the types here
//! cover the failures with no recovery placeholder — constructs the
//! binder/emitter has no mapping for — plus a miette adapter that renders
//! located diagnostics with source context and underlines.

use crate::ast::BinaryOp;
use crate::bound::BoundNodeKind;
use crate::diagnostics::Diagnostic;
use miette::SourceSpan;
use thiserror::Error;

/// A failure that aborts the current compilation (not the process).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// The emitter reached a binary operator with no instruction mapping.
    #[error("operator '{0}' is not supported")]
    UnsupportedOperator(BinaryOp),

    /// Reserved for bound-node shapes with no mapping. The current node
    /// set is fully mapped, so nothing raises this yet.
    #[error("bound node '{0}' is not supported")]
    UnsupportedNode(BoundNodeKind),

    /// The driver was asked to compile a unit with no method in it.
    #[error("source contains no method declaration")]
    MissingMethod,
}

/// A diagnostic with source attached, for miette's fancy terminal output.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("{message}")]
pub struct SourceError {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("{label}")]
    pub span: SourceSpan,

    pub label: String,
}

impl SourceError {
    /// Returns `None` when the diagnostic carries no location; those
    /// render through plain `Display` instead.
    pub fn from_diagnostic(diagnostic: &Diagnostic, src: &str) -> Option<Self> {
        let location = diagnostic.location.as_ref()?;
        Some(Self {
            message: diagnostic.info.to_string(),
            src: src.to_string(),
            span: (location.span.start, location.span.len()).into(),
            label: diagnostic.info.severity.to_string(),
        })
    }
}
