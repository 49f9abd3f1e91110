//! Structured diagnostics with per-stage collection.
//!
//! Every anomaly the pipeline can recover from becomes a [`Diagnostic`]
//! in a [`DiagnosticBag`] rather than an `Err`. Bags are append-only and
//! scoped to a stage (one for parsing, one for binding); they are never
//! cleared, and a caller decides whether a non-empty bag should stop the
//! pipeline.

use crate::token::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Syntax,
    Semantic,
    Internal,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Syntax => f.write_str("Syntax"),
            DiagnosticCategory::Semantic => f.write_str("Semantic"),
            DiagnosticCategory::Internal => f.write_str("Internal"),
        }
    }
}

/// Stable diagnostic codes. `TypeMismatch`, `DivisionByZero`, and
/// `UnreachableCode` are reserved: no implemented check raises them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DiagnosticCode {
    UnexpectedToken = 1000,
    UndefinedName = 2000,
    TypeMismatch = 2001,
    DivisionByZero = 2002,
    UnreachableCode = 3000,
    InternalError = 9000,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::UnexpectedToken => f.write_str("UnexpectedToken"),
            DiagnosticCode::UndefinedName => f.write_str("UndefinedName"),
            DiagnosticCode::TypeMismatch => f.write_str("TypeMismatch"),
            DiagnosticCode::DivisionByZero => f.write_str("DivisionByZero"),
            DiagnosticCode::UnreachableCode => f.write_str("UnreachableCode"),
            DiagnosticCode::InternalError => f.write_str("InternalError"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => f.write_str("Info"),
            DiagnosticSeverity::Warning => f.write_str("Warning"),
            DiagnosticSeverity::Error => f.write_str("Error"),
        }
    }
}

/// The location-independent part of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticInfo {
    pub category: DiagnosticCategory,
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub message: String,
}

impl DiagnosticInfo {
    pub fn error(
        category: DiagnosticCategory,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            severity: DiagnosticSeverity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for DiagnosticInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] {}: {}",
            self.category, self.code, self.severity, self.message
        )
    }
}

/// A source id plus a span within it. The source id is empty for
/// in-memory compilations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLocation {
    pub source: String,
    pub span: Span,
}

impl TextLocation {
    pub fn new(source: impl Into<String>, span: Span) -> Self {
        Self {
            source: source.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub info: DiagnosticInfo,
    pub location: Option<TextLocation>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            None => write!(f, "{}", self.info),
            Some(loc) => write!(
                f,
                "{} at {}[{}-{}]",
                self.info, loc.source, loc.span.start, loc.span.end
            ),
        }
    }
}

/// Append-only, single-writer collection of diagnostics for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, info: DiagnosticInfo, location: Option<TextLocation>) {
        self.diagnostics.push(Diagnostic { info, location });
    }

    /// Move every diagnostic out of `other` into this bag, preserving order.
    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_location() {
        let info = DiagnosticInfo::error(
            DiagnosticCategory::Syntax,
            DiagnosticCode::UnexpectedToken,
            "Expected ';', found '}'",
        );
        let diag = Diagnostic {
            info,
            location: None,
        };
        assert_eq!(
            diag.to_string(),
            "[Syntax:UnexpectedToken] Error: Expected ';', found '}'"
        );
    }

    #[test]
    fn test_display_with_location() {
        let info = DiagnosticInfo::error(
            DiagnosticCategory::Semantic,
            DiagnosticCode::UndefinedName,
            "Undefined name 'x'",
        );
        let diag = Diagnostic {
            info,
            location: Some(TextLocation::new("main.uil", Span::new(10, 11))),
        };
        assert_eq!(
            diag.to_string(),
            "[Semantic:UndefinedName] Error: Undefined name 'x' at main.uil[10-11]"
        );
    }

    #[test]
    fn test_bag_is_append_only_and_ordered() {
        let mut bag = DiagnosticBag::new();
        for i in 0..3 {
            bag.report(
                DiagnosticInfo::error(
                    DiagnosticCategory::Syntax,
                    DiagnosticCode::UnexpectedToken,
                    format!("error {i}"),
                ),
                None,
            );
        }
        assert_eq!(bag.len(), 3);
        let messages: Vec<_> = bag.iter().map(|d| d.info.message.clone()).collect();
        assert_eq!(messages, vec!["error 0", "error 1", "error 2"]);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = DiagnosticBag::new();
        first.report(
            DiagnosticInfo::error(
                DiagnosticCategory::Syntax,
                DiagnosticCode::UnexpectedToken,
                "lex",
            ),
            None,
        );
        let mut second = DiagnosticBag::new();
        second.report(
            DiagnosticInfo::error(
                DiagnosticCategory::Syntax,
                DiagnosticCode::UnexpectedToken,
                "parse",
            ),
            None,
        );
        first.extend(second);
        let messages: Vec<_> = first.iter().map(|d| d.info.message.as_str()).collect();
        assert_eq!(messages, vec!["lex", "parse"]);
    }
}
