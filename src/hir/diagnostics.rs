//! Diagnostics: conversion error and warning reporting.
//!
//! Every stage reports through these types: parse failures, opaque fallbacks
//! during extraction, link errors and per-unit emit errors.

use std::fmt;
use std::sync::Arc;

use crate::base::Span;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        }
    }
}

/// A diagnostic message attached to a source unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The unit this diagnostic is about.
    pub unit: Arc<str>,
    /// Source location, when the problem has one.
    pub span: Option<Span>,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub unit: Arc<str>,
    pub span: Option<Span>,
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(severity: Severity, unit: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self {
            unit: unit.into(),
            span: None,
            severity,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(unit: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, unit, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(unit: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, unit, message)
    }

    pub fn info(unit: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, unit, message)
    }

    /// Set the span for this diagnostic.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unit)?;
        if let Some(span) = self.span {
            write!(f, ":{}", span.start)?;
        }
        write!(f, ": {}", self.severity.as_str())?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: Link errors (resolution, duplicates, cycles)
/// - **X0001-X0099**: Emit errors (profile lacks a template)
/// - **W0001-W0099**: Warnings (opaque fallbacks, recovered syntax)
/// - **I0001-I0099**: Informational notes
///
/// Parse failures carry the parser's own `E01xx`/`E02xx` codes.
#[allow(dead_code)]
pub mod codes {
    // ========================================================================
    // LINK ERRORS (E0001-E0099)
    // ========================================================================

    /// Delegate or instantiation target not found.
    pub const UNRESOLVED_REFERENCE: &str = "E0001";
    /// Several candidates match a reference.
    pub const AMBIGUOUS_REFERENCE: &str = "E0002";
    /// Two units share a qualified name.
    pub const DUPLICATE_UNIT: &str = "E0004";
    /// Delegate call graph contains a cycle.
    pub const CIRCULAR_DELEGATION: &str = "E0007";

    // ========================================================================
    // EMIT ERRORS (X0001-X0099)
    // ========================================================================

    pub const UNSUPPORTED_LOCATOR: &str = "X0001";
    pub const UNSUPPORTED_CONDITION: &str = "X0002";
    pub const MISSING_TEMPLATE: &str = "X0003";

    // ========================================================================
    // WARNINGS (W0001-W0099)
    // ========================================================================

    /// Construct kept as opaque text.
    pub const UNRECOGNIZED_CONSTRUCT: &str = "W0001";
    /// Parser recovered from a syntax error.
    pub const RECOVERED_SYNTAX: &str = "W0002";
    /// Unit skipped because a unit it depends on failed.
    pub const DEPENDENCY_FAILED: &str = "W0003";

    // ========================================================================
    // NOTES (I0001-I0099)
    // ========================================================================

    /// `catch (InterruptedException e)` around sleeps was dropped.
    pub const UNWRAPPED_INTERRUPTED: &str = "I0001";
    /// Statement-level script awaited by the target bridge.
    pub const AWAITED_SCRIPT: &str = "I0002";
    /// Delegate call inlined at the call site.
    pub const INLINED_DELEGATE: &str = "I0003";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics across the stages of a run.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Add an opaque-fallback warning.
    pub fn unrecognized_construct(&mut self, unit: &Arc<str>, span: Span, text: &str) {
        let preview: String = text.lines().next().unwrap_or("").chars().take(60).collect();
        self.add(
            Diagnostic::warning(
                unit.clone(),
                format!("unrecognized construct kept as opaque text: `{preview}`"),
            )
            .with_span(span)
            .with_code(codes::UNRECOGNIZED_CONSTRUCT),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific unit.
    pub fn diagnostics_for_unit(&self, unit: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| &*d.unit == unit)
            .collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all collected diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("LoginTest.java", "test error")
            .with_span(Span::from_coords(10, 5, 10, 9));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.span.map(|s| s.start.line), Some(10));
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::error("A.java", "test").with_code(codes::UNRESOLVED_REFERENCE);
        assert_eq!(diag.code.as_deref(), Some("E0001"));
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::warning("A.java", "kept")
            .with_span(Span::from_coords(2, 4, 2, 8))
            .with_code(codes::UNRECOGNIZED_CONSTRUCT);
        assert_eq!(diag.to_string(), "A.java:3:5: warning[W0001]: kept");
        assert_eq!(Diagnostic::info("B.java", "note").to_string(), "B.java: info: note");
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.add(Diagnostic::error("A.java", "error 1"));
        collector.add(Diagnostic::error("A.java", "error 2"));
        collector.add(Diagnostic::warning("A.java", "warning 1"));

        assert_eq!(collector.error_count(), 2);
        assert_eq!(collector.warning_count(), 1);
        assert!(collector.has_errors());
        assert_eq!(collector.take().len(), 3);
        assert!(!collector.has_errors());
    }

    #[test]
    fn test_collector_by_unit() {
        let mut collector = DiagnosticCollector::new();
        let unit: Arc<str> = Arc::from("A.java");
        collector.unrecognized_construct(&unit, Span::default(), "for (int i = 0; i < 3; i++) {\n}");
        collector.add(Diagnostic::error("B.java", "other"));

        let a = collector.diagnostics_for_unit("A.java");
        assert_eq!(a.len(), 1);
        assert!(a[0].message.contains("for (int i = 0; i < 3; i++) {`"));
    }
}
