//! Diagnostics collection
//!
//! The driver aggregates toolchain-reported diagnostics verbatim and never
//! interprets them. Every parse and compile operation takes a
//! caller-supplied sink that is passed through to the toolchain unchanged.

use std::fmt;

/// Severity of a toolchain diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A position in a source unit (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single toolchain-reported message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Name of the unit the message refers to, if any
    pub unit: Option<String>,
    pub position: Option<SourcePosition>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            unit: None,
            position: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Attach the unit name the message refers to.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attach a source position.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(SourcePosition::new(line, column));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.unit, &self.position) {
            (Some(unit), Some(pos)) => write!(
                f,
                "{}:{}:{}: {}: {}",
                unit,
                pos.line,
                pos.column,
                self.severity.as_str(),
                self.message
            ),
            (Some(unit), None) => {
                write!(f, "{}: {}: {}", unit, self.severity.as_str(), self.message)
            }
            (None, Some(pos)) => write!(
                f,
                "{}:{}: {}: {}",
                pos.line,
                pos.column,
                self.severity.as_str(),
                self.message
            ),
            (None, None) => write!(f, "{}: {}", self.severity.as_str(), self.message),
        }
    }
}

/// Append-only collector passed through to every toolchain invocation.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Vec-backed sink.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
