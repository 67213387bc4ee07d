//! Severity-tagged, ordered parse diagnostics.
//!
//! The parser never aborts on a recoverable problem; it records a
//! [`Diagnostic`] and moves on. Diagnostics accumulate in an
//! [`ErrorCollector`] in insertion order, and callers decide afterwards
//! whether the result is usable by checking
//! [`ErrorCollector::has_severe_errors`].

use std::fmt;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// How bad a diagnostic is.
///
/// The ordering is `Hint < Info < Warning < Severe`. Only `Severe`
/// diagnostics indicate that the source could not be parsed at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Severity {
    /// A stylistic observation; the data is fine.
    Hint,
    /// Something unusual but harmless.
    Info,
    /// Data was dropped, repaired, or is suspect.
    Warning,
    /// The file could not be opened, read, or decoded.
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Severe => "severe",
        };
        write!(f, "{label}")
    }
}

/// The parser subsystem a diagnostic originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Context {
    /// The line lexer rejected a physical line.
    LineParsing,
    /// A line had no admissible parent at its level.
    Hierarchy,
    /// An illegal `CONC`/`CONT` construction.
    Continuation,
    /// A structural check on an otherwise parseable file.
    FileValidation,
    /// Byte-order-mark and declared-encoding handling.
    EncodingDetection,
    /// Opening or reading the source.
    FileIo,
}

impl Context {
    /// The short human-readable label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Context::LineParsing => "Line Parsing",
            Context::Hierarchy => "Hierarchy",
            Context::Continuation => "CONC/CONT Handling",
            Context::FileValidation => "File Validation",
            Context::EncodingDetection => "Encoding Detection",
            Context::FileIo => "File I/O",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single collected diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// How bad it is.
    pub severity: Severity,
    /// What happened.
    pub message: String,
    /// 1-based source line, or 0 when the problem is not line-bound.
    pub line_number: u32,
    /// Which subsystem reported it.
    pub context: Context,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_number == 0 {
            write!(f, "{} [{}]: {}", self.severity, self.context, self.message)
        } else {
            write!(
                f,
                "{} [{}] line {}: {}",
                self.severity, self.context, self.line_number, self.message
            )
        }
    }
}

/// An append-only, ordered collection of diagnostics.
///
/// Duplicates are allowed; insertion order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct ErrorCollector {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Appends a `Hint` diagnostic.
    pub fn hint(&mut self, context: Context, line_number: u32, message: impl Into<String>) {
        self.record(Severity::Hint, context, line_number, message);
    }

    /// Appends an `Info` diagnostic.
    pub fn info(&mut self, context: Context, line_number: u32, message: impl Into<String>) {
        self.record(Severity::Info, context, line_number, message);
    }

    /// Appends a `Warning` diagnostic.
    pub fn warning(&mut self, context: Context, line_number: u32, message: impl Into<String>) {
        self.record(Severity::Warning, context, line_number, message);
    }

    /// Appends a `Severe` diagnostic.
    pub fn severe(&mut self, context: Context, line_number: u32, message: impl Into<String>) {
        self.record(Severity::Severe, context, line_number, message);
    }

    fn record(
        &mut self,
        severity: Severity,
        context: Context,
        line_number: u32,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            message: message.into(),
            line_number,
            context,
        });
    }

    /// All diagnostics in insertion order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterates over diagnostics with exactly the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    /// Iterates over diagnostics at or above the given severity.
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity >= severity)
    }

    /// Iterates over diagnostics from the given context.
    pub fn with_context(&self, context: Context) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.context == context)
    }

    /// Whether any `Severe` diagnostic was collected.
    ///
    /// This is the gate callers use to distinguish "parsed with
    /// diagnostics" from "was not parsed".
    #[must_use]
    pub fn has_severe_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Severe)
    }

    /// Number of collected diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the collector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Moves all diagnostics from `other` into `self`, preserving order.
    pub fn append(&mut self, other: &mut ErrorCollector) {
        self.diagnostics.append(&mut other.diagnostics);
    }
}

impl<'a> IntoIterator for &'a ErrorCollector {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
