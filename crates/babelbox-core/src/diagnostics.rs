//! Recoverable diagnostics reported while parsing tables
//!
//! Parsing never fails because of bad rows. Problems are handed to a
//! [`DiagnosticSink`] supplied by the caller and parsing continues.

use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A row has no identifier but carries translations
    MissingIdentifier,
    /// A language column is empty for a key
    MissingTranslation { language: String, key: String },
    /// A row has more cells than the header; the extra cells are ignored
    ExtraCells { expected: usize, found: usize },
    /// A header cell naming a language is blank; the column is ignored
    BlankLanguageColumn { column: usize },
    /// No dialect could be detected, the default dialect was used
    DialectFallback,
}

/// A single recoverable problem in one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source name (usually the file path)
    pub source: String,
    /// 1-based line number, where one applies
    pub line: Option<u64>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(source: impl Into<String>, line: Option<u64>, kind: DiagnosticKind) -> Self {
        Self {
            source: source.into(),
            line,
            kind,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::DialectFallback => Severity::Info,
            _ => Severity::Warning,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.source)?;
        if let Some(line) = self.line {
            write!(f, "@{}", line)?;
        }
        match &self.kind {
            DiagnosticKind::MissingIdentifier => {
                write!(f, ": Non-empty line is missing identifier")
            }
            DiagnosticKind::MissingTranslation { language, key } => {
                write!(f, ": Locale '{}' has no translation for '{}'", language, key)
            }
            DiagnosticKind::ExtraCells { expected, found } => write!(
                f,
                ": Row has {} cells but header has {}, ignoring extra cells",
                found, expected
            ),
            DiagnosticKind::BlankLanguageColumn { column } => {
                write!(f, ": Column {} has no language code, ignoring it", column + 1)
            }
            DiagnosticKind::DialectFallback => {
                write!(f, ": Couldn't determine CSV dialect, using default")
            }
        }
    }
}

/// Receiver for diagnostics produced while loading tables
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics for later inspection
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!("{}", diagnostic),
            Severity::Info => tracing::info!("{}", diagnostic),
        }
    }
}
