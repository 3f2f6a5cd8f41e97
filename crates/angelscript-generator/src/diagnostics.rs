//! Non-fatal problems found during a run.
//!
//! Diagnostics are reported one per line on the error channel. None of them
//! stop the run; the affected name simply produces less output.

use std::fmt;

/// Kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A requested name is not in the symbol table.
    MissingSymbol,
    /// An `ascript:` directive is not a valid flag expression. It is still
    /// emitted as written.
    InvalidDirective,
}

impl DiagnosticKind {
    /// Line prefix.
    pub const fn severity(self) -> &'static str {
        match self {
            DiagnosticKind::MissingSymbol => "error",
            DiagnosticKind::InvalidDirective => "warning",
        }
    }
}

/// A single diagnostic about one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The requested name or type the diagnostic is about.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    /// A requested name that does not resolve.
    pub fn missing_symbol(name: &str) -> Self {
        Self {
            kind: DiagnosticKind::MissingSymbol,
            subject: name.to_string(),
            message: format!(
                "cannot generate bindings for '{name}': it is not in the symbol table"
            ),
        }
    }

    /// A directive that does not parse.
    pub fn invalid_directive(type_name: &str, directive: &str, problem: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::InvalidDirective,
            subject: type_name.to_string(),
            message: format!(
                "directive '{directive}' on '{type_name}' is used as written: {problem}"
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.severity(), self.message)
    }
}

/// Diagnostics in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of diagnostics of a kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
