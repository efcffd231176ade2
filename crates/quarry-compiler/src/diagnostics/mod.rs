//! Findings collected while compiling one mapper.
//!
//! Every pass appends to the same [`Diagnostics`]. Whether a finding is an
//! error, a warning or fatal follows from its [`DiagnosticKind`] alone.

mod message;
mod printer;

#[cfg(test)]
mod tests;

pub use message::{DiagnosticKind, DiagnosticMessage, Severity};
pub use printer::DiagnosticsPrinter;

/// Byte range in a mapper source.
pub type Span = std::ops::Range<usize>;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// A finding under construction; nothing is recorded until [`emit`](Self::emit).
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Vec<DiagnosticMessage>,
    pending: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a finding of `kind` at `range`, worded with the kind's fallback
    /// message until `.message()` supplies detail.
    pub fn report(&mut self, kind: DiagnosticKind, range: Span) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: &mut self.messages,
            pending: DiagnosticMessage::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.iter().any(DiagnosticMessage::is_error)
    }

    /// Whether any finding aborts compilation of the mapper.
    pub fn has_fatal(&self) -> bool {
        self.iter().any(|d| d.kind.is_fatal())
    }

    pub fn error_count(&self) -> usize {
        self.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.iter().filter(|d| d.is_warning()).count()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &DiagnosticMessage> {
        self.iter().filter(move |d| d.kind == kind)
    }

    /// Findings about one statement or fragment, by qualified id.
    pub fn of_owner<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a DiagnosticMessage> {
        self.iter().filter(move |d| d.owner() == Some(owner))
    }

    /// Append the findings of a later pass.
    pub fn extend(&mut self, later: Diagnostics) {
        self.messages.extend(later.messages);
    }
}

impl DiagnosticBuilder<'_> {
    /// Fill the kind's message template with `detail`.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        self.pending.message = self.pending.kind.message(Some(&detail.into()));
        self
    }

    /// Name the statement or fragment the finding concerns.
    pub fn owner(mut self, qualified_id: impl Into<String>) -> Self {
        self.pending.owner = Some(qualified_id.into());
        self
    }

    pub fn emit(self) {
        self.sink.push(self.pending);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
