//! Rendering diagnostics against the mapper file they came from.
//!
//! With a source attached each diagnostic becomes an annotate-snippets
//! report: the message as title, the owning statement as the underline
//! label, the kind's hint as a help line. Without one, diagnostics print in
//! their one-line `Display` form.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::{DiagnosticMessage, Diagnostics, Severity, Span};

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    origin: Option<&'s str>,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            origin: None,
        }
    }

    /// Mapper XML the spans point into.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown above each snippet.
    pub fn origin(mut self, origin: &'s str) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = Renderer::plain();
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.source {
                Some(source) => write!(w, "{}", renderer.render(&[self.report(diag, source)]))?,
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn report<'a>(&self, diag: &'a DiagnosticMessage, source: &'a str) -> Group<'a>
    where
        's: 'a,
    {
        let label = diag.owner.as_deref().map(|owner| format!("in {owner}"));
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(visible_range(&diag.range, source.len()))
                .label(label),
        );
        if let Some(origin) = self.origin {
            snippet = snippet.path(origin);
        }

        let group = level(diag.severity())
            .primary_title(diag.message.as_str())
            .element(snippet);
        match diag.hint {
            Some(hint) => group.element(Level::HELP.message(hint)),
            None => group,
        }
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Clamp to the source and widen empty ranges to one byte so the marker shows.
fn visible_range(range: &Span, len: usize) -> Span {
    let start = range.start.min(len);
    let end = range.end.min(len);
    if start == end {
        start..(start + 1).min(len)
    } else {
        start..end
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }

    /// Every diagnostic as a snippet of `source`, headed by `origin`.
    pub fn render(&self, origin: &str, source: &str) -> String {
        self.printer().source(source).origin(origin).render()
    }
}
