//! Diagnostics infrastructure: a collector plus a source-aware printer.
//!
//! Lexical, semantic, and IR-builder diagnostics all accumulate here rather
//! than aborting the pass that raised them; only a structural parse error
//! halts a compile outright (see `pipeline::PipelineError`).

mod message;
mod printer;

pub use message::{Location, Severity};
pub use printer::DiagnosticsPrinter;

use message::DiagnosticMessage;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not recorded, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, msg: impl Into<String>, location: Location) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(location, msg),
        }
    }

    pub fn warning(&mut self, msg: impl Into<String>, location: Location) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::warning(location, msg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn messages(&self) -> &[DiagnosticMessage] {
        &self.messages
    }

    pub fn printer<'a>(&'a self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(&self.messages, source)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Flattened `"line N: message"` strings, the shape the pipeline result
    /// exposes as `lex_errors` per the external-interface contract.
    pub fn to_line_strings(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|m| match &m.location {
                Location::Line(line) => format!("line {line}: {}", m.message),
                Location::Span(range) => format!("{}..{}: {}", range.start, range.end, m.message),
            })
            .collect()
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_counts_errors() {
        let mut diag = Diagnostics::new();
        diag.error("bad token", Location::Line(1)).emit();
        diag.warning("unused", Location::Line(2)).emit();
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.error_count(), 1);
        assert!(diag.has_errors());
    }
}
