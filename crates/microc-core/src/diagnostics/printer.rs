//! Renders a `Diagnostics` collection against source text.

use annotate_snippets::{Level, Renderer, Snippet};

use super::message::{DiagnosticMessage, Location, Severity};

/// Prints diagnostics, preferring rich source-annotated output via
/// `annotate-snippets` when a diagnostic carries a byte span, and falling
/// back to a plain `line N: message` line when it only carries a line
/// number (the manual scanner's diagnostics never have a span to annotate).
pub struct DiagnosticsPrinter<'a> {
    messages: &'a [DiagnosticMessage],
    source: &'a str,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(messages: &'a [DiagnosticMessage], source: &'a str) -> Self {
        Self { messages, source }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for msg in self.messages {
            out.push_str(&self.render_one(msg));
            out.push('\n');
        }
        out
    }

    fn render_one(&self, msg: &DiagnosticMessage) -> String {
        match &msg.location {
            Location::Span(range) => {
                let level = match msg.severity {
                    Severity::Error => Level::Error,
                    Severity::Warning => Level::Warning,
                };
                let snippet = Snippet::source(self.source)
                    .fold(true)
                    .annotation(level.span(range.clone()).label(&msg.message));
                let message = level.title(&msg.message).snippet(snippet);
                Renderer::styled().render(message).to_string()
            }
            Location::Line(line) => {
                let prefix = match msg.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                format!("{prefix}: line {line}: {}", msg.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fallback_for_line_only_diagnostics() {
        let msgs = vec![DiagnosticMessage::error(Location::Line(3), "unterminated comment")];
        let printer = DiagnosticsPrinter::new(&msgs, "");
        let rendered = printer.render();
        assert!(rendered.contains("line 3"));
        assert!(rendered.contains("unterminated comment"));
    }
}
