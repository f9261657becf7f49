use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;

use crate::lexer::LexError;
use crate::parser::ParseError;

/// A compile-time error inside an effect script.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Byte range within the script text.
    pub span: std::ops::Range<usize>,
    /// Headline message.
    pub message: String,
    /// Optional label attached to the span.
    pub label: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(span: std::ops::Range<usize>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            label: None,
        }
    }

    /// Attach a span label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 1-based line and column of the span start within `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let start = self.span.start.min(source.len());
        let before = &source[..start];
        let line = before.matches('\n').count() + 1;
        let col = before.rfind('\n').map_or(start, |nl| start - nl - 1) + 1;
        (line, col)
    }
}

impl From<LexError> for Diagnostic {
    fn from(e: LexError) -> Self {
        Diagnostic::error(e.span, e.message)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(e: ParseError) -> Self {
        Diagnostic::error(e.span, e.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

/// Render diagnostics for one script with ariadne.
///
/// `name` identifies the script in the report header, e.g. the response id.
pub fn render_diagnostics(source: &str, name: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        Report::build(ReportKind::Error, (name, diag.span.clone()))
            .with_message(&diag.message)
            .with_label(
                Label::new((name, diag.span.clone()))
                    .with_message(label_text)
                    .with_color(Color::Red),
            )
            .finish()
            .write((name, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}
