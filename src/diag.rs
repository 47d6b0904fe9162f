//! Rendering of syntax errors as `miette` reports.
//!
//! A [`SyntaxError`](crate::SyntaxError) is first lowered to a [`Diag`]
//! (code, message, labelled spans, help) and then paired with the query text
//! by [`render_report`], which clamps every span into the source so a stale
//! or end-of-input span never breaks rendering.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, NamedSource, Report, Severity, SourceCode};
use std::fmt;

/// A labelled source range. The first label of a [`Diag`] is the primary one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    pub message: String,
}

/// A renderable error diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// Stable error code such as `P001`.
    pub code: &'static str,
    pub message: String,
    pub labels: Vec<DiagLabel>,
    pub help: Option<String>,
}

impl Diag {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Adds a label; the first one added is rendered as primary.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Query text that diagnostics point into, with an optional display name.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    content: String,
}

impl SourceFile {
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_name(content, "query")
    }

    pub fn with_name(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clamps `span` into the source, snapping both ends to char boundaries.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let floor = |mut offset: usize| {
            offset = offset.min(self.content.len());
            while !self.content.is_char_boundary(offset) {
                offset -= 1;
            }
            offset
        };
        let start = floor(span.start);
        start..floor(span.end).max(start)
    }
}

/// Pairs `diag` with its source text as a printable `miette` report.
pub fn render_report(diag: &Diag, source: &SourceFile) -> Report {
    let labels = diag
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let span = source.clamp_span(&label.span);
            let at = (span.start, span.len());
            let message = Some(label.message.clone());
            if index == 0 {
                LabeledSpan::new_primary_with_span(message, at)
            } else {
                LabeledSpan::new_with_span(message, at)
            }
        })
        .collect();
    Report::new(Rendered {
        code: diag.code,
        message: diag.message.clone(),
        help: diag.help.clone(),
        labels,
        source: NamedSource::new(source.name(), source.content().to_string()),
    })
}

#[derive(Debug)]
struct Rendered {
    code: &'static str,
    message: String,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    source: NamedSource<String>,
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Rendered {}

impl Diagnostic for Rendered {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}
