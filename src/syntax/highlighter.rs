//! Per-line view over the classified spans of a document

use super::lexer::{self, Span, SpanKind};

/// A highlight span within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize, // Column start (byte offset within line)
    pub end: usize,   // Column end (byte offset within line)
    pub kind: SpanKind,
}

/// A line with its syntax highlights
#[derive(Debug, Clone, Default)]
pub struct HighlightedLine {
    pub highlights: Vec<Highlight>,
}

impl HighlightedLine {
    pub fn new() -> Self {
        Self {
            highlights: Vec::new(),
        }
    }

    /// Get the highlight kind at a given column
    pub fn kind_at(&self, col: usize) -> Option<SpanKind> {
        self.highlights
            .iter()
            .find(|h| col >= h.start && col < h.end)
            .map(|h| h.kind)
    }
}

/// Syntax highlighter for a buffer.
///
/// Holds the result of the last full re-scan; every edit calls [`parse`]
/// again with the whole text.
///
/// [`parse`]: Highlighter::parse
#[derive(Debug, Default)]
pub struct Highlighter {
    spans: Vec<Span>,
    line_highlights: Vec<HighlightedLine>,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-classify the whole source
    pub fn parse(&mut self, source: &str) {
        self.spans = lexer::resolve(&lexer::classify(source));
        self.build_highlights(source);
        tracing::debug!(spans = self.spans.len(), "re-highlighted document");
    }

    /// Resolved, non-overlapping spans of the last parse (byte offsets)
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn line_highlights(&self, line: usize) -> Option<&HighlightedLine> {
        self.line_highlights.get(line)
    }

    pub fn highlight_count(&self) -> usize {
        self.line_highlights
            .iter()
            .map(|l| l.highlights.len())
            .sum()
    }

    fn build_highlights(&mut self, source: &str) {
        let mut line_starts: Vec<usize> = vec![0];
        for (i, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        self.line_highlights = vec![HighlightedLine::new(); line_starts.len()];

        for span in &self.spans {
            // Last line whose start is at or before the span start
            let start_line = line_starts.partition_point(|&s| s <= span.start) - 1;
            let end_line = line_starts.partition_point(|&s| s < span.end) - 1;

            for line in start_line..=end_line {
                let line_start = line_starts[line];
                let line_end = line_starts.get(line + 1).copied().unwrap_or(source.len());

                let start = span.start.max(line_start) - line_start;
                let end = span.end.min(line_end) - line_start;

                if start < end {
                    self.line_highlights[line].highlights.push(Highlight {
                        start,
                        end,
                        kind: span.kind,
                    });
                }
            }
        }
    }
}
