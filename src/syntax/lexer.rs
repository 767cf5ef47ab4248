//! Lexical classifier
//!
//! Five pattern passes over the whole text produce tagged byte ranges:
//! comments, string literals, keywords, module calls and operators. Passes may
//! overlap; [`resolve`] turns them into non-overlapping painted spans.

use std::sync::LazyLock;

use regex::Regex;

use super::tables;

/// Category of a tagged region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Keyword,
    ModuleCall,
    Operator,
    String,
    Comment,
}

impl SpanKind {
    /// Painting precedence: literals, then keywords, module calls, operators
    pub fn priority(self) -> u8 {
        match self {
            SpanKind::Comment | SpanKind::String => 3,
            SpanKind::Keyword => 2,
            SpanKind::ModuleCall => 1,
            SpanKind::Operator => 0,
        }
    }
}

/// A tagged byte range `start..end` of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

// Comments and strings are found by one leftmost scan, so `//` inside a string
// and quotes inside a comment are not tagged. Strings never span lines and
// have no escapes: the nearest `"` closes them.
static LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"//[^\n]*|"[^"\n]*""#).expect("valid literal pattern"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+!?").expect("valid word pattern"));

static MODULE_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b(?:{})\.\w+", tables::module_prefixes().join("|"));
    Regex::new(&pattern).expect("valid module call pattern")
});

static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[=+\-*/<>!]").expect("valid operator pattern"));

/// Run every pass over `text`, in pass order.
pub fn classify(text: &str) -> Vec<Span> {
    let (comments, strings): (Vec<Span>, Vec<Span>) = literal_spans(text)
        .into_iter()
        .partition(|span| span.kind == SpanKind::Comment);

    let mut spans = comments;
    spans.extend(strings);
    spans.extend(keyword_spans(text));
    spans.extend(module_call_spans(text));
    spans.extend(operator_spans(text));
    spans
}

fn literal_spans(text: &str) -> Vec<Span> {
    LITERAL_RE
        .find_iter(text)
        .map(|m| {
            let kind = if m.as_str().starts_with("//") {
                SpanKind::Comment
            } else {
                SpanKind::String
            };
            Span::new(kind, m.start(), m.end())
        })
        .collect()
}

/// Whole-word keyword matches. A trailing `!` belongs to the keyword only
/// when the bang form is itself a keyword (`si!`, `cada!`).
fn keyword_spans(text: &str) -> Vec<Span> {
    WORD_RE
        .find_iter(text)
        .filter_map(|m| {
            let word = m.as_str();
            if tables::is_keyword(word) {
                return Some(Span::new(SpanKind::Keyword, m.start(), m.end()));
            }
            let bare = word.strip_suffix('!')?;
            tables::is_keyword(bare)
                .then(|| Span::new(SpanKind::Keyword, m.start(), m.start() + bare.len()))
        })
        .collect()
}

fn module_call_spans(text: &str) -> Vec<Span> {
    MODULE_CALL_RE
        .find_iter(text)
        .map(|m| Span::new(SpanKind::ModuleCall, m.start(), m.end()))
        .collect()
}

fn operator_spans(text: &str) -> Vec<Span> {
    OPERATOR_RE
        .find_iter(text)
        .map(|m| Span::new(SpanKind::Operator, m.start(), m.end()))
        .collect()
}

/// Resolve overlapping spans into non-overlapping ones ordered by start.
///
/// Each byte takes the kind of the highest-priority span covering it; among
/// equal priorities the span listed later wins.
pub fn resolve(spans: &[Span]) -> Vec<Span> {
    let len = spans.iter().map(|s| s.end).max().unwrap_or(0);
    let mut painted: Vec<Option<SpanKind>> = vec![None; len];

    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by_key(|span| span.kind.priority());
    for span in ordered {
        for slot in &mut painted[span.start..span.end] {
            *slot = Some(span.kind);
        }
    }

    let mut resolved = Vec::new();
    let mut run: Option<Span> = None;
    for (pos, kind) in painted.into_iter().enumerate() {
        match (run.as_mut(), kind) {
            (Some(current), Some(kind)) if current.kind == kind && current.end == pos => {
                current.end = pos + 1;
            }
            (_, Some(kind)) => {
                if let Some(done) = run.take() {
                    resolved.push(done);
                }
                run = Some(Span::new(kind, pos, pos + 1));
            }
            (_, None) => {
                if let Some(done) = run.take() {
                    resolved.push(done);
                }
            }
        }
    }
    if let Some(done) = run {
        resolved.push(done);
    }
    resolved
}
