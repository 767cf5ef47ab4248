//! Syntax analysis for RedCode scripts
//!
//! Regex-driven lexical classification over the full document, re-run on
//! every edit. There is no parse tree: spans carry only a lexical category.

mod highlighter;
mod lexer;
pub mod tables;

pub use highlighter::{Highlight, HighlightedLine, Highlighter};
pub use lexer::{Span, SpanKind, classify, resolve};
