//! Bracket and indentation assistance

use crate::syntax::tables::BLOCK_KEYWORDS;

/// Delimiter pairs closed automatically on insertion
pub const PAIRS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('"', '"')];

/// Spaces added after a block-opening line
pub const INDENT_WIDTH: usize = 4;

pub fn closing_for(open: char) -> Option<char> {
    PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

/// Text to insert for a typed opening delimiter and the caret advance (in
/// chars) from the insertion point, which leaves the caret between the pair.
pub fn auto_close(open: char) -> Option<(String, usize)> {
    closing_for(open).map(|close| (format!("{open}{close}"), 1))
}

/// Indentation for the line following `previous_line`.
///
/// Repeats the leading whitespace, adding [`INDENT_WIDTH`] spaces when the
/// line ends with `{` or starts with a block keyword. Never dedents.
pub fn compute_indent(previous_line: &str) -> String {
    let trimmed = previous_line.trim();
    let base_len = previous_line.len() - previous_line.trim_start().len();
    let mut indent = previous_line[..base_len].to_string();

    if trimmed.ends_with('{') || opens_block(trimmed) {
        indent.push_str(&" ".repeat(INDENT_WIDTH));
    }
    indent
}

/// Raw prefix test against the block keywords, so `sino`, `si!` and
/// `sistema.limpiar()` indent as well.
fn opens_block(trimmed: &str) -> bool {
    BLOCK_KEYWORDS.iter().any(|k| trimmed.starts_with(k))
}
