use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::syntax::tables::DECLARATION_KEYWORDS;

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"\b(?:{})\s+([a-zA-Z_]\w*)",
        DECLARATION_KEYWORDS.join("|")
    );
    Regex::new(&pattern).expect("valid declaration pattern")
});

/// Collect every identifier introduced by a declaration keyword.
///
/// The index is flat (no scopes) and rebuilt from scratch on each call.
pub fn scan_declarations(text: &str) -> BTreeSet<String> {
    DECLARATION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}
