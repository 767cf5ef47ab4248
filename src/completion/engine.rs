use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::symbols::scan_declarations;
use crate::syntax::tables::{KEYWORDS, MODULE_ENTRIES};

/// Maximum number of candidates shown
pub const MAX_CANDIDATES: usize = 10;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.]+$").expect("valid token pattern"));

/// The identifier-like run (`[\w.]+`) ending at byte offset `cursor`.
pub fn current_token(text: &str, cursor: usize) -> &str {
    let mut end = cursor.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    TOKEN_RE
        .find(&text[..end])
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Candidates for the token under the cursor, sorted and capped.
pub fn complete(text: &str, cursor: usize) -> Vec<String> {
    let token = current_token(text, cursor);
    if token.is_empty() {
        return Vec::new();
    }
    candidates(token, &scan_declarations(text))
}

/// Prefix-filter the candidate pool for `token`.
///
/// A dotted token narrows the pool to module entries sharing its namespace.
pub fn candidates(token: &str, symbols: &BTreeSet<String>) -> Vec<String> {
    if token.is_empty() {
        return Vec::new();
    }

    let pool: BTreeSet<&str> = match token.split_once('.') {
        Some((namespace, _)) => MODULE_ENTRIES
            .iter()
            .copied()
            .filter(|entry| entry.starts_with(namespace))
            .collect(),
        None => KEYWORDS
            .iter()
            .chain(MODULE_ENTRIES)
            .copied()
            .chain(symbols.iter().map(String::as_str))
            .collect(),
    };

    pool.into_iter()
        .filter(|entry| entry.starts_with(token))
        .take(MAX_CANDIDATES)
        .map(str::to_string)
        .collect()
}

/// Open/closed completion list with one highlighted entry.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    candidates: Vec<String>,
    selected: usize,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute candidates for the cursor position, resetting the selection.
    pub fn refresh(&mut self, text: &str, cursor: usize) {
        self.candidates = complete(text, cursor);
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.candidates.clear();
        self.selected = 0;
    }

    pub fn is_open(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&str> {
        self.candidates.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.is_open() {
            self.selected = (self.selected + 1).min(self.candidates.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Take the highlighted candidate and close the list.
    pub fn accept(&mut self) -> Option<String> {
        let choice = self.selected().map(str::to_string);
        self.close();
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_identifier_run_before_cursor() {
        let text = "vn x = web.le";
        assert_eq!(current_token(text, text.len()), "web.le");
        assert_eq!(current_token(text, 2), "vn");
        assert_eq!(current_token(text, 3), "");
    }

    #[test]
    fn token_stops_at_line_start() {
        let text = "vn a\nmos";
        assert_eq!(current_token(text, text.len()), "mos");
    }

    #[test]
    fn token_handles_offset_inside_multibyte_char() {
        let text = "año";
        // offset 2 falls inside 'ñ'; the token ends before it
        assert_eq!(current_token(text, 2), "a");
    }

    #[test]
    fn empty_token_yields_nothing() {
        assert!(complete("vn x = ", 7).is_empty());
    }

    #[test]
    fn keyword_prefix_ranks_first() {
        let text = "vn x = 1\nvn";
        let result = complete(text, text.len());
        assert_eq!(result.first().map(String::as_str), Some("vn"));
    }

    #[test]
    fn dotted_token_narrows_to_namespace() {
        assert_eq!(complete("web.", 4), vec!["web.leer"]);
    }

    #[test]
    fn dotted_token_excludes_user_symbols() {
        let symbols: BTreeSet<String> = ["tiempo_total".to_string()].into();
        assert_eq!(
            candidates("tiempo.", &symbols),
            vec!["tiempo.año", "tiempo.fecha", "tiempo.hora"]
        );
    }

    #[test]
    fn user_symbols_join_the_pool() {
        let text = "vn contador = 0\ncon";
        assert_eq!(
            complete(text, text.len()),
            vec!["contador", "contar", "contar!"]
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(candidates("MOS", &BTreeSet::new()).is_empty());
        assert_eq!(candidates("N", &BTreeSet::new()), vec!["NO"]);
    }

    #[test]
    fn results_are_capped_at_ten() {
        let symbols: BTreeSet<String> = (0..20).map(|i| format!("v{i:02}")).collect();
        let result = candidates("v", &symbols);
        assert_eq!(result.len(), MAX_CANDIDATES);
        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(result, sorted);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut completion = Completion::new();
        completion.refresh("con", 3);
        assert_eq!(completion.candidates(), ["contar", "contar!"]);

        completion.select_previous();
        assert_eq!(completion.selected_index(), 0);
        completion.select_next();
        completion.select_next();
        assert_eq!(completion.selected(), Some("contar!"));
    }

    #[test]
    fn refresh_resets_selection() {
        let mut completion = Completion::new();
        completion.refresh("con", 3);
        completion.select_next();
        completion.refresh("con", 3);
        assert_eq!(completion.selected_index(), 0);
    }

    #[test]
    fn navigation_is_noop_when_closed() {
        let mut completion = Completion::new();
        completion.select_next();
        completion.select_previous();
        assert!(!completion.is_open());
        assert_eq!(completion.selected(), None);
        assert_eq!(completion.accept(), None);
    }

    #[test]
    fn accept_closes_the_list() {
        let mut completion = Completion::new();
        completion.refresh("mos", 3);
        assert_eq!(completion.accept().as_deref(), Some("mostrar"));
        assert!(!completion.is_open());
    }
}
