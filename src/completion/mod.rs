//! Context-aware completion
//!
//! Candidates come from the keyword and module tables plus the identifiers
//! declared anywhere in the document.

mod engine;
mod symbols;

pub use engine::{Completion, MAX_CANDIDATES, candidates, complete, current_token};
pub use symbols::scan_declarations;
