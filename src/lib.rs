//! RedSync Studio: a terminal editor for the RedSync scripting language.
//!
//! The analysis core (`syntax`, `completion`, `editor::assist`) is pure and
//! infallible. `bridge` and `runtime` cover the execution handoff.

pub mod bridge;
pub mod completion;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod runtime;
pub mod syntax;
pub mod theme;

pub use error::{Error, Result};
