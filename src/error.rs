use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the user by file operations and the execution handoff.
///
/// Highlighting and completion never fail; only the steps that touch the
/// filesystem, the network client or the runtime process return these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("No file path (use :w <path>)")]
    NoFilePath,

    #[error("Could not write bridge file {}: {source}", path.display())]
    BridgeWrite { path: PathBuf, source: io::Error },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Runtime command is empty")]
    EmptyRuntimeCommand,

    #[error("Could not launch '{command}': {source}")]
    RuntimeLaunch { command: String, source: io::Error },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
