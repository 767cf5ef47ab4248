use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use futures::future::join_all;

use super::extract::extract_requests;
use super::fetch::Fetcher;
use crate::error::{Error, Result};

/// Value written when a request cannot be resolved
pub const NULL_VALUE: &str = "NULL";

/// One `destination|value` line of the bridge file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRecord {
    pub destination: String,
    pub value: String,
}

impl BridgeRecord {
    pub fn new(destination: &str, value: impl Into<String>) -> Self {
        Self {
            destination: destination.to_string(),
            value: value.into(),
        }
    }
}

impl fmt::Display for BridgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.destination, self.value)
    }
}

/// Serialize records, one newline-terminated line each
pub fn encode(records: &[BridgeRecord]) -> String {
    records.iter().map(|r| format!("{r}\n")).collect()
}

pub fn write_bridge(path: &Path, records: &[BridgeRecord]) -> Result<()> {
    fs::write(path, encode(records)).map_err(|source| Error::BridgeWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve every web read in `text` and write the bridge file at `path`.
///
/// Requests run concurrently but records keep source order. With no
/// requests nothing is written, and a leftover bridge file from an earlier
/// run is removed.
pub async fn build_bridge(text: &str, fetcher: &Fetcher, path: &Path) -> Result<Vec<BridgeRecord>> {
    let requests = extract_requests(text);

    if requests.is_empty() {
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale bridge file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::BridgeWrite {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        return Ok(Vec::new());
    }

    tracing::info!(count = requests.len(), "fetching web reads");
    let records = join_all(requests.iter().map(|r| fetcher.resolve(r))).await;

    write_bridge(path, &records)?;
    tracing::info!(path = %path.display(), records = records.len(), "bridge file written");
    Ok(records)
}
