//! Pre-execution data bridge: resolves `web.leer` calls over HTTP and
//! hands the results to the runtime through a flat file.

mod encoder;
mod extract;
mod fetch;
mod lookup;
#[cfg(test)]
mod stub;

pub use encoder::{BridgeRecord, NULL_VALUE, build_bridge, encode, write_bridge};
pub use extract::{FetchRequest, extract_requests};
pub use fetch::{Fetcher, RAW_BODY_KEY, resolve_body};
pub use lookup::find_key;
