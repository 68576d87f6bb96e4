//! Upload/read classification.
//!
//! Every request body is drained into the content store before anything
//! else happens, so by the time we classify we know both its length and its
//! hash. An empty body means "read", anything else is an upload.

use tracing::debug;

/// Empty-body hashes produced by the previous storage backend.
///
/// Compatibility shim only: clients and proxies in front of older
/// deployments may still present these. New stores are classified by length.
pub const LEGACY_EMPTY_BODY_HASHES: [&str; 2] = [
    "e436acb4b40175eb9014c83cdc3e937a042345845191cd6e7e901be3affd0943",
    "69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9",
];

/// What the gateway should do with an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    /// Empty body, non-GET method: answer with permissive CORS and stop
    Preflight,
    /// Empty body, GET: resolve the name
    Read,
    /// Body carries content to persist
    Upload,
}

impl Exchange {
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload)
    }
}

pub fn is_empty_body(length: u64, hash: &str) -> bool {
    length == 0 || LEGACY_EMPTY_BODY_HASHES.contains(&hash)
}

pub fn classify(is_get: bool, length: u64, hash: &str) -> Exchange {
    let exchange = match (is_empty_body(length, hash), is_get) {
        (false, _) => Exchange::Upload,
        (true, true) => Exchange::Read,
        (true, false) => Exchange::Preflight,
    };
    debug!(is_get, length, ?exchange, "classified exchange");
    exchange
}
