/// Record type used when an upload carries no `Content-Type`
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

const HASH_SUFFIX_LEN: usize = 64;

/// True when `name` ends in 64 hex characters (either case), i.e. could be
/// mistaken for a raw content hash.
pub fn looks_like_hash(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= HASH_SUFFIX_LEN
        && bytes[bytes.len() - HASH_SUFFIX_LEN..]
            .iter()
            .all(u8::is_ascii_hexdigit)
}

/// Name given to uploads whose requested name is unusable
pub fn synthetic_name(id: u64) -> String {
    format!("file{id}")
}

/// A persisted body waiting for its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    /// Requested name: the request path without its leading `/`
    pub name: String,
    pub hash: String,
    pub size: u64,
    pub content_type: Option<String>,
}

impl NewUpload {
    pub fn new<N: Into<String>, H: Into<String>>(name: N, hash: H, size: u64) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            size,
            content_type: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
