use sha2::{Digest, Sha256};

/// sha256 of the empty byte sequence
pub const EMPTY_CONTENT_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Incremental sha256 over a blob's chunks, tracking its length as it goes.
#[derive(Default)]
pub struct ContentHasher {
    inner: Sha256,
    size: u64,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
        self.size += chunk.len() as u64;
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercase hex digest and total byte count.
    pub fn finish(self) -> (String, u64) {
        (hex::encode(self.inner.finalize()), self.size)
    }
}

/// True for keys this crate produces: 64 lowercase hex characters.
pub fn is_content_hash(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
