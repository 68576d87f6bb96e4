use async_trait::async_trait;

use crate::{BlobResult, ByteRange, ByteStream, StoredBlob};

/// Content-addressed storage operations - implemented by every blob backend
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Consume `stream` to completion and persist it under its content hash.
    ///
    /// Returns only after every byte is durable. An error from the stream
    /// aborts the store and leaves nothing behind.
    async fn store(&self, stream: ByteStream) -> BlobResult<StoredBlob>;

    /// Stream a blob back, optionally limited to a half-open byte range.
    ///
    /// A range reaching past the end is clamped; one starting past the end
    /// yields an empty stream.
    async fn read(&self, hash: &str, range: Option<ByteRange>) -> BlobResult<ByteStream>;

    /// Whether a blob with this hash is present
    async fn contains(&self, hash: &str) -> BlobResult<bool>;
}
