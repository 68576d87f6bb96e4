/// Configuration for blob backends
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Chunk size used when streaming blobs back out
    pub read_chunk_bytes: usize,

    /// Number of leading hash characters used as the shard directory
    pub shard_prefix_len: usize,

    /// fsync blobs before reporting them stored
    pub sync_on_store: bool,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            read_chunk_bytes: 64 * 1024, // 64KB
            shard_prefix_len: 2,
            sync_on_store: true,
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the streaming chunk size
    pub fn with_read_chunk_bytes(mut self, bytes: usize) -> Self {
        self.read_chunk_bytes = bytes.max(1);
        self
    }

    /// Set the shard prefix length (0 disables sharding)
    pub fn with_shard_prefix_len(mut self, len: usize) -> Self {
        self.shard_prefix_len = len.min(8);
        self
    }

    /// Skip fsync on store (tests, throwaway data)
    pub fn without_sync(mut self) -> Self {
        self.sync_on_store = false;
        self
    }
}
