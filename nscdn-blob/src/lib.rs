//! # nscdn-blob: content-addressed blob storage
//!
//! `nscdn-blob` is the byte layer underneath the nscdn gateway. Blobs are
//! keyed by the sha256 of their content: callers hand a stream to
//! [`ContentStore::store`] and get back the hash once every byte is persisted,
//! then read it back (whole or as a byte range) with [`ContentStore::read`].
//!
//! ## Key Features
//!
//! - **Streaming-first**: bodies are hashed and written chunk by chunk, never buffered whole
//! - **Deduplicating**: identical content lands on the same key and is stored once
//! - **Range reads**: half-open `[start, end)` reads for partial content delivery
//! - **Storage agnostic**: memory and filesystem backends ship here, anything else implements the trait
//!
//! ## Quick Start
//!
//! ```rust
//! use nscdn_blob::prelude::*;
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let store = MemoryContentStore::new();
//!
//! let body = futures::stream::once(async { Ok::<_, std::io::Error>(Bytes::from_static(b"Hello, world!")) });
//! let stored = store.store(Box::pin(body)).await?;
//! assert_eq!(stored.size, 13);
//!
//! // Read "world" back
//! let _stream = store.read(&stored.hash, Some(ByteRange::inclusive(7, 11))).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Gateway     │  ← classification, naming, HTTP
//! ├─────────────────┤
//! │  ContentStore   │  ← hash-keyed storage primitives
//! └─────────────────┘
//! ```

mod config;
mod digest;
mod error;
mod fs;
mod memory;
mod receipt;
pub mod store;
mod types;

pub use config::BlobConfig;
pub use digest::{is_content_hash, ContentHasher, EMPTY_CONTENT_HASH};
pub use error::{BlobError, BlobResult};
pub use fs::FsContentStore;
pub use memory::MemoryContentStore;
pub use receipt::StoredBlob;
pub use store::ContentStore;
pub use types::{ByteRange, ByteStream};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobError, BlobResult, ByteRange, ByteStream, ContentStore, FsContentStore,
        MemoryContentStore, StoredBlob,
    };
}
