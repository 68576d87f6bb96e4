use std::collections::HashMap;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use parking_lot::RwLock;

use crate::{BlobError, BlobResult, ByteRange, ByteStream, ContentHasher, ContentStore, StoredBlob};

/// In-process store, used by tests and `store.kind = memory` deployments
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn store(&self, mut stream: ByteStream) -> BlobResult<StoredBlob> {
        let mut hasher = ContentHasher::new();
        let mut buffer = BytesMut::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            buffer.extend_from_slice(&chunk);
        }

        let (hash, size) = hasher.finish();
        self.blobs
            .write()
            .entry(hash.clone())
            .or_insert_with(|| buffer.freeze());

        Ok(StoredBlob::new(hash, size))
    }

    async fn read(&self, hash: &str, range: Option<ByteRange>) -> BlobResult<ByteStream> {
        let blob = self
            .blobs
            .read()
            .get(hash)
            .cloned()
            .ok_or_else(|| BlobError::not_found(hash))?;

        let (start, end) = range
            .unwrap_or_else(|| ByteRange::from_start(0))
            .bounds(blob.len() as u64);
        let slice = blob.slice(start as usize..end as usize);

        let chunk: Option<Result<Bytes, std::io::Error>> = (!slice.is_empty()).then_some(Ok(slice));
        Ok(Box::pin(futures_util::stream::iter(chunk)))
    }

    async fn contains(&self, hash: &str) -> BlobResult<bool> {
        Ok(self.blobs.read().contains_key(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EMPTY_CONTENT_HASH;

    fn body(parts: &'static [&'static str]) -> ByteStream {
        Box::pin(futures_util::stream::iter(
            parts.iter().map(|p| Ok::<_, std::io::Error>(Bytes::from_static(p.as_bytes()))),
        ))
    }

    async fn collect(stream: ByteStream) -> Vec<u8> {
        let chunks: Vec<_> = stream.collect().await;
        chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect()
    }

    #[tokio::test]
    async fn identical_content_is_stored_once() {
        let store = MemoryContentStore::new();
        let a = store.store(body(&["abc", "def"])).await.unwrap();
        let b = store.store(body(&["abcdef"])).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.size, 6);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn empty_stream_has_empty_hash() {
        let store = MemoryContentStore::new();
        let stored = store.store(body(&[])).await.unwrap();
        assert_eq!(stored.hash, EMPTY_CONTENT_HASH);
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn reads_ranges() {
        let store = MemoryContentStore::new();
        let stored = store.store(body(&["0123456789"])).await.unwrap();

        let full = store.read(&stored.hash, None).await.unwrap();
        assert_eq!(collect(full).await, b"0123456789");

        let mid = store
            .read(&stored.hash, Some(ByteRange::inclusive(3, 5)))
            .await
            .unwrap();
        assert_eq!(collect(mid).await, b"345");

        let past = store
            .read(&stored.hash, Some(ByteRange::from_start(42)))
            .await
            .unwrap();
        assert!(collect(past).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_hash_is_not_found() {
        let store = MemoryContentStore::new();
        let err = store.read(EMPTY_CONTENT_HASH, None).await.err().unwrap();
        assert!(err.is_not_found());
        assert!(!store.contains(EMPTY_CONTENT_HASH).await.unwrap());
    }

    #[tokio::test]
    async fn failing_stream_stores_nothing() {
        let store = MemoryContentStore::new();
        let stream: ByteStream = Box::pin(futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]));

        assert!(store.store(stream).await.is_err());
        assert!(store.is_empty());
    }
}
