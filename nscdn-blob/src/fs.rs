use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use crate::{
    is_content_hash, BlobConfig, BlobError, BlobResult, ByteRange, ByteStream, ContentHasher,
    ContentStore, StoredBlob,
};

const STAGING_DIR: &str = "tmp";

/// Filesystem store: `<root>/<hash prefix>/<hash>`, staged through `<root>/tmp`
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
    config: BlobConfig,
}

impl FsContentStore {
    /// Open (creating if needed) a store rooted at `root`
    pub async fn open<P: Into<PathBuf>>(root: P) -> BlobResult<Self> {
        Self::with_config(root, BlobConfig::default()).await
    }

    pub async fn with_config<P: Into<PathBuf>>(root: P, config: BlobConfig) -> BlobResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(STAGING_DIR)).await?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, hash: &str) -> BlobResult<PathBuf> {
        if !is_content_hash(hash) {
            return Err(BlobError::invalid(format!("not a content hash: {hash}")));
        }

        let prefix = &hash[..self.config.shard_prefix_len.min(hash.len())];
        Ok(if prefix.is_empty() {
            self.root.join(hash)
        } else {
            self.root.join(prefix).join(hash)
        })
    }

    async fn stage(&self, staged: &Path, mut stream: ByteStream) -> BlobResult<(String, u64)> {
        let mut file = File::create(staged).await?;
        let mut hasher = ContentHasher::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        if self.config.sync_on_store {
            file.sync_all().await?;
        }

        Ok(hasher.finish())
    }
}

/// Removes a staged file unless disarmed, so dropped or failed uploads leave nothing behind.
///
/// Normal paths clean up with `tokio::fs` and disarm; the blocking removal in
/// `Drop` only runs for errors and cancelled uploads.
struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn store(&self, stream: ByteStream) -> BlobResult<StoredBlob> {
        let mut staged = StagedFile::new(
            self.root
                .join(STAGING_DIR)
                .join(Uuid::new_v4().simple().to_string()),
        );

        let (hash, size) = self.stage(&staged.path, stream).await?;
        let dest = self.blob_path(&hash)?;

        if fs::try_exists(&dest).await? {
            debug!(%hash, "blob already present, dropping staged copy");
            if fs::remove_file(&staged.path).await.is_ok() {
                staged.disarm();
            }
            return Ok(StoredBlob::new(hash, size));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&staged.path, &dest).await?;
        staged.disarm();

        debug!(%hash, size, "blob stored");
        Ok(StoredBlob::new(hash, size))
    }

    async fn read(&self, hash: &str, range: Option<ByteRange>) -> BlobResult<ByteStream> {
        let path = self.blob_path(hash)?;
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::not_found(hash))
            }
            Err(e) => return Err(e.into()),
        };

        let total = file.metadata().await?.len();
        let (start, end) = range
            .unwrap_or_else(|| ByteRange::from_start(0))
            .bounds(total);

        file.seek(SeekFrom::Start(start)).await?;
        let reader = file.take(end - start);

        Ok(Box::pin(ReaderStream::with_capacity(
            reader,
            self.config.read_chunk_bytes,
        )))
    }

    async fn contains(&self, hash: &str) -> BlobResult<bool> {
        Ok(fs::try_exists(self.blob_path(hash)?).await?)
    }
}
