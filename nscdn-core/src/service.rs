use std::sync::Arc;

use tracing::{debug, info};

use crate::naming::{looks_like_hash, synthetic_name, NewUpload, DEFAULT_CONTENT_TYPE};
use crate::resolver::{self, ReadRequest, Resolution};
use crate::{CdnResult, FileFilter, FileRecord, FileTable};

/// Naming, dedup and lookup over a [`FileTable`].
///
/// Cheap to clone; every clone shares the same table.
#[derive(Clone)]
pub struct FileService {
    table: Arc<dyn FileTable>,
    default_type: String,
}

impl FileService {
    pub fn new(table: Arc<dyn FileTable>) -> Self {
        Self {
            table,
            default_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    /// Record type used when an upload has no content type
    pub fn with_default_type<S: Into<String>>(mut self, default_type: S) -> Self {
        self.default_type = default_type.into();
        self
    }

    pub fn table(&self) -> &Arc<dyn FileTable> {
        &self.table
    }

    /// Name and record a persisted upload.
    ///
    /// Requested names that are empty, look like a content hash, or are
    /// already taken are replaced with `file<id>`. Collisions are never an
    /// error.
    pub async fn create(&self, upload: NewUpload) -> CdnResult<FileRecord> {
        let id = self.table.next_id();

        let name = if self.is_usable_name(&upload.name).await? {
            upload.name
        } else {
            let substitute = synthetic_name(id);
            debug!(requested = %upload.name, %substitute, "requested name unusable");
            substitute
        };

        let content_type = upload
            .content_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.default_type.clone());

        let record = FileRecord {
            id,
            hash: upload.hash,
            name,
            size: upload.size,
            time: chrono::Utc::now().timestamp_millis(),
            content_type,
        };

        self.table.insert(record.clone()).await?;
        info!(id = record.id, name = %record.name, size = record.size, "file recorded");

        Ok(record)
    }

    async fn is_usable_name(&self, name: &str) -> CdnResult<bool> {
        if name.is_empty() || looks_like_hash(name) {
            return Ok(false);
        }
        let taken = self.table.find_first(&FileFilter::by_name(name)).await?;
        Ok(taken.is_none())
    }

    pub async fn find_by_name(&self, name: &str) -> CdnResult<Option<FileRecord>> {
        self.table.find_first(&FileFilter::by_name(name)).await
    }

    /// Look up `request.name` and decide how to answer
    pub async fn resolve(&self, request: &ReadRequest<'_>) -> CdnResult<Resolution> {
        let found = self.find_by_name(request.name).await?;
        Ok(resolver::resolve(found, request))
    }
}
