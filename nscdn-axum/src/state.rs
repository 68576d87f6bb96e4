use std::sync::Arc;

use nscdn_blob::{ContentStore, FsContentStore, MemoryContentStore};
use nscdn_core::{CdnSettings, FileService, FileTable, JsonlFileTable, MemoryFileTable, StoreKind};

use crate::legacy::{HttpLegacyOrigin, LegacyOrigin, NoLegacyOrigin};

/// Everything a request handler needs; cheap to clone
#[derive(Clone)]
pub struct GatewayState {
    pub files: FileService,
    pub blobs: Arc<dyn ContentStore>,
    pub legacy: Arc<dyn LegacyOrigin>,
    /// Send the whole object size as `Content-Length` on 206 responses
    pub declared_range_length: bool,
}

impl GatewayState {
    pub fn new(files: FileService, blobs: Arc<dyn ContentStore>) -> Self {
        Self {
            files,
            blobs,
            legacy: Arc::new(NoLegacyOrigin),
            declared_range_length: false,
        }
    }

    /// In-memory table and blobs, no legacy fallback
    pub fn in_memory() -> Self {
        Self::new(
            FileService::new(Arc::new(MemoryFileTable::new())),
            Arc::new(MemoryContentStore::new()),
        )
    }

    pub fn with_legacy<L: LegacyOrigin + 'static>(mut self, legacy: L) -> Self {
        self.legacy = Arc::new(legacy);
        self
    }

    pub fn with_declared_range_length(mut self, declared: bool) -> Self {
        self.declared_range_length = declared;
        self
    }

    /// Open the stores described by `settings`
    pub async fn open(settings: &CdnSettings) -> anyhow::Result<Self> {
        let (table, blobs): (Arc<dyn FileTable>, Arc<dyn ContentStore>) = match settings.store {
            StoreKind::Fs => (
                Arc::new(JsonlFileTable::open(settings.table_path()).await?),
                Arc::new(FsContentStore::open(settings.blob_dir()).await?),
            ),
            StoreKind::Memory => (
                Arc::new(MemoryFileTable::new()),
                Arc::new(MemoryContentStore::new()),
            ),
        };

        let files = FileService::new(table).with_default_type(settings.default_type.clone());
        let state = Self::new(files, blobs).with_declared_range_length(settings.declared_range_length);

        Ok(match &settings.legacy_origin {
            Some(base) => state.with_legacy(HttpLegacyOrigin::new(base.clone())?),
            None => state,
        })
    }
}
