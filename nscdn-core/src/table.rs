use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{CdnResult, FileFilter, FileRecord};

/// Durable table of [`FileRecord`]s.
///
/// Implementations own the id sequence so that id allocation stays correct on
/// a multi-threaded runtime.
#[async_trait]
pub trait FileTable: Send + Sync {
    /// Append a record. Records are never updated afterwards.
    async fn insert(&self, record: FileRecord) -> CdnResult<()>;

    /// First record (in insertion order) matching `filter`
    async fn find_first(&self, filter: &FileFilter) -> CdnResult<Option<FileRecord>>;

    /// Number of records matching `filter`
    async fn count(&self, filter: &FileFilter) -> CdnResult<u64>;

    /// Reserve the next record id
    fn next_id(&self) -> u64;
}

/// Monotonic id source, seeded from the table when it is opened.
#[derive(Debug, Default)]
pub struct IdSequence {
    current: AtomicU64,
}

impl IdSequence {
    /// Sequence whose first `next()` returns `current + 1`
    pub fn starting_after(current: u64) -> Self {
        Self {
            current: AtomicU64::new(current),
        }
    }

    pub fn next(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Seed for a table holding `rows`: the row count, or the highest id if a
/// table was ever written with gaps.
pub(crate) fn seed_for(rows: &[FileRecord]) -> u64 {
    let max_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
    max_id.max(rows.len() as u64)
}

/// In-memory table, used by tests and `store.kind = memory` deployments
#[derive(Debug, Default)]
pub struct MemoryFileTable {
    rows: RwLock<Vec<FileRecord>>,
    ids: IdSequence,
}

impl MemoryFileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(rows: Vec<FileRecord>) -> Self {
        let ids = IdSequence::starting_after(seed_for(&rows));
        Self {
            rows: RwLock::new(rows),
            ids,
        }
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl FileTable for MemoryFileTable {
    async fn insert(&self, record: FileRecord) -> CdnResult<()> {
        self.rows.write().push(record);
        Ok(())
    }

    async fn find_first(&self, filter: &FileFilter) -> CdnResult<Option<FileRecord>> {
        Ok(self.rows.read().iter().find(|r| filter.matches(r)).cloned())
    }

    async fn count(&self, filter: &FileFilter) -> CdnResult<u64> {
        Ok(self.rows.read().iter().filter(|r| filter.matches(r)).count() as u64)
    }

    fn next_id(&self) -> u64 {
        self.ids.next()
    }
}
