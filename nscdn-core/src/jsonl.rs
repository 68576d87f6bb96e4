//! Append-only JSON-lines table.
//!
//! One record per line. The whole table is loaded on open and kept in memory
//! for lookups; inserts append a line and are flushed before they become
//! visible to readers.
//!
//! A final line without its `\n` is what an interrupted append leaves behind.
//! On open it is dropped and the file cut back to the last complete line,
//! unless it still parses, in which case only the newline is restored. Damage
//! anywhere else is reported as [`CdnError::CorruptRecord`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::table::seed_for;
use crate::{CdnError, CdnResult, FileFilter, FileRecord, FileTable, IdSequence};

pub struct JsonlFileTable {
    path: PathBuf,
    rows: RwLock<Vec<FileRecord>>,
    writer: Mutex<File>,
    ids: IdSequence,
}

impl JsonlFileTable {
    /// Open the table at `path`, creating an empty one if it does not exist
    pub async fn open<P: Into<PathBuf>>(path: P) -> CdnResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let rows = match fs::read_to_string(&path).await {
            Ok(text) => load_rows(&path, &text).await?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let ids = IdSequence::starting_after(seed_for(&rows));
        info!(path = %path.display(), rows = rows.len(), next_id = ids.current() + 1, "file table opened");

        Ok(Self {
            path,
            rows: RwLock::new(rows),
            writer: Mutex::new(writer),
            ids,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse `text`, repairing an unterminated last line on disk first.
async fn load_rows(path: &Path, text: &str) -> CdnResult<Vec<FileRecord>> {
    let complete = text.rfind('\n').map_or(0, |pos| pos + 1);
    let tail = &text[complete..];
    let mut rows = parse_rows(path, &text[..complete])?;

    if tail.trim().is_empty() {
        return Ok(rows);
    }

    match serde_json::from_str::<FileRecord>(tail) {
        Ok(record) => {
            warn!(path = %path.display(), id = record.id, "last record had no line ending, restoring it");
            let mut file = OpenOptions::new().append(true).open(path).await?;
            file.write_all(b"\n").await?;
            file.sync_data().await?;
            rows.push(record);
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                dropped_bytes = tail.len(),
                error = %e,
                "dropping torn final line"
            );
            let file = OpenOptions::new().write(true).open(path).await?;
            file.set_len(complete as u64).await?;
            file.sync_data().await?;
        }
    }

    Ok(rows)
}

fn parse_rows(path: &Path, text: &str) -> CdnResult<Vec<FileRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| CdnError::CorruptRecord {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })
        })
        .collect()
}

#[async_trait]
impl FileTable for JsonlFileTable {
    async fn insert(&self, record: FileRecord) -> CdnResult<()> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        // Held until the row is visible so file order and memory order agree.
        let mut writer = self.writer.lock().await;
        let len = writer.metadata().await?.len();

        if let Err(e) = append(&mut writer, &line).await {
            if let Err(cut) = writer.set_len(len).await {
                warn!(path = %self.path.display(), error = %cut, "could not cut back a failed append");
            }
            return Err(e.into());
        }

        self.rows.write().await.push(record);
        Ok(())
    }

    async fn find_first(&self, filter: &FileFilter) -> CdnResult<Option<FileRecord>> {
        Ok(self.rows.read().await.iter().find(|r| filter.matches(r)).cloned())
    }

    async fn count(&self, filter: &FileFilter) -> CdnResult<u64> {
        Ok(self.rows.read().await.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    fn next_id(&self) -> u64 {
        self.ids.next()
    }
}

async fn append(writer: &mut File, line: &[u8]) -> std::io::Result<()> {
    writer.write_all(line).await?;
    writer.flush().await?;
    writer.sync_data().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> FileRecord {
        FileRecord {
            id,
            hash: format!("{id:064x}"),
            name: name.to_string(),
            size: id * 10,
            time: 1_700_000_000_000 + id as i64,
            content_type: "application/octet-stream".to_string(),
        }
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.jsonl");

        {
            let table = JsonlFileTable::open(&path).await.unwrap();
            assert_eq!(table.next_id(), 1);
            table.insert(record(1, "one")).await.unwrap();
            assert_eq!(table.next_id(), 2);
            table.insert(record(2, "two")).await.unwrap();
        }

        let table = JsonlFileTable::open(&path).await.unwrap();
        assert_eq!(table.count(&FileFilter::any()).await.unwrap(), 2);
        assert_eq!(
            table.find_first(&FileFilter::by_name("two")).await.unwrap(),
            Some(record(2, "two"))
        );
        assert_eq!(table.next_id(), 3);
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db").join("files.jsonl");

        let table = JsonlFileTable::open(&path).await.unwrap();
        table.insert(record(1, "x")).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains(r#""type":"application/octet-stream""#));
    }

    #[tokio::test]
    async fn corrupt_line_is_reported_with_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.jsonl");
        let good = serde_json::to_string(&record(1, "ok")).unwrap();
        std::fs::write(&path, format!("{good}\n\nnot json\n")).unwrap();

        let err = JsonlFileTable::open(&path).await.err().unwrap();
        match err {
            CdnError::CorruptRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn torn_final_line_is_dropped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.jsonl");

        {
            let table = JsonlFileTable::open(&path).await.unwrap();
            table.insert(record(1, "one")).await.unwrap();
        }
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        std::io::Write::write_all(&mut file, br#"{"id":2,"hash":"bb"#).unwrap();
        drop(file);

        let table = JsonlFileTable::open(&path).await.unwrap();
        assert_eq!(table.count(&FileFilter::any()).await.unwrap(), 1);
        assert_eq!(table.next_id(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        table.insert(record(2, "two")).await.unwrap();
        drop(table);

        let table = JsonlFileTable::open(&path).await.unwrap();
        assert_eq!(table.count(&FileFilter::any()).await.unwrap(), 2);
        assert_eq!(
            table.find_first(&FileFilter::by_name("two")).await.unwrap(),
            Some(record(2, "two"))
        );
    }

    #[tokio::test]
    async fn complete_but_unterminated_last_line_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.jsonl");
        let one = serde_json::to_string(&record(1, "one")).unwrap();
        let two = serde_json::to_string(&record(2, "two")).unwrap();
        std::fs::write(&path, format!("{one}\n{two}")).unwrap();

        let table = JsonlFileTable::open(&path).await.unwrap();
        assert_eq!(table.count(&FileFilter::any()).await.unwrap(), 2);

        table.insert(record(3, "three")).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn torn_line_in_the_middle_is_still_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.jsonl");
        let good = serde_json::to_string(&record(3, "ok")).unwrap();
        std::fs::write(&path, format!("{{\"id\":1,\"ha\n{good}\n")).unwrap();

        let err = JsonlFileTable::open(&path).await.err().unwrap();
        assert!(matches!(err, CdnError::CorruptRecord { line: 1, .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_keep_file_and_memory_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files.jsonl");
        let table = std::sync::Arc::new(JsonlFileTable::open(&path).await.unwrap());

        let mut tasks = Vec::new();
        for i in 1..=16u64 {
            let table = std::sync::Arc::clone(&table);
            tasks.push(tokio::spawn(async move {
                table.insert(record(i, "shared")).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let in_memory = table.find_first(&FileFilter::by_name("shared")).await.unwrap();
        drop(table);
        let reopened = JsonlFileTable::open(&path).await.unwrap();
        let on_disk = reopened.find_first(&FileFilter::by_name("shared")).await.unwrap();
        assert_eq!(in_memory, on_disk);
        assert_eq!(reopened.count(&FileFilter::any()).await.unwrap(), 16);
    }
}
