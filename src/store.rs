//! Flat-file metadata store.
//!
//! The catalog is an in-memory `Vec<FileRecord>` (newest first) mirrored to a
//! pretty-printed JSON array on disk, next to the upload directory holding the
//! file bytes. Every mutation runs under one write lock, and so do the uploaded
//! file's write or removal and the index save. A record and the bytes it
//! describes therefore always change together. Saves go to a sibling temp file
//! that is then renamed over the index.
//!
//! Index save failures never surface to HTTP callers: mutations log them and
//! keep the in-memory state, which stays authoritative until the next
//! successful save.

use crate::types::FileRecord;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-backed catalog of upload records
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    upload_dir: PathBuf,
    records: RwLock<Vec<FileRecord>>,
}

impl CatalogStore {
    /// Load the index at `path`; uploaded bytes live in `upload_dir`.
    ///
    /// A missing file yields an empty catalog. An unreadable or corrupt file
    /// is logged and also yields an empty catalog.
    pub fn load(path: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match read_records(&path) {
            Ok(records) => {
                tracing::info!(path = %path.display(), count = records.len(), "Loaded file index");
                records
            }
            Err(StoreError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No file index yet, starting empty");
                Vec::new()
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "Failed to load file index, starting empty");
                Vec::new()
            }
        };

        Self {
            path,
            upload_dir: upload_dir.into(),
            records: RwLock::new(records),
        }
    }

    /// Path of the JSON index
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the bytes for `filename` are stored
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }

    /// Snapshot of all records, newest first
    pub async fn list(&self) -> Vec<FileRecord> {
        self.records.read().await.clone()
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Prepend a record and persist
    pub async fn append(&self, record: FileRecord) {
        let mut records = self.records.write().await;
        records.insert(0, record);
        self.persist_logged(&records).await;
    }

    /// Store `data` as the bytes of `record.filename`, then replace every
    /// record sharing that filename with `record`, placed at the head, and
    /// persist. Returns how many records were replaced.
    ///
    /// A failed file write leaves the catalog untouched.
    pub async fn upsert(&self, record: FileRecord, data: &[u8]) -> StoreResult<usize> {
        let mut records = self.records.write().await;

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| StoreError::io(&self.upload_dir, e))?;
        let file_path = self.upload_path(&record.filename);
        tokio::fs::write(&file_path, data)
            .await
            .map_err(|e| StoreError::io(&file_path, e))?;

        let before = records.len();
        records.retain(|existing| existing.filename != record.filename);
        let replaced = before - records.len();
        records.insert(0, record);
        self.persist_logged(&records).await;
        Ok(replaced)
    }

    /// Remove the stored bytes for `filename` (best effort) and the first
    /// record with that filename, then persist.
    ///
    /// The index is not rewritten when no record matches.
    pub async fn remove_by_filename(&self, filename: &str) -> Option<FileRecord> {
        let mut records = self.records.write().await;

        let file_path = self.upload_path(filename);
        if let Err(err) = tokio::fs::remove_file(&file_path).await {
            tracing::warn!(filename = %filename, error = %err, "Error deleting file");
        }

        let position = records.iter().position(|r| r.filename == filename)?;
        let removed = records.remove(position);
        self.persist_logged(&records).await;
        Some(removed)
    }

    /// Write `records` to the index file
    async fn save(&self, records: &[FileRecord]) -> StoreResult<()> {
        write_records(&self.path, records).await
    }

    async fn persist_logged(&self, records: &[FileRecord]) {
        if let Err(err) = self.save(records).await {
            tracing::error!(path = %self.path.display(), error = %err, "Failed to save file index");
        }
    }
}

fn read_records(path: &Path) -> StoreResult<Vec<FileRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

async fn write_records(path: &Path, records: &[FileRecord]) -> StoreResult<()> {
    let data = serde_json::to_vec_pretty(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &data)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UploadMetadata;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(filename: &str) -> FileRecord {
        FileRecord::new(
            filename,
            UploadMetadata::default().with_defaults(filename),
            filename.len() as u64,
        )
    }

    fn open(dir: &TempDir) -> CatalogStore {
        CatalogStore::load(dir.path().join("files.json"), dir.path().join("uploads"))
    }

    #[tokio::test]
    async fn test_missing_index_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_index_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("files.json"), "{ not json").unwrap();

        let store = open(&dir);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_append_is_newest_first_and_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db").join("files.json");
        let store = CatalogStore::load(&path, dir.path().join("uploads"));

        store.append(record("a.html")).await;
        store.append(record("b.html")).await;

        let names: Vec<_> = store.list().await.into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["b.html", "a.html"]);

        let reloaded = CatalogStore::load(&path, dir.path().join("uploads"));
        assert_eq!(reloaded.list().await, store.list().await);
        assert!(!tmp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_remove_first_match_only() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        let older = record("dup.html");
        let newer = record("dup.html");
        store.append(older.clone()).await;
        store.append(newer.clone()).await;

        let removed = store.remove_by_filename("dup.html").await.unwrap();
        assert_eq!(removed.id, newer.id);
        assert_eq!(store.list().await, vec![older]);
    }

    #[tokio::test]
    async fn test_remove_unknown_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("files.json");
        let store = open(&dir);
        store.append(record("a.html")).await;
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(store.remove_by_filename("missing.html").await.is_none());
        assert_eq!(store.len().await, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_bytes() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        store.upsert(record("a.html"), b"bytes").await.unwrap();
        assert!(store.upload_path("a.html").exists());

        store.remove_by_filename("a.html").await.unwrap();
        assert!(!store.upload_path("a.html").exists());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_filename() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        store.upsert(record("a.html"), b"old").await.unwrap();
        store.upsert(record("b.html"), b"b").await.unwrap();

        let fresh = record("a.html");
        assert_eq!(store.upsert(fresh.clone(), b"new").await.unwrap(), 1);

        let list = store.list().await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, fresh.id);
        assert_eq!(list[1].filename, "b.html");
        assert_eq!(std::fs::read(store.upload_path("a.html")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_upsert_write_failure_leaves_catalog_untouched() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        // A directory where the file should go makes the write fail.
        std::fs::create_dir_all(store.upload_path("blocked.html")).unwrap();

        let err = store.upsert(record("blocked.html"), b"x").await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(store.len().await, 0);
        assert!(!dir.path().join("files.json").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_keep_record_and_bytes_in_step() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open(&dir));

        let mut handles = Vec::new();
        for i in 1..=8usize {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let data = vec![b'x'; i * 10_000];
                let record = FileRecord::new(
                    "same.html",
                    UploadMetadata::default().with_defaults("same.html"),
                    data.len() as u64,
                );
                store.upsert(record, &data).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let list = store.list().await;
        assert_eq!(list.len(), 1);
        let on_disk = std::fs::metadata(store.upload_path("same.html")).unwrap().len();
        assert_eq!(list[0].file_size, on_disk);
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("files.json");
        let store = open(&dir);
        store.save(&[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        store.append(record("a.html")).await;
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        // The index path is a directory, so the rename fails.
        std::fs::create_dir(dir.path().join("files.json")).unwrap();
        let store = open(&dir);

        store.append(record("a.html")).await;
        assert_eq!(store.len().await, 1);
        assert!(store.save(&store.list().await).await.is_err());
    }
}
