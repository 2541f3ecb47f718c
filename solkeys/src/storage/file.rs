//! JSON file store with atomic replacement
//!
//! The whole store is one JSON document carrying a revision number. Every
//! batch takes an exclusive lock, checks the revision it last saw, writes a temp
//! file next to the target and renames it into place. A writer that lost the
//! race gets a persistence error and nothing is written.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{KeyValueStore, StoreOp};
use crate::error::{Error, Result};

#[derive(Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    revision: u64,
    entries: BTreeMap<String, String>,
}

/// Exclusive advisory lock on `<store>.lock`
///
/// The lock file itself stays on disk. The operating system drops the lock
/// when the handle is closed, including when the owning process dies.
struct StoreLock {
    _file: File,
}

impl StoreLock {
    fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                Error::Persistence(format!("failed to open lock file {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { _file: file }),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(Error::Persistence(format!(
                "store {} is busy; another writer holds the lock",
                path.display()
            ))),
            Err(e) => Err(Error::Persistence(format!(
                "failed to lock {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// A store persisted as a single JSON file
pub struct FileStore {
    path: PathBuf,
    snapshot: StoreDocument,
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("revision", &self.snapshot.revision)
            .field("keys", &self.snapshot.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A missing file is an empty store; it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Persistence(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let snapshot = read_document(&path)?;
        debug!(path = %path.display(), revision = snapshot.revision, "Opened file store");
        Ok(Self { path, snapshot })
    }

    /// Revision of the snapshot this handle is working from
    pub fn revision(&self) -> u64 {
        self.snapshot.revision
    }

    /// Re-read the file, picking up writes from other handles
    pub fn reload(&mut self) -> Result<()> {
        self.snapshot = read_document(&self.path)?;
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.snapshot.entries.get(key).cloned())
    }

    fn apply(&mut self, batch: Vec<StoreOp>) -> Result<()> {
        let _lock = StoreLock::acquire(&self.lock_path())?;

        let mut document = read_document(&self.path)?;
        if document.revision != self.snapshot.revision {
            warn!(
                path = %self.path.display(),
                expected = self.snapshot.revision,
                found = document.revision,
                "Store was modified by another writer"
            );
            return Err(Error::Persistence(format!(
                "store {} was modified by another writer (expected revision {}, found {})",
                self.path.display(),
                self.snapshot.revision,
                document.revision
            )));
        }

        let keys: Vec<String> = batch.iter().map(|op| op.key().to_string()).collect();
        for op in batch {
            match op {
                StoreOp::Put(key, value) => {
                    document.entries.insert(key, value);
                }
                StoreOp::Delete(key) => {
                    document.entries.remove(&key);
                }
            }
        }
        document.revision += 1;

        write_document(&self.path, &document)?;
        debug!(path = %self.path.display(), revision = document.revision, ?keys, "Applied store batch");

        self.snapshot = document;
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<StoreDocument> {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
            Error::Persistence(format!("corrupt store {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoreDocument::default()),
        Err(e) => Err(Error::Persistence(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn write_document(path: &Path, document: &StoreDocument) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_err = |e: io::Error| Error::Persistence(format!("failed to write {}: {}", path.display(), e));

    // NamedTempFile is created owner-only on unix
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    let json = serde_json::to_vec_pretty(document)?;
    tmp.write_all(&json).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested").join("wallet.json")).unwrap();

        assert_eq!(store.get("wallets").unwrap(), None);
        assert_eq!(store.revision(), 0);
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let mut store = FileStore::open(&path).unwrap();
        store
            .apply(vec![StoreOp::put("a", "1"), StoreOp::put("b", "2")])
            .unwrap();
        store.apply(vec![StoreOp::delete("b")]).unwrap();
        assert_eq!(store.revision(), 2);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap(), None);
        assert_eq!(reopened.revision(), 2);
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();

        first.apply(vec![StoreOp::put("k", "first")]).unwrap();
        let result = second.apply(vec![StoreOp::put("k", "second")]);
        assert!(matches!(result, Err(Error::Persistence(_))));

        let check = FileStore::open(&path).unwrap();
        assert_eq!(check.get("k").unwrap().as_deref(), Some("first"));

        second.reload().unwrap();
        second.apply(vec![StoreOp::put("k", "second")]).unwrap();
        assert_eq!(second.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_held_lock_blocks_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("wallet.json")).unwrap();

        let held = StoreLock::acquire(&store.lock_path()).unwrap();
        assert!(matches!(
            store.apply(vec![StoreOp::put("k", "v")]),
            Err(Error::Persistence(_))
        ));
        assert_eq!(store.revision(), 0);

        drop(held);
        store.apply(vec![StoreOp::put("k", "v")]).unwrap();
    }

    #[test]
    fn test_leftover_lock_file_does_not_block_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        let mut store = FileStore::open(&path).unwrap();

        // a writer that died mid-batch leaves the file but no lock
        fs::write(store.lock_path(), b"").unwrap();

        store.apply(vec![StoreOp::put("k", "v")]).unwrap();
        assert_eq!(store.revision(), 1);
        assert!(store.lock_path().exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(Error::Persistence(_))));
    }
}
