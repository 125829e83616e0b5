//! Crash-safe whole-file replacement.
//!
//! A write goes to a uniquely named temp file next to the target, is
//! fsynced, then renamed over the target. Readers therefore see either the
//! old or the new file, never a partial one. Writers from different
//! processes are serialized through an exclusive lock on a sibling `.lock`
//! file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use promptbook_core::PromptBookError;
use promptbook_core::error::Result;

/// Handle to a file that is only ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file.
    ///
    /// - `Ok(Some(content))`: file exists and has non-blank content
    /// - `Ok(None)`: file is missing or blank
    /// - `Err`: the file exists but could not be read
    pub fn read_to_string(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            PromptBookError::persistence_read(format!("Failed to read {:?}: {}", self.path, e))
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Replaces the file contents under an exclusive lock.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        write_atomic(&self.path, bytes)
    }
}

/// Writes `bytes` to `path` via temp file + fsync + rename, without locking.
///
/// Every call gets its own uniquely named temp file in the target directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |step: &str, e: std::io::Error| {
        PromptBookError::persistence_write(format!("Failed to {} {:?}: {}", step, path, e))
    };

    let parent = path
        .parent()
        .ok_or_else(|| PromptBookError::persistence_write(format!("{:?} has no parent", path)))?;
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| write_err("create parent of", e))?;
    }

    let mut tmp_file = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(parent)
        .map_err(|e| write_err("create temp for", e))?;
    tmp_file
        .write_all(bytes)
        .map_err(|e| write_err("write temp for", e))?;
    tmp_file
        .as_file()
        .sync_all()
        .map_err(|e| write_err("sync temp for", e))?;

    // On failure the returned handle is dropped, which removes the temp file.
    tmp_file
        .persist(path)
        .map_err(|e| write_err("replace", e.error))?;
    Ok(())
}

/// An exclusive lock on `name.lock` next to the guarded file.
///
/// The lock file is never removed: unlinking it while another process waits
/// on it would let a third process lock a fresh file with the same name.
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Blocks until an exclusive lock on `path.lock` is held.
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock_path = lock_path(path);

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive().map_err(|e| {
            PromptBookError::persistence_write(format!(
                "Failed to acquire lock {:?}: {}",
                lock_path, e
            ))
        })?;

        Ok(FileLock { _file: file })
    }
}

/// `dir/name.lock` for `dir/name.ext`.
pub fn lock_path(path: &Path) -> PathBuf {
    path.with_extension("lock")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_and_blank_files_read_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("data.json"));
        assert!(file.read_to_string().unwrap().is_none());

        fs::write(file.path(), "  \n").unwrap();
        assert!(file.read_to_string().unwrap().is_none());
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_replaces_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("nested").join("data.json"));

        file.write(b"first").unwrap();
        file.write(b"second").unwrap();

        assert_eq!(file.read_to_string().unwrap().as_deref(), Some("second"));
        // No temp files are left behind; the lock file stays.
        assert_eq!(
            entries(&temp_dir.path().join("nested")),
            vec!["data.json".to_string(), "data.lock".to_string()]
        );
    }

    #[test]
    fn test_write_into_unwritable_target_is_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in place of the target makes the rename fail.
        let target = temp_dir.path().join("data.json");
        fs::create_dir_all(target.join("occupied")).unwrap();

        let err = write_atomic(&target, b"x").unwrap_err();
        assert!(err.is_write_failure());
        assert_eq!(entries(temp_dir.path()), vec!["data.json".to_string()]);
    }

    #[test]
    fn test_lock_stays_exclusive_after_handover() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("data.json");

        let first = FileLock::acquire(&target).unwrap();
        let (acquired_tx, acquired_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let waiter_target = target.clone();
        let waiter = std::thread::spawn(move || {
            let second = FileLock::acquire(&waiter_target).unwrap();
            acquired_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(second);
        });

        drop(first);
        acquired_rx.recv().unwrap();

        // The second holder owns the same lock file a newcomer would open.
        assert!(lock_path(&target).exists());
        let newcomer = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path(&target))
            .unwrap();
        assert!(newcomer.try_lock_exclusive().is_err());

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        assert!(newcomer.try_lock_exclusive().is_ok());
    }

    #[test]
    fn test_concurrent_writers_never_publish_a_torn_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("data.json");
        let payloads: Vec<String> = (0..6)
            .map(|i| char::from(b'a' + i).to_string().repeat(64 * 1024))
            .collect();

        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let file = AtomicFile::new(target.clone());
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        file.write(payload.as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(&target).unwrap();
        assert!(payloads.contains(&content));
        assert_eq!(
            entries(temp_dir.path()),
            vec!["data.json".to_string(), "data.lock".to_string()]
        );
    }
}
