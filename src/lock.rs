// SPDX-License-Identifier: MPL-2.0

//! Advisory lock files marking an in-progress segment
//!
//! The lock is an empty sentinel file next to the segment being written. Its
//! presence tells external tooling (upload, sync, cleanup) that the segment
//! is incomplete. Nothing enforces exclusivity at the OS level; contention
//! handling is the consumer's responsibility.

use std::fs::OpenOptions;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Permission bits for newly created lock files
pub const LOCK_FILE_MODE: u32 = 0o664;

/// Sentinel file owned for the duration of one segment.
///
/// Dropping an unreleased lock removes the file, so error paths cannot leave
/// a stale sentinel behind.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    released: bool,
}

impl LockFile {
    /// Create the sentinel file at `path`.
    pub fn acquire(path: impl Into<PathBuf>) -> io::Result<LockFile> {
        let path = path.into();
        OpenOptions::new()
            .write(true)
            .create(true)
            .mode(LOCK_FILE_MODE)
            .open(&path)?;
        debug!(path = %path.display(), "acquired segment lock");
        Ok(LockFile {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the sentinel. Deleting an already-absent file is not an error.
    pub fn release(mut self) -> io::Result<()> {
        self.remove()
    }

    fn remove(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "released segment lock");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.remove() {
                warn!(path = %self.path.display(), error = %e, "failed to remove lock file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_and_release_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcamera.mkv.lock");

        let lock = LockFile::acquire(&path).unwrap();
        assert!(path.exists());

        lock.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_release_of_absent_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.lock");

        let lock = LockFile::acquire(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(lock.release().is_ok());
    }

    #[test]
    fn test_drop_removes_unreleased_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.lock");

        {
            let _lock = LockFile::acquire(&path).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_acquire_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("x.lock");
        assert!(LockFile::acquire(&path).is_err());
    }

    #[test]
    fn test_lock_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mode.lock");
        let _lock = LockFile::acquire(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        // umask may clear group-write; owner read/write must survive
        assert_eq!(mode & 0o600, 0o600);
    }
}
