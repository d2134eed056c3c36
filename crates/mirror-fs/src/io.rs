//! Atomic replace-file commit and session locking

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Build a temp-file path next to `path`, on the same filesystem.
///
/// Staying in the same directory keeps the final rename atomic.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

/// Atomically replace `dest` with the fully written file at `temp`.
///
/// Creates the destination's parent directory if needed. `temp` must
/// already be flushed to disk by the caller.
pub fn commit_replace(temp: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    fs::rename(temp, dest).map_err(|e| Error::io(dest, e))
}

/// An advisory exclusive lock held for the lifetime of a writer session.
///
/// Asserts the single-writer assumption; it does not guard against
/// processes that never take the lock. The lock file is left in place
/// after release: unlinking it would let a holder of the removed
/// inode and a locker of a freshly created file coexist.
pub struct ExclusiveLock {
    file: File,
}

impl ExclusiveLock {
    /// Acquire an exclusive lock on `path`, creating the file if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockFailed`] if another process holds the lock.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        file.try_lock_exclusive().map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

        Ok(Self { file })
    }
}

impl Drop for ExclusiveLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
