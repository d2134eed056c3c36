//! Lazy recursive enumeration of regular files

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use walkdir::WalkDir;

use crate::RelPath;

/// A regular file discovered during a walk, eligible for pattern matching.
///
/// Ephemeral: produced and consumed within one scan cycle.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the walk root, forward-slash separated
    pub relative: RelPath,
    /// Last-modified time in unix seconds
    pub modified: i64,
}

impl Candidate {
    /// The bare file name, as matched against wildcard patterns.
    pub fn file_name(&self) -> &str {
        self.relative.file_name()
    }
}

/// Start a fresh walk over every regular file beneath `root`.
///
/// The walk is lazy and fail-soft: unreadable entries and files whose
/// paths cannot be expressed relative to the root are skipped with a
/// warning, never aborting the enumeration. Each call produces an
/// independent, restartable traversal.
pub fn walk(root: &Path) -> TreeWalk {
    TreeWalk {
        root: root.to_path_buf(),
        inner: WalkDir::new(root).into_iter(),
        skipped: 0,
    }
}

/// Iterator over [`Candidate`]s beneath a root directory.
///
/// Order is whatever the OS yields; no ordering is guaranteed. The
/// number of entries skipped due to errors is available through
/// [`TreeWalk::skipped`] once iteration finishes.
pub struct TreeWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    skipped: usize,
}

impl TreeWalk {
    /// Entries skipped so far because they could not be read or resolved.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn candidate(&self, entry: &walkdir::DirEntry) -> Option<Candidate> {
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "cannot stat file, skipping");
                return None;
            }
        };
        let modified = match metadata.modified() {
            Ok(t) => unix_seconds(t),
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "no modification time, skipping");
                return None;
            }
        };
        let relative = match RelPath::between(&self.root, entry.path()) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "cannot relativize path, skipping");
                return None;
            }
        };
        Some(Candidate {
            path: entry.path().to_path_buf(),
            relative,
            modified,
        })
    }
}

impl Iterator for TreeWalk {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            match self.inner.next()? {
                Err(err) => {
                    self.skipped += 1;
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                }
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    match self.candidate(&entry) {
                        Some(candidate) => return Some(candidate),
                        None => self.skipped += 1,
                    }
                }
            }
        }
    }
}

fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        // Pre-epoch mtimes are legal on some filesystems
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
