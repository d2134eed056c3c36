//! Forward-slash relative paths used as archive entry keys

use std::path::Path;

use crate::{Error, Result};

/// A path relative to a source root, normalized to forward slashes.
///
/// This is the archive entry key: UTF-8, forward-slash separated,
/// case-sensitive, no leading slash. It is produced by stripping the
/// walk root from an absolute path and is never resolved against the
/// filesystem itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath {
    inner: String,
}

impl RelPath {
    /// Compute the relative path of `path` beneath `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not live under `root` or if any
    /// component is not valid UTF-8.
    pub fn between(root: &Path, path: &Path) -> Result<Self> {
        let stripped = path.strip_prefix(root).map_err(|_| Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path is outside the walk root",
            ),
        })?;

        let as_str = stripped.to_str().ok_or_else(|| Error::NonUtf8Path {
            path: path.to_path_buf(),
        })?;

        let normalized = as_str.replace('\\', "/");
        Ok(Self {
            inner: normalized.trim_start_matches('/').to_string(),
        })
    }

    /// Get the normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the bare file name component (the part patterns match against).
    pub fn file_name(&self) -> &str {
        self.inner.rsplit('/').next().unwrap_or(&self.inner)
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for RelPath {
    fn from(s: &str) -> Self {
        Self {
            inner: s.replace('\\', "/").trim_start_matches('/').to_string(),
        }
    }
}
