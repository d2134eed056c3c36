//! Error types for mirror-core
//!
//! Only cycle-level failures surface as errors here. Per-file and
//! per-directory-entry failures are recovered locally inside the
//! synchronizer and reported through the [`crate::SyncReport`] and the
//! logging sink instead.

use std::path::PathBuf;

/// Result type for cycle-level operations
pub type Result<T> = std::result::Result<T, CycleError>;

/// Failures that abort a scan cycle
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// Configuration missing or invalid at cycle start; nothing was written
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// The archive container could not be opened or created; no patterns were processed
    #[error("cannot open archive {path}: {source}")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: mirror_archive::Error,
    },

    /// The archive rebuild could not be committed; the previous archive is intact
    #[error("cannot commit archive {path}: {source}")]
    ArchiveCommit {
        path: PathBuf,
        #[source]
        source: mirror_archive::Error,
    },
}

impl CycleError {
    /// Create a configuration error with the given message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
