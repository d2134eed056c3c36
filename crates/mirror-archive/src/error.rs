//! Error types for mirror-archive

use std::path::PathBuf;

/// Result type for mirror-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-archive operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The archive container could not be opened or parsed
    #[error("cannot open archive {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// An entry already exists and overwrite was not requested
    #[error("entry already exists: {name}")]
    EntryExists { name: String },

    /// The entry name collides with the reserved manifest entry
    #[error("entry name is reserved: {name}")]
    ReservedName { name: String },

    /// The source file for an entry could not be read
    #[error("cannot read source file {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rebuilt archive could not be committed over the original
    #[error("cannot commit archive {path}: {message}")]
    Commit { path: PathBuf, message: String },

    /// Underlying ZIP format error
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    /// Manifest serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
