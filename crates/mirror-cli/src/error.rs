//! Error types for mirror-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Cycle-level error from mirror-core
    #[error(transparent)]
    Cycle(#[from] mirror_core::CycleError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON report serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
