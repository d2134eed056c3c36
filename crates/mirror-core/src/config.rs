//! Scan-cycle configuration
//!
//! The config file is a plain text resource: line 1 is the source
//! directory, line 2 the archive file path, every further line one
//! wildcard pattern in order. Blank pattern lines are skipped. The
//! config is reloaded before every cycle and handed to the
//! [`crate::Synchronizer`] as an immutable value — no process globals.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CycleError, Result};

/// Configuration for one scan cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root of the source tree being mirrored
    pub source_root: PathBuf,
    /// Path of the archive container (created on first write)
    pub archive_path: PathBuf,
    /// Wildcard patterns, applied in order
    pub patterns: Vec<String>,
}

impl SyncConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::Config`] if the file is missing or
    /// malformed, if the source root is not an existing directory, or
    /// if the archive path points into a nonexistent directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CycleError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from the plain-text format.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().map(|l| l.trim_end_matches('\r'));

        let source_root = lines
            .next()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| CycleError::config("missing source directory on line 1"))?;
        let archive_path = lines
            .next()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| CycleError::config("missing archive path on line 2"))?;

        let patterns: Vec<String> = lines
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();

        let config = Self {
            source_root: PathBuf::from(source_root.trim()),
            archive_path: PathBuf::from(archive_path.trim()),
            patterns,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the paths this config names. Called at cycle start so
    /// a directory that vanished between cycles fails that cycle only.
    pub fn validate(&self) -> Result<()> {
        if !self.source_root.is_dir() {
            return Err(CycleError::config(format!(
                "source directory does not exist: {}",
                self.source_root.display()
            )));
        }
        if let Some(parent) = self.archive_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            return Err(CycleError::config(format!(
                "archive directory does not exist: {}",
                parent.display()
            )));
        }
        Ok(())
    }

    /// The source root resolved to a canonical absolute path, so
    /// relative entry keys come out stable regardless of how the
    /// config spelled the root.
    pub fn canonical_root(&self) -> Result<PathBuf> {
        dunce::canonicalize(&self.source_root).map_err(|e| {
            CycleError::config(format!(
                "cannot resolve source directory {}: {}",
                self.source_root.display(),
                e
            ))
        })
    }
}
