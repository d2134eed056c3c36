//! The scan-cycle synchronizer
//!
//! One [`Synchronizer::synchronize`] call is one scan cycle: per
//! pattern a fresh tree walk, per matching candidate an add/update/skip
//! decision against the archive's stored mtime, one atomic commit at
//! the end. Per-file failures never abort the cycle; they are counted,
//! logged, and retried naturally on the next cycle.

use serde::{Deserialize, Serialize};

use mirror_archive::ArchiveSession;
use mirror_fs::{Candidate, walk};

use crate::pattern;
use crate::{CycleError, Result, SyncConfig};

/// Outcome of one scan cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Entries newly created in the archive
    pub added: usize,
    /// Entries overwritten because the source file was newer
    pub updated: usize,
    /// Candidates left untouched (stored mtime >= source mtime)
    pub skipped: usize,
    /// Per-file failures, each with the entry's relative path
    pub errors: Vec<String>,
    /// Directory entries the walker could not read, summed over the
    /// per-pattern walks: one unreadable entry counts once per pattern
    pub walk_skipped: usize,
}

impl SyncReport {
    /// Whether every matched candidate was reconciled without error
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total writes issued to the archive this cycle
    pub fn writes(&self) -> usize {
        self.added + self.updated
    }
}

/// Drives one scan cycle against an immutable [`SyncConfig`]
pub struct Synchronizer {
    config: SyncConfig,
}

impl Synchronizer {
    /// Create a synchronizer for one cycle's configuration
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Run one scan cycle.
    ///
    /// Patterns are processed strictly in config order, each against
    /// its own full walk of the source tree. A file matching several
    /// patterns is reconciled once per match; revisits settle on skip
    /// because the first visit already refreshed the stored mtime.
    ///
    /// # Errors
    ///
    /// Only cycle-level failures: invalid config, archive open
    /// failure, or commit failure. Everything below that is recorded
    /// in the report.
    pub fn synchronize(&self) -> Result<SyncReport> {
        self.config.validate()?;
        let root = self.config.canonical_root()?;

        let mut session =
            ArchiveSession::open(&self.config.archive_path).map_err(|e| CycleError::ArchiveOpen {
                path: self.config.archive_path.clone(),
                source: e,
            })?;

        let mut report = SyncReport::default();

        for pat in &self.config.patterns {
            tracing::debug!(pattern = %pat, root = %root.display(), "scanning");
            let mut files = walk(&root);
            for candidate in &mut files {
                if !pattern::matches(candidate.file_name(), pat) {
                    continue;
                }
                reconcile(&mut session, &candidate, &mut report);
            }
            report.walk_skipped += files.skipped();
        }

        session.close().map_err(|e| CycleError::ArchiveCommit {
            path: self.config.archive_path.clone(),
            source: e,
        })?;

        tracing::info!(
            added = report.added,
            updated = report.updated,
            skipped = report.skipped,
            errors = report.errors.len(),
            "scan cycle finished"
        );
        Ok(report)
    }
}

/// The add/update/skip decision for one candidate.
///
/// The mtime comparison is by value on unix seconds; stored >= source
/// means skip, so content never regresses and unchanged files cost no
/// write.
fn reconcile(session: &mut ArchiveSession, candidate: &Candidate, report: &mut SyncReport) {
    match session.lookup(candidate.relative.as_str()) {
        None => {
            match session.add_or_replace(&candidate.relative, &candidate.path, candidate.modified, false)
            {
                Ok(()) => {
                    tracing::info!(path = %candidate.relative, "added");
                    report.added += 1;
                }
                Err(e) => {
                    tracing::error!(path = %candidate.relative, error = %e, "add failed");
                    report.errors.push(format!("add {}: {}", candidate.relative, e));
                }
            }
        }
        Some(stored) if stored < candidate.modified => {
            match session.add_or_replace(&candidate.relative, &candidate.path, candidate.modified, true)
            {
                Ok(()) => {
                    tracing::info!(path = %candidate.relative, "updated");
                    report.updated += 1;
                }
                Err(e) => {
                    tracing::error!(path = %candidate.relative, error = %e, "update failed");
                    report
                        .errors
                        .push(format!("update {}: {}", candidate.relative, e));
                }
            }
        }
        Some(_) => {
            tracing::debug!(path = %candidate.relative, "unchanged");
            report.skipped += 1;
        }
    }
}
