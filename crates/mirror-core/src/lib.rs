//! Incremental archive synchronization engine
//!
//! This crate implements the core of zipmirror: reconciling files
//! selected by wildcard patterns from a source tree against a ZIP
//! archive, writing only what is new or changed.
//!
//! # Architecture
//!
//! `mirror-core` sits above the filesystem and archive layers and
//! below the CLI:
//!
//! ```text
//!            CLI (zipmirror)
//!                  |
//!             mirror-core
//!                  |
//!         +--------+--------+
//!         |                 |
//!     mirror-fs      mirror-archive
//! ```
//!
//! One scan cycle is one [`Synchronizer::synchronize`] call: per
//! configured pattern, a fresh walk of the source tree; per matching
//! candidate, an add/update/skip decision against the archive's stored
//! mtimes; one atomic archive commit at the end. Entries are never
//! removed — files deleted from the source stay archived.

pub mod config;
pub mod error;
pub mod pattern;
pub mod sync;

pub use config::SyncConfig;
pub use error::{CycleError, Result};
pub use sync::{SyncReport, Synchronizer};
