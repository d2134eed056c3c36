//! ZIP archive container for zipmirror
//!
//! One [`ArchiveSession`] is opened per scan cycle. It exposes the
//! entry index (relative path → stored mtime), stages add/overwrite
//! writes in memory, and commits them atomically on close by building
//! the new archive in a sibling temp file and renaming it over the
//! original. A cycle that stages nothing leaves the archive untouched.

pub mod error;
pub mod manifest;
pub mod session;

pub use error::{Error, Result};
pub use manifest::{MANIFEST_ENTRY, Manifest};
pub use session::ArchiveSession;
