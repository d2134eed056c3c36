//! Filesystem layer for zipmirror
//!
//! Provides forward-slash relative paths, lazy recursive tree walking,
//! and the atomic replace-file commit used by the archive layer.

pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use error::{Error, Result};
pub use io::{ExclusiveLock, commit_replace, temp_sibling};
pub use path::RelPath;
pub use walk::{Candidate, TreeWalk, walk};
