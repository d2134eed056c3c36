//! Per-entry modification times stored inside the archive
//!
//! ZIP's native per-entry timestamp is MS-DOS time with 2-second
//! resolution, which is too coarse for the stored-mtime comparison
//! that drives incrementality. The manifest is a reserved JSON entry
//! holding each data entry's mtime at full 1-second resolution; the
//! DOS timestamp on the entries themselves is kept as a best-effort
//! value for external unzip tools.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Reserved entry name for the mtime manifest. Never a data entry.
pub const MANIFEST_ENTRY: &str = ".zipmirror/manifest.json";

/// Map of entry name → last-modified time in unix seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: BTreeMap<String, i64>,
}

impl Manifest {
    /// Parse a manifest from its archive entry.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize the manifest for writing back into the archive.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
