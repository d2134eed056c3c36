//! Archive session: the per-cycle read/write view of one ZIP container

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use mirror_fs::{ExclusiveLock, RelPath, commit_replace, temp_sibling};

use crate::manifest::{MANIFEST_ENTRY, Manifest};
use crate::{Error, Result};

/// An entry waiting to be written at commit time.
///
/// Only the source path is staged; content is streamed into the
/// archive during commit, so a cycle touching many large files stays
/// bounded in memory.
#[derive(Debug)]
struct StagedEntry {
    source: PathBuf,
    modified: i64,
}

/// One open archive container, held for the duration of a scan cycle.
///
/// The session is the archive index and writer in one: `lookup` is
/// read-after-write consistent with `add_or_replace` within the same
/// session, and `close` commits every staged write in a single atomic
/// rename. Dropping a session without `close` discards staged writes
/// and leaves the archive exactly as it was.
pub struct ArchiveSession {
    path: PathBuf,
    exists: bool,
    index: BTreeMap<String, i64>,
    staged: BTreeMap<String, StagedEntry>,
    _lock: ExclusiveLock,
}

impl ArchiveSession {
    /// Open the archive at `path`, or start an empty session if no
    /// container exists there yet.
    ///
    /// The container file itself is only created by `close`, and only
    /// when at least one write was staged.
    pub fn open(path: &Path) -> Result<Self> {
        let lock = ExclusiveLock::acquire(&lock_path(path))?;

        let exists = path.exists();
        let index = if exists { read_index(path)? } else { BTreeMap::new() };

        tracing::debug!(
            path = %path.display(),
            entries = index.len(),
            created = !exists,
            "archive session opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            exists,
            index,
            staged: BTreeMap::new(),
            _lock: lock,
        })
    }

    /// Stored mtime of an entry, in unix seconds.
    ///
    /// Reflects writes staged earlier in this session.
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.index.get(name).copied()
    }

    /// Iterate over the current entry index (name, stored mtime).
    pub fn entries(&self) -> impl Iterator<Item = (&str, i64)> {
        self.index.iter().map(|(name, mtime)| (name.as_str(), *mtime))
    }

    /// Number of writes staged so far in this session.
    pub fn staged_writes(&self) -> usize {
        self.staged.len()
    }

    /// Stage an add or overwrite of `name` with the content of `source`.
    ///
    /// The source file is opened immediately, so a missing or
    /// unreadable file surfaces here rather than at commit time; its
    /// content is streamed at commit (best-effort snapshot). With
    /// `overwrite == false` an existing entry is an error and nothing
    /// is staged. The reserved manifest name is never a data entry.
    pub fn add_or_replace(
        &mut self,
        name: &RelPath,
        source: &Path,
        modified: i64,
        overwrite: bool,
    ) -> Result<()> {
        let key = name.as_str().to_string();

        if key == MANIFEST_ENTRY {
            return Err(Error::ReservedName { name: key });
        }
        if !overwrite && self.index.contains_key(&key) {
            return Err(Error::EntryExists { name: key });
        }

        // Readability check now; the handle is not kept.
        File::open(source).map_err(|e| Error::ReadSource {
            path: source.to_path_buf(),
            source: e,
        })?;

        self.index.insert(key.clone(), modified);
        self.staged.insert(
            key,
            StagedEntry {
                source: source.to_path_buf(),
                modified,
            },
        );
        Ok(())
    }

    /// Flush and close the session.
    ///
    /// With no staged writes this is a no-op and the archive file is
    /// left byte-identical. Otherwise the new container is built in a
    /// sibling temp file (surviving entries raw-copied from the old
    /// container, staged entries appended, manifest rewritten) and
    /// renamed over the original.
    pub fn close(self) -> Result<()> {
        if self.staged.is_empty() {
            tracing::debug!(path = %self.path.display(), "no staged writes, archive untouched");
            return Ok(());
        }

        let temp = temp_sibling(&self.path);
        let result = self.rebuild(&temp);
        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result
    }

    fn rebuild(&self, temp: &Path) -> Result<()> {
        let out = File::create(temp).map_err(|e| Error::Commit {
            path: temp.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut writer = ZipWriter::new(out);
        let mut written: BTreeMap<String, i64> = BTreeMap::new();

        // Entries not touched this cycle survive via raw copy, never
        // recompressed.
        if self.exists {
            let mut old = open_archive(&self.path)?;
            for i in 0..old.len() {
                let entry = old.by_index_raw(i)?;
                let name = entry.name().to_string();
                if name == MANIFEST_ENTRY || self.staged.contains_key(&name) {
                    continue;
                }
                let mtime = self.index.get(&name).copied().unwrap_or(0);
                writer.raw_copy_file(entry)?;
                written.insert(name, mtime);
            }
        }

        for (name, staged) in &self.staged {
            // The source may have vanished or turned unreadable since
            // it was staged; drop that entry and keep the commit going.
            let mut src = match File::open(&staged.source) {
                Ok(f) => f,
                Err(e) => {
                    tracing::error!(
                        entry = %name,
                        path = %staged.source.display(),
                        error = %e,
                        "staged source unreadable at commit, entry dropped"
                    );
                    continue;
                }
            };
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(dos_datetime(staged.modified));
            writer.start_file(name.as_str(), options)?;
            if let Err(e) = io::copy(&mut src, &mut writer) {
                writer.abort_file()?;
                tracing::error!(entry = %name, error = %e, "read failed mid-entry, entry dropped");
                continue;
            }
            written.insert(name.clone(), staged.modified);
        }

        let manifest = Manifest { entries: written };
        writer.start_file(
            MANIFEST_ENTRY,
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        )?;
        writer.write_all(&manifest.to_vec()?)?;

        let out = writer.finish()?;
        out.sync_all().map_err(|e| Error::Commit {
            path: temp.to_path_buf(),
            message: e.to_string(),
        })?;

        commit_replace(temp, &self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            written = self.staged.len(),
            "archive committed"
        );
        Ok(())
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| Error::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    ZipArchive::new(file).map_err(|e| Error::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_index(path: &Path) -> Result<BTreeMap<String, i64>> {
    let mut archive = open_archive(path)?;

    // A corrupt or missing manifest falls back to DOS timestamps; the
    // archive may have been produced or touched by an external tool.
    let manifest = match archive.by_name(MANIFEST_ENTRY) {
        Ok(entry) => Manifest::from_reader(entry).unwrap_or_default(),
        Err(_) => Manifest::default(),
    };

    let mut index = BTreeMap::new();
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if name == MANIFEST_ENTRY {
            continue;
        }
        let mtime = manifest
            .entries
            .get(&name)
            .copied()
            .unwrap_or_else(|| entry.last_modified().map(dos_to_unix).unwrap_or(0));
        index.insert(name, mtime);
    }
    Ok(index)
}

/// Nearest DOS timestamp for an entry, best effort for external tools.
/// Out-of-range times collapse to the DOS epoch (1980-01-01).
fn dos_datetime(unix: i64) -> zip::DateTime {
    let Some(dt) = chrono::DateTime::from_timestamp(unix, 0) else {
        return zip::DateTime::default();
    };
    let naive = dt.naive_utc();
    if naive.year() < 1980 || naive.year() > 2107 {
        return zip::DateTime::default();
    }
    zip::DateTime::from_date_and_time(
        naive.year() as u16,
        naive.month() as u8,
        naive.day() as u8,
        naive.hour() as u8,
        naive.minute() as u8,
        naive.second() as u8,
    )
    .unwrap_or_default()
}

fn dos_to_unix(dt: zip::DateTime) -> i64 {
    chrono::NaiveDate::from_ymd_opt(dt.year() as i32, dt.month() as u32, dt.day() as u32)
        .and_then(|d| d.and_hms_opt(dt.hour() as u32, dt.minute() as u32, dt.second() as u32))
        .map(|ndt| ndt.and_utc().timestamp())
        .unwrap_or(0)
}
