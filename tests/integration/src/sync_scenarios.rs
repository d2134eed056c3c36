//! End-to-end scan-cycle scenarios against real directories and archives

use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use zip::ZipArchive;

use mirror_archive::ArchiveSession;
use mirror_core::{SyncConfig, SyncReport, Synchronizer};

struct Scenario {
    _temp: TempDir,
    source_root: PathBuf,
    archive_path: PathBuf,
}

impl Scenario {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let source_root = temp.path().join("source");
        fs::create_dir_all(&source_root).unwrap();
        let archive_path = temp.path().join("backup.zip");
        Self {
            _temp: temp,
            source_root,
            archive_path,
        }
    }

    fn config(&self, patterns: &[&str]) -> SyncConfig {
        SyncConfig {
            source_root: self.source_root.clone(),
            archive_path: self.archive_path.clone(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn write(&self, rel: &str, content: &str, mtime: u64) {
        let path = self.source_root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        let file = OpenOptions::new().append(true).open(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(mtime))
            .unwrap();
    }

    fn cycle(&self, patterns: &[&str]) -> SyncReport {
        Synchronizer::new(self.config(patterns))
            .synchronize()
            .unwrap()
    }

    fn stored_mtime(&self, name: &str) -> Option<i64> {
        ArchiveSession::open(&self.archive_path).unwrap().lookup(name)
    }

    fn data_entries(&self) -> Vec<String> {
        let session = ArchiveSession::open(&self.archive_path).unwrap();
        let mut names: Vec<String> = session.entries().map(|(n, _)| n.to_string()).collect();
        names.sort();
        names
    }

    fn entry_content(&self, name: &str) -> String {
        let mut archive = ZipArchive::new(File::open(&self.archive_path).unwrap()).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }
}

#[test]
fn full_scenario_add_then_update() {
    let scenario = Scenario::new();
    scenario.write("a/x.txt", "first", 100);
    scenario.write("a/y.log", "noise", 100);

    // First cycle: only the *.txt match lands in the archive
    let report = scenario.cycle(&["*.txt"]);
    assert_eq!(report.added, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(scenario.data_entries(), vec!["a/x.txt"]);
    assert_eq!(scenario.stored_mtime("a/x.txt"), Some(100));
    assert_eq!(scenario.entry_content("a/x.txt"), "first");

    // Modify the file: next cycle refreshes the entry in place
    scenario.write("a/x.txt", "second", 200);
    let report = scenario.cycle(&["*.txt"]);
    assert_eq!(report.updated, 1);
    assert_eq!(scenario.data_entries(), vec!["a/x.txt"]);
    assert_eq!(scenario.stored_mtime("a/x.txt"), Some(200));
    assert_eq!(scenario.entry_content("a/x.txt"), "second");
}

#[test]
fn repeated_cycles_do_not_rewrite_archive() {
    let scenario = Scenario::new();
    scenario.write("one.txt", "1", 100);
    scenario.write("sub/two.txt", "2", 100);

    scenario.cycle(&["*.txt"]);
    let bytes = fs::read(&scenario.archive_path).unwrap();

    for _ in 0..3 {
        let report = scenario.cycle(&["*.txt"]);
        assert_eq!(report.writes(), 0);
        assert_eq!(report.skipped, 2);
    }
    assert_eq!(fs::read(&scenario.archive_path).unwrap(), bytes);
}

#[test]
fn deleted_files_remain_archived() {
    let scenario = Scenario::new();
    scenario.write("keep.txt", "keep", 100);
    scenario.write("gone.txt", "gone", 100);
    scenario.cycle(&["*.txt"]);

    fs::remove_file(scenario.source_root.join("gone.txt")).unwrap();
    scenario.write("keep.txt", "keep v2", 150);
    scenario.cycle(&["*.txt"]);

    assert_eq!(scenario.data_entries(), vec!["gone.txt", "keep.txt"]);
    assert_eq!(scenario.entry_content("gone.txt"), "gone");
    assert_eq!(scenario.entry_content("keep.txt"), "keep v2");
}

#[test]
fn overlapping_patterns_reconcile_cleanly() {
    let scenario = Scenario::new();
    scenario.write("report.txt", "r", 100);

    let report = scenario.cycle(&["*.txt", "report.*", "*"]);
    assert!(report.is_clean());
    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(scenario.data_entries(), vec!["report.txt"]);
}

#[test]
fn later_pattern_sees_earlier_writes() {
    let scenario = Scenario::new();
    scenario.write("x.txt", "x", 100);
    scenario.write("y.log", "y", 100);

    // The second pattern adds y.log; the third revisits both as skips
    let report = scenario.cycle(&["*.txt", "*.log", "*"]);
    assert_eq!(report.added, 2);
    assert_eq!(report.skipped, 2);
}

#[test]
fn foreign_archive_without_manifest_still_increments() {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let scenario = Scenario::new();

    // Archive produced by an external zip tool, DOS timestamps only
    {
        let file = File::create(&scenario.archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().last_modified_time(
            zip::DateTime::from_date_and_time(2030, 1, 1, 0, 0, 0).unwrap(),
        );
        writer.start_file("x.txt", options).unwrap();
        writer.write_all(b"foreign").unwrap();
        writer.finish().unwrap();
    }

    // Source file is far older than the stored DOS time: skip
    scenario.write("x.txt", "local", 100);
    let report = scenario.cycle(&["*.txt"]);
    assert_eq!(report.writes(), 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(scenario.entry_content("x.txt"), "foreign");
}

#[cfg(unix)]
#[test]
fn unreadable_subtree_does_not_abort_cycle() {
    use std::os::unix::fs::PermissionsExt;

    let scenario = Scenario::new();
    scenario.write("ok.txt", "ok", 100);
    scenario.write("locked/secret.txt", "secret", 100);

    let locked = scenario.source_root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        // Permission bits do not apply to this user (root)
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = scenario.cycle(&["*.txt"]);

    // Restore so TempDir can clean up
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.added, 1);
    assert!(report.walk_skipped > 0);
    assert_eq!(scenario.data_entries(), vec!["ok.txt"]);
}

#[test]
fn config_file_drives_the_cycle() {
    let scenario = Scenario::new();
    scenario.write("x.txt", "x", 100);
    scenario.write("y.log", "y", 100);

    let config_path = scenario.source_root.parent().unwrap().join("mirror.conf");
    fs::write(
        &config_path,
        format!(
            "{}\n{}\n*.txt\n\n",
            scenario.source_root.display(),
            scenario.archive_path.display()
        ),
    )
    .unwrap();

    let config = SyncConfig::load(&config_path).unwrap();
    let report = Synchronizer::new(config).synchronize().unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(scenario.data_entries(), vec!["x.txt"]);
}

#[test]
fn manifest_entry_is_not_a_data_entry() {
    let scenario = Scenario::new();
    scenario.write("x.txt", "x", 100);
    scenario.cycle(&["*.txt"]);

    // The raw zip holds the data entry plus the reserved manifest
    let archive = ZipArchive::new(File::open(&scenario.archive_path).unwrap()).unwrap();
    let mut raw_names: Vec<&str> = archive.file_names().collect();
    raw_names.sort();
    assert_eq!(raw_names, vec![mirror_archive::MANIFEST_ENTRY, "x.txt"]);

    // The session index hides it
    assert_eq!(scenario.data_entries(), vec!["x.txt"]);
}
