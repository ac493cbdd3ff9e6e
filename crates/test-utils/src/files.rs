//! Filesystem fixtures with explicit modification times.
//!
//! Polling compares mtimes, so tests never rely on the clock advancing
//! between two writes: every helper pins the mtime it is given.

use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use filetime::FileTime;

/// Set the modification time of `path` to `secs` seconds after the epoch.
pub fn set_mtime(path: impl AsRef<Path>, secs: u64) {
    let path = path.as_ref();
    let time = FileTime::from_system_time(UNIX_EPOCH + Duration::from_secs(secs));
    filetime::set_file_mtime(path, time)
        .unwrap_or_else(|e| panic!("set mtime of {}: {e}", path.display()));
}

/// Write `contents` to `path` (creating parents) and pin its mtime.
pub fn write_file(path: impl AsRef<Path>, contents: &str, secs: u64) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {}: {e}", parent.display()));
    }
    fs::write(path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    set_mtime(path, secs);
}

/// Create an empty file, or truncate an existing one, with a pinned mtime.
pub fn touch(path: impl AsRef<Path>, secs: u64) {
    write_file(path, "", secs);
}

/// Create a directory (and parents) and pin its mtime.
pub fn mkdir(path: impl AsRef<Path>, secs: u64) {
    let path = path.as_ref();
    fs::create_dir_all(path).unwrap_or_else(|e| panic!("mkdir {}: {e}", path.display()));
    set_mtime(path, secs);
}

/// Remove a file or a whole directory tree.
pub fn remove(path: impl AsRef<Path>) {
    let path = path.as_ref();
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.unwrap_or_else(|e| panic!("remove {}: {e}", path.display()));
}
