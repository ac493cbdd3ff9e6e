// src/fs/mod.rs

//! Filesystem seam used by snapshot capture.
//!
//! Everything the observer learns about the disk goes through [`FileSystem`],
//! so tests can swap in [`mock::MockFileSystem`] and drive vanished entries or
//! unreadable directories deterministically.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod mock;

/// The observable attributes of one filesystem entry at stat time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAttributes {
    pub is_dir: bool,
    /// Set only by [`FileSystem::symlink_metadata`] for the link itself.
    pub is_symlink: bool,
    pub len: u64,
    pub modified: SystemTime,
    pub readonly: bool,
}

impl EntryAttributes {
    pub fn file(len: u64, modified: SystemTime) -> Self {
        Self {
            is_dir: false,
            is_symlink: false,
            len,
            modified,
            readonly: false,
        }
    }

    /// A symbolic link as seen without following it.
    pub fn symlink(modified: SystemTime) -> Self {
        Self {
            is_dir: false,
            is_symlink: true,
            len: 0,
            modified,
            readonly: false,
        }
    }

    pub fn directory(modified: SystemTime) -> Self {
        Self {
            is_dir: true,
            is_symlink: false,
            len: 0,
            modified,
            readonly: false,
        }
    }

    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    fn from_metadata(meta: &fs::Metadata) -> Self {
        Self {
            is_dir: meta.is_dir(),
            is_symlink: meta.file_type().is_symlink(),
            len: meta.len(),
            // Some platforms cannot report mtimes; treat them as the epoch so
            // such entries never look modified.
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
            readonly: meta.permissions().readonly(),
        }
    }
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Stat a path, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<EntryAttributes>;

    /// Stat a path without following a final symlink. A link reports
    /// `is_symlink` and never `is_dir`.
    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryAttributes>;

    /// Return the entries of a directory as full paths, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn metadata(&self, path: &Path) -> io::Result<EntryAttributes> {
        let meta = fs::metadata(path)?;
        Ok(EntryAttributes::from_metadata(&meta))
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryAttributes> {
        let meta = fs::symlink_metadata(path)?;
        Ok(EntryAttributes::from_metadata(&meta))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
