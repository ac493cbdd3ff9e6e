// src/monitor/entry.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::fs::EntryAttributes;

/// Immutable snapshot of one filesystem entry at capture time.
///
/// A directory entry owns its (filtered, sorted) children. Entries never
/// track the live filesystem; a new tree is captured on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    exists: bool,
    is_directory: bool,
    last_modified: SystemTime,
    length: u64,
    children: Vec<Arc<FileEntry>>,
}

impl FileEntry {
    /// Entry for a path that exists, built from its stat attributes.
    pub fn from_attributes(
        path: impl Into<PathBuf>,
        attrs: &EntryAttributes,
        children: Vec<Arc<FileEntry>>,
    ) -> Self {
        let path = path.into();
        Self {
            name: entry_name(&path),
            path,
            exists: true,
            is_directory: attrs.is_dir,
            last_modified: attrs.modified,
            length: if attrs.is_dir { 0 } else { attrs.len },
            children: if attrs.is_dir { children } else { Vec::new() },
        }
    }

    /// Entry standing in for a path that does not exist.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: entry_name(&path),
            path,
            exists: false,
            is_directory: false,
            last_modified: UNIX_EPOCH,
            length: 0,
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    pub fn is_file(&self) -> bool {
        self.exists && !self.is_directory
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn children(&self) -> &[Arc<FileEntry>] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// All entries below this one, depth-first, parents before children.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator returned by [`FileEntry::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Arc<FileEntry>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Arc<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn entry_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}
