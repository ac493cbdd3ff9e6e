// src/monitor/event.rs

use std::fmt;
use std::sync::Arc;

use crate::monitor::entry::FileEntry;
use crate::monitor::listener::FileAlterationListener;

/// What happened to an entry between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlterationKind {
    DirectoryCreate,
    DirectoryChange,
    DirectoryDelete,
    FileCreate,
    FileChange,
    FileDelete,
}

impl AlterationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlterationKind::DirectoryCreate => "directory-create",
            AlterationKind::DirectoryChange => "directory-change",
            AlterationKind::DirectoryDelete => "directory-delete",
            AlterationKind::FileCreate => "file-create",
            AlterationKind::FileChange => "file-change",
            AlterationKind::FileDelete => "file-delete",
        }
    }
}

impl fmt::Display for AlterationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event produced by the diff engine.
///
/// For deletions `entry` is the entry from the previous snapshot; for
/// creations and changes it is the freshly captured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterationEvent {
    pub kind: AlterationKind,
    pub entry: Arc<FileEntry>,
}

impl AlterationEvent {
    pub fn new(kind: AlterationKind, entry: Arc<FileEntry>) -> Self {
        Self { kind, entry }
    }

    /// Route this event to the matching listener hook.
    pub fn dispatch(&self, listener: &dyn FileAlterationListener) -> anyhow::Result<()> {
        let entry = self.entry.as_ref();
        match self.kind {
            AlterationKind::DirectoryCreate => listener.on_directory_create(entry),
            AlterationKind::DirectoryChange => listener.on_directory_change(entry),
            AlterationKind::DirectoryDelete => listener.on_directory_delete(entry),
            AlterationKind::FileCreate => listener.on_file_create(entry),
            AlterationKind::FileChange => listener.on_file_change(entry),
            AlterationKind::FileDelete => listener.on_file_delete(entry),
        }
    }
}

impl fmt::Display for AlterationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.entry.path().display())
    }
}
