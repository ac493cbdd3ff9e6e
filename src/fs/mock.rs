// src/fs/mock.rs

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{EntryAttributes, FileSystem};

#[derive(Debug, Clone)]
enum MockKind {
    File(u64),
    Dir(Vec<String>), // List of child names
    Symlink(PathBuf),
}

#[derive(Debug, Clone)]
struct MockNode {
    kind: MockKind,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct MockState {
    nodes: HashMap<PathBuf, MockNode>,
    unlistable: HashSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
}

/// In-memory filesystem with explicit modification times.
///
/// Parent directories are created implicitly. Listing order is insertion
/// order, which is deliberately not sorted.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

const MAX_LINK_HOPS: usize = 40;

/// Seconds since the epoch as a `SystemTime`, for terse test fixtures.
pub fn mtime(secs: u64) -> SystemTime {
    UNIX_EPOCH + std::time::Duration::from_secs(secs)
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_dir(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let path = path.as_ref();
        let mut state = self.state();
        Self::ensure_dir(&mut state, path);
        if let Some(node) = state.nodes.get_mut(path) {
            node.modified = modified;
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, len: u64, modified: SystemTime) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state();
        state.nodes.insert(
            path.clone(),
            MockNode {
                kind: MockKind::File(len),
                modified,
            },
        );
        Self::link_to_parent(&mut state, &path);
    }

    /// Add a symbolic link. A relative `target` resolves against the link's
    /// parent directory.
    pub fn add_symlink(
        &self,
        path: impl AsRef<Path>,
        target: impl AsRef<Path>,
        modified: SystemTime,
    ) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state();
        state.nodes.insert(
            path.clone(),
            MockNode {
                kind: MockKind::Symlink(target.as_ref().to_path_buf()),
                modified,
            },
        );
        Self::link_to_parent(&mut state, &path);
    }

    /// Update the modification time of an existing entry.
    pub fn set_modified(&self, path: impl AsRef<Path>, modified: SystemTime) {
        if let Some(node) = self.state().nodes.get_mut(path.as_ref()) {
            node.modified = modified;
        }
    }

    /// Remove an entry and, for directories, everything below it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state();
        state.nodes.retain(|p, _| !p.starts_with(path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockNode {
                kind: MockKind::Dir(children),
                ..
            }) = state.nodes.get_mut(parent)
            {
                let name = name.to_string_lossy();
                children.retain(|c| *c != name);
            }
        }
    }

    /// Make `read_dir` on this directory fail with `PermissionDenied`.
    pub fn fail_listing(&self, path: impl AsRef<Path>) {
        self.state().unlistable.insert(path.as_ref().to_path_buf());
    }

    /// Make `metadata` on this path fail with `PermissionDenied`.
    pub fn fail_metadata(&self, path: impl AsRef<Path>) {
        self.state().unreadable.insert(path.as_ref().to_path_buf());
    }

    /// Undo `fail_listing` / `fail_metadata` for a path.
    pub fn heal(&self, path: impl AsRef<Path>) {
        let mut state = self.state();
        state.unlistable.remove(path.as_ref());
        state.unreadable.remove(path.as_ref());
    }

    fn ensure_dir(state: &mut MockState, path: &Path) {
        if state.nodes.contains_key(path) {
            return;
        }
        state.nodes.insert(
            path.to_path_buf(),
            MockNode {
                kind: MockKind::Dir(Vec::new()),
                modified: UNIX_EPOCH,
            },
        );
        Self::link_to_parent(state, path);
    }

    fn link_to_parent(state: &mut MockState, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        if parent.as_os_str().is_empty() {
            return;
        }
        Self::ensure_dir(state, parent);
        if let (
            Some(MockNode {
                kind: MockKind::Dir(children),
                ..
            }),
            Some(name),
        ) = (state.nodes.get_mut(parent), path.file_name())
        {
            let name = name.to_string_lossy().into_owned();
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("not found: {:?}", path))
}

fn denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {:?}", path),
    )
}

fn attributes(node: &MockNode) -> EntryAttributes {
    match &node.kind {
        MockKind::File(len) => EntryAttributes::file(*len, node.modified),
        MockKind::Dir(_) => EntryAttributes::directory(node.modified),
        MockKind::Symlink(_) => EntryAttributes::symlink(node.modified),
    }
}

impl FileSystem for MockFileSystem {
    fn metadata(&self, path: &Path) -> io::Result<EntryAttributes> {
        let state = self.state();
        if state.unreadable.contains(path) {
            return Err(denied(path));
        }

        let mut current = path.to_path_buf();
        for _ in 0..MAX_LINK_HOPS {
            let node = state.nodes.get(&current).ok_or_else(|| not_found(path))?;
            match &node.kind {
                MockKind::Symlink(target) => {
                    current = match current.parent() {
                        Some(parent) => parent.join(target),
                        None => target.clone(),
                    };
                    current = normalize(&current);
                }
                _ => return Ok(attributes(node)),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("too many levels of symbolic links: {:?}", path),
        ))
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryAttributes> {
        let state = self.state();
        if state.unreadable.contains(path) {
            return Err(denied(path));
        }
        state
            .nodes
            .get(path)
            .map(attributes)
            .ok_or_else(|| not_found(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state();
        if state.unlistable.contains(path) {
            return Err(denied(path));
        }
        match state.nodes.get(path) {
            Some(MockNode {
                kind: MockKind::Dir(children),
                ..
            }) => Ok(children.iter().map(|name| path.join(name)).collect()),
            Some(_) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("not a directory: {:?}", path),
            )),
            None => Err(not_found(path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // In mock, we just return the path as is, assuming absolute paths are used in tests
        Ok(path.to_path_buf())
    }
}

/// Resolve `.` and `..` components lexically.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
