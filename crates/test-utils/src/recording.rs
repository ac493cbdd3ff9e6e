//! A listener that remembers what it was told.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use pollwatch::monitor::{AlterationKind, FileAlterationListener, FileAlterationObserver, FileEntry};

/// Records every event as `(kind, path)` plus start/stop counts.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<(AlterationKind, PathBuf)>>,
    starts: Mutex<usize>,
    stops: Mutex<usize>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    fn events_guard(&self) -> MutexGuard<'_, Vec<(AlterationKind, PathBuf)>> {
        self.events.lock().expect("recording listener poisoned")
    }

    fn record(&self, kind: AlterationKind, entry: &FileEntry) -> anyhow::Result<()> {
        self.events_guard().push((kind, entry.path().to_path_buf()));
        Ok(())
    }

    /// Everything recorded so far, in delivery order.
    pub fn events(&self) -> Vec<(AlterationKind, PathBuf)> {
        self.events_guard().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<(AlterationKind, PathBuf)> {
        std::mem::take(&mut *self.events_guard())
    }

    /// Paths recorded for one kind, in delivery order.
    pub fn paths(&self, kind: AlterationKind) -> Vec<PathBuf> {
        self.events_guard()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn count(&self, kind: AlterationKind) -> usize {
        self.events_guard().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn contains(&self, kind: AlterationKind, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.events_guard().iter().any(|(k, p)| *k == kind && p == path)
    }

    pub fn is_empty(&self) -> bool {
        self.events_guard().is_empty()
    }

    pub fn starts(&self) -> usize {
        *self.starts.lock().expect("recording listener poisoned")
    }

    pub fn stops(&self) -> usize {
        *self.stops.lock().expect("recording listener poisoned")
    }
}

impl FileAlterationListener for RecordingListener {
    fn on_start(&self, _observer: &FileAlterationObserver) -> anyhow::Result<()> {
        *self.starts.lock().expect("recording listener poisoned") += 1;
        Ok(())
    }

    fn on_directory_create(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.record(AlterationKind::DirectoryCreate, directory)
    }

    fn on_directory_change(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.record(AlterationKind::DirectoryChange, directory)
    }

    fn on_directory_delete(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.record(AlterationKind::DirectoryDelete, directory)
    }

    fn on_file_create(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.record(AlterationKind::FileCreate, file)
    }

    fn on_file_change(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.record(AlterationKind::FileChange, file)
    }

    fn on_file_delete(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.record(AlterationKind::FileDelete, file)
    }

    fn on_stop(&self, _observer: &FileAlterationObserver) -> anyhow::Result<()> {
        *self.stops.lock().expect("recording listener poisoned") += 1;
        Ok(())
    }
}
