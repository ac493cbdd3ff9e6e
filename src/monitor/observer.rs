// src/monitor/observer.rs

//! One observed root: its baseline snapshot, its listeners and the
//! capture/diff/dispatch step.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::comparator::{EntryComparator, NameComparator};
use crate::errors::{PollwatchError, Result};
use crate::filter::{FileFilter, TrueFilter};
use crate::fs::{FileSystem, RealFileSystem};
use crate::monitor::diff::diff;
use crate::monitor::entry::FileEntry;
use crate::monitor::event::AlterationEvent;
use crate::monitor::listener::FileAlterationListener;
use crate::monitor::snapshot::capture;
use crate::types::CaseSensitivity;

/// Construction parameters for a [`FileAlterationObserver`].
#[derive(Debug, Clone, Default)]
pub struct ObserverConfig {
    pub root: PathBuf,
    /// `None` observes every entry below the root.
    pub filter: Option<Arc<dyn FileFilter>>,
    pub case_sensitivity: CaseSensitivity,
    /// `None` orders children by name using `case_sensitivity`.
    pub comparator: Option<Arc<dyn EntryComparator>>,
}

impl ObserverConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case_sensitivity = case;
        self
    }

    pub fn with_comparator(mut self, comparator: impl EntryComparator + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Uninitialized,
    Ready,
    Destroyed,
}

pub struct FileAlterationObserver {
    root: PathBuf,
    filter: Option<Arc<dyn FileFilter>>,
    case_sensitivity: CaseSensitivity,
    comparator: Arc<dyn EntryComparator>,
    fs: Arc<dyn FileSystem>,
    listeners: Vec<Arc<dyn FileAlterationListener>>,
    state: ObserverState,
    snapshot: Arc<FileEntry>,
}

impl FileAlterationObserver {
    /// Observer over the real filesystem.
    pub fn new(config: ObserverConfig) -> Result<Self> {
        Self::with_file_system(config, Arc::new(RealFileSystem))
    }

    pub fn with_file_system(config: ObserverConfig, fs: Arc<dyn FileSystem>) -> Result<Self> {
        if config.root.as_os_str().is_empty() {
            return Err(PollwatchError::ConfigError(
                "observer root path must not be empty".to_string(),
            ));
        }

        let comparator = config
            .comparator
            .unwrap_or_else(|| Arc::new(NameComparator::new(config.case_sensitivity)));

        Ok(Self {
            snapshot: Arc::new(FileEntry::missing(&config.root)),
            root: config.root,
            filter: config.filter,
            case_sensitivity: config.case_sensitivity,
            comparator,
            fs,
            listeners: Vec::new(),
            state: ObserverState::Uninitialized,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> Option<&Arc<dyn FileFilter>> {
        self.filter.as_ref()
    }

    pub fn comparator(&self) -> &Arc<dyn EntryComparator> {
        &self.comparator
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// The last successfully captured tree (a missing root before `initialize`).
    pub fn snapshot(&self) -> &Arc<FileEntry> {
        &self.snapshot
    }

    /// Register a listener. Adding the same `Arc` twice is a no-op.
    pub fn add_listener(&mut self, listener: Arc<dyn FileAlterationListener>) {
        if !self.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn FileAlterationListener>) {
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn listeners(&self) -> impl Iterator<Item = &Arc<dyn FileAlterationListener>> {
        self.listeners.iter()
    }

    /// Take the baseline snapshot. No events are fired.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state == ObserverState::Destroyed {
            return Err(PollwatchError::ObserverDestroyed(self.root.clone()));
        }

        self.snapshot = self.capture()?;
        self.state = ObserverState::Ready;
        info!(
            root = %self.root.display(),
            exists = self.snapshot.exists(),
            entries = self.snapshot.descendants().count(),
            "observer initialized"
        );
        Ok(())
    }

    /// Capture, diff against the baseline and notify listeners.
    ///
    /// The new snapshot becomes the baseline before listeners run, so a
    /// failing listener never causes events to be repeated.
    pub fn check_and_notify(&mut self) -> Result<Vec<AlterationEvent>> {
        match self.state {
            ObserverState::Destroyed => {
                return Err(PollwatchError::ObserverDestroyed(self.root.clone()));
            }
            ObserverState::Uninitialized => {
                self.initialize()?;
                return Ok(Vec::new());
            }
            ObserverState::Ready => {}
        }

        let current = match self.capture() {
            Ok(current) => current,
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "capture failed; keeping previous snapshot");
                return Err(err);
            }
        };

        let events = diff(&self.snapshot, &current, self.comparator.as_ref());
        self.snapshot = current;
        debug!(root = %self.root.display(), events = events.len(), "check complete");

        self.notify(&events)?;
        Ok(events)
    }

    /// Stop observing. Later checks fail with `ObserverDestroyed`.
    pub fn destroy(&mut self) {
        if self.state != ObserverState::Destroyed {
            debug!(root = %self.root.display(), "observer destroyed");
        }
        self.state = ObserverState::Destroyed;
    }

    fn capture(&self) -> Result<Arc<FileEntry>> {
        let filter: &dyn FileFilter = match &self.filter {
            Some(filter) => filter.as_ref(),
            None => &TrueFilter,
        };
        capture(self.fs.as_ref(), &self.root, filter, self.comparator.as_ref())
    }

    fn notify(&self, events: &[AlterationEvent]) -> Result<()> {
        let mut failures = 0usize;
        let mut first_message: Option<String> = None;
        let mut record = |outcome: anyhow::Result<()>, hook: &str| {
            if let Err(err) = outcome {
                warn!(root = %self.root.display(), hook, error = %err, "listener failed");
                failures += 1;
                first_message.get_or_insert_with(|| format!("{hook}: {err}"));
            }
        };

        for listener in &self.listeners {
            record(listener.on_start(self), "on_start");
        }
        for event in events {
            for listener in &self.listeners {
                record(event.dispatch(listener.as_ref()), event.kind.as_str());
            }
        }
        for listener in &self.listeners {
            record(listener.on_stop(self), "on_stop");
        }

        match first_message {
            None => Ok(()),
            Some(message) => Err(PollwatchError::Listener {
                path: self.root.clone(),
                failures,
                message,
            }),
        }
    }
}

impl fmt::Debug for FileAlterationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileAlterationObserver")
            .field("root", &self.root)
            .field("filter", &self.filter)
            .field("comparator", &self.comparator)
            .field("listeners", &self.listeners.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FileAlterationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileAlterationObserver[file='{}'", self.root.display())?;
        if let Some(filter) = &self.filter {
            write!(f, ", {filter:?}")?;
        }
        write!(f, ", listeners={}]", self.listeners.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::filter::{DirectoryFilter, FileFilterExt, SuffixFilter};
    use crate::fs::mock::{MockFileSystem, mtime};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
        fail_on_create: bool,
    }

    impl Recorder {
        fn push(&self, line: String) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(line);
            Ok(())
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.seen.lock().unwrap())
        }
    }

    impl FileAlterationListener for Recorder {
        fn on_start(&self, _observer: &FileAlterationObserver) -> anyhow::Result<()> {
            self.push("start".into())
        }

        fn on_file_create(&self, file: &FileEntry) -> anyhow::Result<()> {
            if self.fail_on_create {
                anyhow::bail!("refusing {}", file.name());
            }
            self.push(format!("create {}", file.name()))
        }

        fn on_file_change(&self, file: &FileEntry) -> anyhow::Result<()> {
            self.push(format!("change {}", file.name()))
        }

        fn on_file_delete(&self, file: &FileEntry) -> anyhow::Result<()> {
            self.push(format!("delete {}", file.name()))
        }

        fn on_stop(&self, _observer: &FileAlterationObserver) -> anyhow::Result<()> {
            self.push("stop".into())
        }
    }

    fn observer(fs: &MockFileSystem) -> FileAlterationObserver {
        FileAlterationObserver::with_file_system(ObserverConfig::new("/w"), Arc::new(fs.clone()))
            .unwrap()
    }

    #[test]
    fn empty_root_is_rejected() {
        let err = FileAlterationObserver::new(ObserverConfig::new("")).unwrap_err();
        assert!(matches!(err, PollwatchError::ConfigError(_)));
    }

    #[test]
    fn first_check_only_initializes() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1, mtime(1));
        let mut obs = observer(&fs);
        let recorder = Arc::new(Recorder::default());
        obs.add_listener(recorder.clone());

        assert_eq!(obs.state(), ObserverState::Uninitialized);
        assert!(obs.check_and_notify().unwrap().is_empty());
        assert_eq!(obs.state(), ObserverState::Ready);
        assert!(recorder.take().is_empty());
        assert_eq!(obs.snapshot().child_count(), 1);
    }

    #[test]
    fn lifecycle_hooks_bracket_events() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1, mtime(1));
        let mut obs = observer(&fs);
        let recorder = Arc::new(Recorder::default());
        obs.add_listener(recorder.clone());
        obs.initialize().unwrap();

        assert!(obs.check_and_notify().unwrap().is_empty());
        assert_eq!(recorder.take(), vec!["start", "stop"]);

        fs.add_file("/w/b.txt", 1, mtime(2));
        fs.set_modified("/w/a.txt", mtime(3));
        let events = obs.check_and_notify().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            recorder.take(),
            vec!["start", "change a.txt", "create b.txt", "stop"]
        );

        fs.remove("/w/a.txt");
        obs.check_and_notify().unwrap();
        assert_eq!(recorder.take(), vec!["start", "delete a.txt", "stop"]);
    }

    #[test]
    fn failed_capture_keeps_previous_snapshot() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.txt", 1, mtime(1));
        let mut obs = observer(&fs);
        obs.initialize().unwrap();
        let before = Arc::clone(obs.snapshot());

        fs.fail_listing("/w");
        fs.add_file("/w/b.txt", 1, mtime(2));
        assert!(matches!(
            obs.check_and_notify(),
            Err(PollwatchError::Capture { .. })
        ));
        assert!(Arc::ptr_eq(obs.snapshot(), &before));

        fs.heal("/w");
        let events = obs.check_and_notify().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entry.name(), "b.txt");
    }

    #[test]
    fn listener_failure_does_not_stop_delivery() {
        let fs = MockFileSystem::new();
        fs.add_dir("/w", mtime(1));
        let mut obs = observer(&fs);
        let failing = Arc::new(Recorder {
            fail_on_create: true,
            ..Recorder::default()
        });
        let healthy = Arc::new(Recorder::default());
        obs.add_listener(failing.clone());
        obs.add_listener(healthy.clone());
        obs.initialize().unwrap();

        fs.add_file("/w/x", 1, mtime(2));
        fs.add_file("/w/y", 1, mtime(2));
        let err = obs.check_and_notify().unwrap_err();
        match err {
            PollwatchError::Listener { failures, message, .. } => {
                assert_eq!(failures, 2);
                assert!(message.contains("refusing x"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(failing.take(), vec!["start", "stop"]);
        assert_eq!(healthy.take(), vec!["start", "create x", "create y", "stop"]);

        // The snapshot advanced: nothing is reported twice.
        assert!(obs.check_and_notify().unwrap().is_empty());
    }

    #[test]
    fn listener_set_semantics() {
        let fs = MockFileSystem::new();
        let mut obs = observer(&fs);
        let a: Arc<dyn FileAlterationListener> = Arc::new(Recorder::default());
        let b: Arc<dyn FileAlterationListener> = Arc::new(Recorder::default());

        obs.add_listener(a.clone());
        obs.add_listener(a.clone());
        obs.add_listener(b.clone());
        assert_eq!(obs.listeners().count(), 2);

        obs.remove_listener(&a);
        obs.remove_listener(&a);
        assert_eq!(obs.listeners().count(), 1);
        assert!(Arc::ptr_eq(obs.listeners().next().unwrap(), &b));
    }

    #[test]
    fn destroyed_observer_refuses_checks() {
        let fs = MockFileSystem::new();
        let mut obs = observer(&fs);
        obs.add_listener(Arc::new(Recorder::default()));
        obs.initialize().unwrap();
        obs.destroy();

        assert_eq!(obs.state(), ObserverState::Destroyed);
        assert!(matches!(
            obs.check_and_notify(),
            Err(PollwatchError::ObserverDestroyed(_))
        ));
        assert!(obs.initialize().is_err());
        assert_eq!(obs.listeners().count(), 1);
    }

    #[test]
    fn display_includes_filter_when_present() {
        let fs = MockFileSystem::new();
        let plain = observer(&fs);
        assert_eq!(plain.to_string(), "FileAlterationObserver[file='/w', listeners=0]");

        let config = ObserverConfig::new("/w").with_filter(DirectoryFilter.or(SuffixFilter::new([".java"])));
        let mut filtered =
            FileAlterationObserver::with_file_system(config, Arc::new(fs.clone())).unwrap();
        filtered.add_listener(Arc::new(Recorder::default()));
        let text = filtered.to_string();
        assert!(text.starts_with("FileAlterationObserver[file='/w', OrFilter"));
        assert!(text.ends_with(", listeners=1]"));
    }

    #[test]
    fn default_comparator_follows_case_sensitivity() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/readme", 1, mtime(1));
        fs.add_file("/w/README", 1, mtime(1));
        let config = ObserverConfig::new("/w").with_case_sensitivity(CaseSensitivity::Insensitive);
        let mut obs = FileAlterationObserver::with_file_system(config, Arc::new(fs)).unwrap();
        obs.initialize().unwrap();
        assert_eq!(obs.snapshot().child_count(), 1);
    }
}
