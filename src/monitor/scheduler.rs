// src/monitor/scheduler.rs

//! The polling loop driving a set of observers.
//!
//! [`FileAlterationMonitor::run_cycle`] is the synchronous unit of work and
//! can be called directly. [`FileAlterationMonitor::start`] moves the monitor
//! into a tokio task that sleeps one interval, runs a cycle on the blocking
//! pool and repeats until [`MonitorHandle::stop`] is called.

use std::path::Path;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{PollwatchError, Result};
use crate::monitor::observer::FileAlterationObserver;

/// Outcome of one pass over every observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub checked: usize,
    pub events: usize,
    pub failures: usize,
}

#[derive(Debug)]
pub struct FileAlterationMonitor {
    interval: Duration,
    observers: Vec<FileAlterationObserver>,
}

impl FileAlterationMonitor {
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(PollwatchError::ConfigError(
                "monitor interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            interval,
            observers: Vec::new(),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn add_observer(&mut self, observer: FileAlterationObserver) {
        self.observers.push(observer);
    }

    /// Remove the first observer watching `root`.
    pub fn remove_observer(&mut self, root: &Path) -> Option<FileAlterationObserver> {
        let index = self.observers.iter().position(|o| o.root() == root)?;
        Some(self.observers.remove(index))
    }

    pub fn observers(&self) -> &[FileAlterationObserver] {
        &self.observers
    }

    pub fn into_observers(self) -> Vec<FileAlterationObserver> {
        self.observers
    }

    /// Check every observer once, in registration order.
    ///
    /// A failing observer is logged and counted; the rest are still checked.
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        for observer in &mut self.observers {
            report.checked += 1;
            match observer.check_and_notify() {
                Ok(events) => report.events += events.len(),
                Err(err) => {
                    warn!(root = %observer.root().display(), error = %err, "observer check failed");
                    report.failures += 1;
                }
            }
        }

        debug!(
            checked = report.checked,
            events = report.events,
            failures = report.failures,
            "monitor cycle complete"
        );
        report
    }

    /// Initialize every observer and start polling in the background.
    ///
    /// Baselines are captured on the blocking pool before this resolves, so
    /// changes made afterwards are reported.
    pub async fn start(self) -> Result<MonitorHandle> {
        let monitor = tokio::task::spawn_blocking(move || {
            let mut monitor = self;
            monitor.initialize_all();
            monitor
        })
        .await
        .map_err(|e| PollwatchError::Monitor(format!("initial snapshot task failed: {e}")))?;

        info!(
            observers = monitor.observers.len(),
            interval_ms = monitor.interval.as_millis() as u64,
            "monitor started"
        );

        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(poll_loop(monitor, stop_rx));
        Ok(MonitorHandle { stop_tx, task })
    }

    fn initialize_all(&mut self) {
        for observer in &mut self.observers {
            if let Err(err) = observer.initialize() {
                warn!(
                    root = %observer.root().display(),
                    error = %err,
                    "initial snapshot failed; retrying on the first cycle"
                );
            }
        }
    }
}

async fn poll_loop(
    mut monitor: FileAlterationMonitor,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<Vec<FileAlterationObserver>> {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(monitor.interval) => {}
            _ = stop_rx.changed() => break,
        }

        let cycle = tokio::task::spawn_blocking(move || {
            let report = monitor.run_cycle();
            (monitor, report)
        });
        monitor = match cycle.await {
            Ok((monitor, _report)) => monitor,
            Err(err) => {
                error!(error = %err, "monitor cycle aborted");
                return Err(PollwatchError::Monitor(format!("monitor cycle aborted: {err}")));
            }
        };

        if *stop_rx.borrow() {
            break;
        }
    }

    for observer in &mut monitor.observers {
        observer.destroy();
    }
    info!("monitor stopped");
    Ok(monitor.into_observers())
}

/// Running monitor. Dropping the handle also stops the loop.
#[derive(Debug)]
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<Result<Vec<FileAlterationObserver>>>,
}

impl MonitorHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Ask the loop to stop and wait for it.
    ///
    /// An in-flight cycle runs to completion first. Returns the destroyed
    /// observers.
    pub async fn stop(self) -> Result<Vec<FileAlterationObserver>> {
        // Fails only when the loop already exited.
        let _ = self.stop_tx.send(true);
        self.task
            .await
            .map_err(|e| PollwatchError::Monitor(format!("monitor task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fs::mock::{MockFileSystem, mtime};
    use crate::monitor::entry::FileEntry;
    use crate::monitor::event::AlterationKind;
    use crate::monitor::listener::{ChannelListener, FileAlterationListener};
    use crate::monitor::observer::{ObserverConfig, ObserverState};

    fn observer(fs: &MockFileSystem, root: &str) -> FileAlterationObserver {
        FileAlterationObserver::with_file_system(ObserverConfig::new(root), Arc::new(fs.clone()))
            .unwrap()
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(FileAlterationMonitor::new(Duration::ZERO).is_err());
        assert_eq!(
            FileAlterationMonitor::new(Duration::from_millis(5)).unwrap().interval(),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn failing_observer_does_not_block_others() {
        let fs = MockFileSystem::new();
        fs.add_dir("/a", mtime(1));
        fs.add_dir("/b", mtime(1));

        let mut monitor = FileAlterationMonitor::new(Duration::from_secs(1)).unwrap();
        monitor.add_observer(observer(&fs, "/a"));
        monitor.add_observer(observer(&fs, "/b"));

        let first = monitor.run_cycle();
        assert_eq!(first, CycleReport { checked: 2, events: 0, failures: 0 });

        fs.fail_listing("/a");
        fs.add_file("/b/new.txt", 1, mtime(2));
        let second = monitor.run_cycle();
        assert_eq!(second, CycleReport { checked: 2, events: 1, failures: 1 });
    }

    #[derive(Debug)]
    struct Rejecting;

    impl FileAlterationListener for Rejecting {
        fn on_file_create(&self, entry: &FileEntry) -> anyhow::Result<()> {
            anyhow::bail!("rejecting {}", entry.name())
        }
    }

    #[test]
    fn listener_error_does_not_block_other_observers() {
        let fs = MockFileSystem::new();
        fs.add_dir("/a", mtime(1));
        fs.add_dir("/b", mtime(1));

        let mut first = observer(&fs, "/a");
        first.add_listener(Arc::new(Rejecting));
        let (listener, mut rx) = ChannelListener::channel();
        let mut second = observer(&fs, "/b");
        second.add_listener(Arc::new(listener));

        let mut monitor = FileAlterationMonitor::new(Duration::from_secs(1)).unwrap();
        monitor.add_observer(first);
        monitor.add_observer(second);
        monitor.run_cycle();

        fs.add_file("/a/x.txt", 1, mtime(2));
        fs.add_file("/b/y.txt", 1, mtime(2));
        let report = monitor.run_cycle();
        assert_eq!(report, CycleReport { checked: 2, events: 1, failures: 1 });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, AlterationKind::FileCreate);
        assert_eq!(event.entry.path(), Path::new("/b/y.txt"));

        // The failing observer still committed its snapshot.
        let report = monitor.run_cycle();
        assert_eq!(report, CycleReport { checked: 2, events: 0, failures: 0 });
    }

    #[test]
    fn remove_observer_by_root() {
        let fs = MockFileSystem::new();
        let mut monitor = FileAlterationMonitor::new(Duration::from_secs(1)).unwrap();
        monitor.add_observer(observer(&fs, "/a"));
        monitor.add_observer(observer(&fs, "/b"));

        assert!(monitor.remove_observer(Path::new("/missing")).is_none());
        let removed = monitor.remove_observer(Path::new("/a")).unwrap();
        assert_eq!(removed.root(), Path::new("/a"));
        assert_eq!(monitor.observers().len(), 1);
        assert_eq!(monitor.observers()[0].root(), Path::new("/b"));
    }

    #[tokio::test]
    async fn background_loop_reports_and_stops() {
        let fs = MockFileSystem::new();
        fs.add_dir("/w", mtime(1));

        let (listener, mut rx) = ChannelListener::channel();
        let mut obs = observer(&fs, "/w");
        obs.add_listener(Arc::new(listener));

        let mut monitor = FileAlterationMonitor::new(Duration::from_millis(10)).unwrap();
        monitor.add_observer(obs);
        let handle = monitor.start().await.unwrap();
        assert!(handle.is_running());

        fs.add_file("/w/late.txt", 4, mtime(2));
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.kind, AlterationKind::FileCreate);
        assert_eq!(event.entry.name(), "late.txt");

        let observers = handle.stop().await.unwrap();
        assert_eq!(observers.len(), 1);
        assert_eq!(observers[0].state(), ObserverState::Destroyed);
    }
}
