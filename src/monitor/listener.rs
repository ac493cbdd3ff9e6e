// src/monitor/listener.rs

//! Callbacks receiving the alteration events of an observer.
//!
//! Every hook has a no-op default so implementors only override what they
//! care about. Hooks run synchronously on the thread performing the check;
//! an error from one hook is logged by the observer and does not stop
//! delivery to the remaining hooks or listeners.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::info;

use crate::monitor::entry::FileEntry;
use crate::monitor::event::{AlterationEvent, AlterationKind};
use crate::monitor::observer::FileAlterationObserver;

pub trait FileAlterationListener: Send + Sync {
    /// Called once per check, before any event of that check.
    fn on_start(&self, _observer: &FileAlterationObserver) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_directory_create(&self, _directory: &FileEntry) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_directory_change(&self, _directory: &FileEntry) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_directory_delete(&self, _directory: &FileEntry) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_file_create(&self, _file: &FileEntry) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_file_change(&self, _file: &FileEntry) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_file_delete(&self, _file: &FileEntry) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once per check, after every event of that check.
    fn on_stop(&self, _observer: &FileAlterationObserver) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Logs every event at `info` level. This is what the binary attaches.
#[derive(Debug, Clone, Default)]
pub struct LoggingListener {
    label: Option<String>,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every log line with an observer name (e.g. the config section).
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    fn log(&self, kind: AlterationKind, entry: &FileEntry) -> anyhow::Result<()> {
        let observer = self.label.as_deref().unwrap_or("-");
        info!(observer, event = %kind, path = %entry.path().display(), "alteration");
        Ok(())
    }
}

impl FileAlterationListener for LoggingListener {
    fn on_directory_create(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.log(AlterationKind::DirectoryCreate, directory)
    }

    fn on_directory_change(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.log(AlterationKind::DirectoryChange, directory)
    }

    fn on_directory_delete(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.log(AlterationKind::DirectoryDelete, directory)
    }

    fn on_file_create(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.log(AlterationKind::FileCreate, file)
    }

    fn on_file_change(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.log(AlterationKind::FileChange, file)
    }

    fn on_file_delete(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.log(AlterationKind::FileDelete, file)
    }
}

/// Forwards events into an unbounded tokio channel.
///
/// Lets async code consume events produced on the blocking pool. Sending
/// fails once the receiver is dropped.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<AlterationEvent>,
}

impl ChannelListener {
    pub fn new(tx: mpsc::UnboundedSender<AlterationEvent>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning the listener and its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AlterationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn forward(&self, kind: AlterationKind, entry: &FileEntry) -> anyhow::Result<()> {
        self.tx
            .send(AlterationEvent::new(kind, Arc::new(entry.clone())))
            .map_err(|_| anyhow!("event receiver for {} dropped", entry.path().display()))
    }
}

impl FileAlterationListener for ChannelListener {
    fn on_directory_create(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.forward(AlterationKind::DirectoryCreate, directory)
    }

    fn on_directory_change(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.forward(AlterationKind::DirectoryChange, directory)
    }

    fn on_directory_delete(&self, directory: &FileEntry) -> anyhow::Result<()> {
        self.forward(AlterationKind::DirectoryDelete, directory)
    }

    fn on_file_create(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.forward(AlterationKind::FileCreate, file)
    }

    fn on_file_change(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.forward(AlterationKind::FileChange, file)
    }

    fn on_file_delete(&self, file: &FileEntry) -> anyhow::Result<()> {
        self.forward(AlterationKind::FileDelete, file)
    }
}
