// src/monitor/mod.rs

//! Polling change detection.
//!
//! Each [`FileAlterationObserver`] owns the last snapshot of one root. A check
//! captures a fresh snapshot ([`snapshot::capture`]), compares it with the
//! previous one ([`diff::diff`]) and hands the resulting
//! [`AlterationEvent`]s to its [`FileAlterationListener`]s. A
//! [`FileAlterationMonitor`] checks a set of observers on a fixed interval.

pub mod diff;
pub mod entry;
pub mod event;
pub mod listener;
pub mod observer;
pub mod scheduler;
pub mod snapshot;

pub use diff::diff;
pub use entry::FileEntry;
pub use event::{AlterationEvent, AlterationKind};
pub use listener::{ChannelListener, FileAlterationListener, LoggingListener};
pub use observer::{FileAlterationObserver, ObserverConfig, ObserverState};
pub use scheduler::{CycleReport, FileAlterationMonitor, MonitorHandle};
pub use snapshot::capture;
