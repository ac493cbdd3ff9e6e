#![allow(dead_code)]

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use pollwatch::filter::FileFilter;
use pollwatch::monitor::{FileAlterationObserver, ObserverConfig};
use pollwatch::types::CaseSensitivity;
use pollwatch_test_utils::{RecordingListener, init_tracing};

pub type TestResult = Result<(), Box<dyn Error>>;

/// Observer over the real filesystem with a recording listener attached.
pub fn observe(
    root: &Path,
    filter: Option<Arc<dyn FileFilter>>,
) -> (FileAlterationObserver, Arc<RecordingListener>) {
    observe_with(ObserverConfig {
        root: root.to_path_buf(),
        filter,
        case_sensitivity: CaseSensitivity::Sensitive,
        comparator: None,
    })
}

pub fn observe_with(config: ObserverConfig) -> (FileAlterationObserver, Arc<RecordingListener>) {
    init_tracing();

    let mut observer = FileAlterationObserver::new(config).expect("valid observer config");
    let recorder = Arc::new(RecordingListener::new());
    observer.add_listener(recorder.clone());
    (observer, recorder)
}
