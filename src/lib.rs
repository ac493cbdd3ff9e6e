// src/lib.rs

pub mod cli;
pub mod comparator;
pub mod config;
pub mod errors;
pub mod filter;
pub mod fs;
pub mod logging;
pub mod monitor;
pub mod report;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, config_root_dir, load_and_validate};
use crate::fs::{FileSystem, RealFileSystem};
use crate::monitor::{FileAlterationMonitor, FileAlterationObserver, LoggingListener};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - one observer per `[observer.<name>]`, each logging its events
/// - the polling monitor
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let base_dir = canonical_or_self(&config_root_dir(&config_path));

    if args.dry_run {
        print!("{}", report::render_dry_run(&cfg, &base_dir));
        debug!("dry-run complete (nothing observed)");
        return Ok(());
    }

    let observers = build_observers(&cfg, &base_dir)?;

    if args.snapshot {
        for mut observer in observers {
            observer
                .initialize()
                .with_context(|| format!("capturing {}", observer.root().display()))?;
            let comparator = report::snapshot_comparator(
                args.sort,
                args.reverse,
                args.dirs_first,
                observer.case_sensitivity(),
            );
            print!(
                "{}",
                report::render_snapshot(observer.snapshot(), comparator.as_ref())
            );
        }
        return Ok(());
    }

    let mut monitor = FileAlterationMonitor::new(cfg.interval)?;
    for observer in observers {
        info!(%observer, "observing");
        monitor.add_observer(observer);
    }

    let handle = monitor.start().await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C; stopping");
    }
    info!("shutdown requested");

    let observers = handle.stop().await?;
    debug!(observers = observers.len(), "all observers destroyed");
    Ok(())
}

/// One observer per config entry, each with a [`LoggingListener`] labelled by
/// the entry's name.
pub fn build_observers(cfg: &ConfigFile, base_dir: &Path) -> Result<Vec<FileAlterationObserver>> {
    let mut observers = Vec::with_capacity(cfg.observers.len());

    for spec in &cfg.observers {
        let config = spec
            .to_observer_config(base_dir)
            .with_context(|| format!("building observer '{}'", spec.name))?;
        let mut observer = FileAlterationObserver::new(config)?;
        observer.add_listener(Arc::new(LoggingListener::with_label(&spec.name)));
        observers.push(observer);
    }

    Ok(observers)
}

fn canonical_or_self(path: &Path) -> PathBuf {
    RealFileSystem
        .canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
}
