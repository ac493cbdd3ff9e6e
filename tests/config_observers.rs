mod common;

use std::sync::Arc;

use clap::Parser;
use pollwatch::cli::CliArgs;
use pollwatch::config::{load_and_validate, load_from_path};
use pollwatch::errors::PollwatchError;
use pollwatch::monitor::AlterationKind;
use pollwatch::{build_observers, run};
use pollwatch_test_utils::builders::{ConfigFileBuilder, ObserverSectionBuilder, write_config};
use pollwatch_test_utils::{RecordingListener, init_tracing, mkdir, write_file};
use tempfile::tempdir;

use common::TestResult;

const CONFIG: &str = r#"
[monitor]
interval = "250ms"

[default]
include = ["**/*.rs"]
exclude = ["**/target"]

[observer.sources]
path = "src"
ignore_hidden = true
"#;

#[test]
fn observers_from_config_apply_globs_and_hidden_rule() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let src = dir.path().join("src");
    mkdir(&src, 1_000);
    let config_path = dir.path().join("Pollwatch.toml");
    std::fs::write(&config_path, CONFIG)?;

    let cfg = load_and_validate(&config_path)?;
    assert_eq!(cfg.interval.as_millis(), 250);

    let mut observers = build_observers(&cfg, dir.path())?;
    assert_eq!(observers.len(), 1);
    let observer = &mut observers[0];
    assert_eq!(observer.root(), src.as_path());
    assert_eq!(observer.listeners().count(), 1);

    let recorder = Arc::new(RecordingListener::new());
    observer.add_listener(recorder.clone());
    observer.initialize()?;

    write_file(src.join("main.rs"), "fn main() {}", 1_000);
    write_file(src.join("notes.md"), "# notes", 1_000);
    write_file(src.join("target/out.rs"), "", 1_000);
    write_file(src.join(".hidden/secret.rs"), "", 1_000);
    observer.check_and_notify()?;

    assert_eq!(
        recorder.events(),
        vec![(AlterationKind::FileCreate, src.join("main.rs"))]
    );
    Ok(())
}

#[test]
fn builder_config_resolves_paths() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .interval("2s")
        .with_default_include("**/*.txt")
        .with_observer(
            "docs",
            ObserverSectionBuilder::new("docs")
                .include("**/*.md")
                .append_default_include()
                .build(),
        )
        .build();

    let spec = &cfg.observers[0];
    assert_eq!(spec.include, vec!["**/*.md", "**/*.txt"]);
    assert_eq!(spec.root(std::path::Path::new("/p")), std::path::PathBuf::from("/p/docs"));
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Pollwatch.toml");
    std::fs::write(&path, "[observer.a\npath = 1")?;
    assert!(matches!(load_from_path(&path), Err(PollwatchError::TomlError(_))));
    Ok(())
}

#[test]
fn config_without_observers_is_rejected() -> TestResult {
    let result = pollwatch::config::ConfigFile::try_from(ConfigFileBuilder::new().raw());
    assert!(matches!(result, Err(PollwatchError::ConfigError(_))));
    Ok(())
}

#[tokio::test]
async fn dry_run_and_snapshot_modes_exit_cleanly() -> TestResult {
    let dir = tempdir()?;
    write_file(dir.path().join("data/a.txt"), "a", 1_000);
    let config_path = write_config(dir.path(), "1s", &[("data", "data")]);
    let config_arg = config_path.to_string_lossy().into_owned();

    let dry = CliArgs::try_parse_from(["pollwatch", "--config", config_arg.as_str(), "--dry-run"])?;
    run(dry).await?;

    let snap = CliArgs::try_parse_from([
        "pollwatch",
        "--config",
        config_arg.as_str(),
        "--snapshot",
        "--sort",
        "size",
        "--dirs-first",
    ])?;
    run(snap).await?;
    Ok(())
}
