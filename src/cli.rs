// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Report file and directory changes by polling directory snapshots.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Relative observer paths are resolved against its directory.
    #[arg(long, value_name = "PATH", default_value = "Pollwatch.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the resolved observers, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Capture every observed root once, print the trees, then exit.
    #[arg(long)]
    pub snapshot: bool,

    /// Ordering used by `--snapshot`.
    #[arg(long, value_enum, value_name = "KEY", default_value_t = SortKey::Name)]
    pub sort: SortKey,

    /// Reverse the `--snapshot` ordering.
    #[arg(long)]
    pub reverse: bool,

    /// List directories before files in `--snapshot` output.
    #[arg(long)]
    pub dirs_first: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Name,
    Size,
    Modified,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["pollwatch"]).unwrap();
        assert_eq!(args.config, "Pollwatch.toml");
        assert_eq!(args.sort, SortKey::Name);
        assert!(!args.dry_run && !args.snapshot && !args.reverse && !args.dirs_first);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn snapshot_flags() {
        let args = CliArgs::try_parse_from([
            "pollwatch",
            "--config",
            "cfg/Pollwatch.toml",
            "--snapshot",
            "--sort",
            "modified",
            "--reverse",
            "--dirs-first",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, "cfg/Pollwatch.toml");
        assert!(args.snapshot && args.reverse && args.dirs_first);
        assert_eq!(args.sort, SortKey::Modified);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }

    #[test]
    fn rejects_unknown_sort_key() {
        assert!(CliArgs::try_parse_from(["pollwatch", "--sort", "color"]).is_err());
    }
}
