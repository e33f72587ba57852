//! Log setup for the `umkm` binary.
//!
//! Command output owns stdout, so events go to stderr (unless `--quiet`) and,
//! with `--log-file`, are appended to a file as plain text. The filter comes
//! from `--log-level`, then `RUST_LOG`, then defaults to `info`.

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as layers};

const DEFAULT_FILTER: &str = "info";

/// Logging options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Log filter, e.g. `debug` or `umkm_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Do not print log output on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
}

/// Timestamps in the machine's local zone, to the millisecond.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(
        &self,
        w: &mut Writer<'_>,
    ) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Installs the global subscriber. Call once, before any command runs.
pub fn init(args: &LogArgs) -> Result<()> {
    let filter = build_filter(args.log_level.as_deref())?;

    let stderr = (!args.quiet).then(|| {
        layers::layer()
            .with_timer(LocalTime)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
    });

    let file = match &args.log_file {
        Some(path) => Some(
            layers::layer()
                .with_timer(LocalTime)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()
        .context("logging was already initialized")
}

/// An explicit level wins over `RUST_LOG`.
fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Opens `path` for appending; the directory must already exist.
fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn explicit_level_is_accepted() {
        assert!(build_filter(Some("debug")).is_ok());
        assert!(build_filter(Some("umkm_core=trace,info")).is_ok());
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = build_filter(Some("umkm_core=loud")).unwrap_err();

        assert!(err.to_string().starts_with("invalid log level 'umkm_core=loud'"));
    }

    #[test]
    fn log_file_in_missing_directory_is_an_error() {
        let path = std::env::temp_dir()
            .join("umkm-no-such-dir")
            .join("umkm.log");

        let err = open_log_file(&path).unwrap_err();

        assert!(err.to_string().contains("cannot open log file"));
    }

    #[test]
    fn log_file_is_appended_to() {
        let path = std::env::temp_dir().join(format!("umkm-log-{}.log", std::process::id()));
        std::fs::write(&path, "first\n").unwrap();

        {
            use std::io::Write;
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "second").unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        std::fs::remove_file(&path).unwrap();
    }
}
