//! Logging setup: a non-blocking file writer, since the terminal UI owns
//! stdout.
//!
//! Filter priority: `CUBETIME_LOG` > `RUST_LOG` > the config file's
//! `log_filter` > `warn,cubetime=info`.
//!
//! Default log file: `<data_local_dir>/cubetime/logs/cubetime-<pid>.log`,
//! overridable with `--log-file`.

use std::{env, path::PathBuf};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};

const DEFAULT_FILTER: &str = "warn,cubetime=info";

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
    pub filter: Option<String>,
}

/// Initialize file logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program;
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let (filter, rejected) = filter_or_default(config.filter.as_deref());
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(filter);

    Registry::default()
        .with(file_layer)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))?;

    if let Some(err) = rejected {
        warn!(%err, fallback = DEFAULT_FILTER, "ignoring log filter");
    }

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Stdout logging for tests. Safe to call more than once.
pub fn test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(DEFAULT_FILTER))
        .with_test_writer()
        .try_init();
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("cubetime-{}.log", std::process::id());

    match override_path {
        Some(path) if path.extension().is_some() => {
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            (dir, name)
        }
        Some(dir) => (dir, filename),
        None => (AppDirs::log_dir(), filename),
    }
}

fn create_filter(config_filter: Option<&str>) -> Result<EnvFilter> {
    let directives = env::var("CUBETIME_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .ok()
        .or_else(|| config_filter.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|err| Error::Logging(format!("{directives:?}: {err}")))
}

/// A bad filter never stops the app; it is swapped for the default and
/// handed back so it can be reported once logging is up.
fn filter_or_default(config_filter: Option<&str>) -> (EnvFilter, Option<Error>) {
    match create_filter(config_filter) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_FILTER), Some(err)),
    }
}
