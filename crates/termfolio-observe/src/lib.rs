use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use termfolio_core::runtime_dir;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV: &str = "TERMFOLIO_LOG";
pub const LOG_FILE_NAME: &str = "termfolio.log";
const DEFAULT_DIRECTIVES: &str = "info";

/// Owns the global tracing subscriber for the process. Log lines go to the
/// workspace log file, and to stderr as well when verbose. Nothing is ever
/// written to stdout.
pub struct Observer {
    log_path: PathBuf,
    verbose: bool,
    installed: bool,
    _guard: Option<WorkerGuard>,
}

impl Observer {
    pub fn new(workspace: &Path, verbose: bool) -> Result<Self> {
        let dir = runtime_dir(workspace);
        fs::create_dir_all(&dir)?;
        let log_path = dir.join(LOG_FILE_NAME);

        let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
        let stderr_layer = verbose.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        });
        let directives = std::env::var(LOG_ENV).ok();
        let installed = tracing_subscriber::registry()
            .with(env_filter(directives.as_deref()))
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .is_ok();

        // Drop the worker when another subscriber already owns the slot.
        let guard = installed.then_some(guard);
        if installed {
            tracing::debug!(path = %log_path.display(), verbose, "logging initialised");
        }
        Ok(Self {
            log_path,
            verbose,
            installed,
            _guard: guard,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// False when another global subscriber was already in place.
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

/// Parses filter directives, falling back to `info` when absent or invalid.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
