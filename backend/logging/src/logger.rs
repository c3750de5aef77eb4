//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control, a console layer and
//! an optional rolling file layer.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Where console output goes. One-shot commands log to stderr so their
/// stdout stays machine-readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

impl ConsoleTarget {
    fn make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(std::io::stdout),
            Self::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Used when `RUST_LOG` is unset or unparsable.
    pub level: String,
    pub json: bool,
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
    pub console: ConsoleTarget,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
            file_prefix: "poseidon".to_string(),
            console: ConsoleTarget::Stdout,
        }
    }
}

/// Initialize the global subscriber. Calling it again after success is a no-op.
pub fn init_logger(settings: &LogSettings) -> Result<()> {
    let env_filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), &settings.level);

    let file_layer = match &settings.dir {
        Some(dir) => Some(
            fmt::layer()
                .json()
                .with_writer(file_appender(dir, &settings.file_prefix)?)
                .with_ansi(false),
        ),
        None => None,
    };

    let json_console = settings
        .json
        .then(|| fmt::layer().json().with_writer(settings.console.make_writer()));
    let text_console = (!settings.json).then(|| {
        fmt::layer()
            .with_writer(settings.console.make_writer())
            .with_target(false)
            .with_ansi(settings.console == ConsoleTarget::Stdout)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(text_console)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// `RUST_LOG` wins over the configured level; an invalid directive in either
/// degrades to the next option and finally to `info`.
fn build_filter(env_directive: Option<&str>, level: &str) -> EnvFilter {
    env_directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Daily NDJSON files: `<dir>/<prefix>.YYYY-MM-DD.log`.
fn file_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to open rolling log file in: {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn env_directive_takes_precedence() {
        let filter = build_filter(Some("debug"), "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn configured_level_used_without_env() {
        let filter = build_filter(None, "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn invalid_env_directive_falls_back() {
        let filter = build_filter(Some("=[broken"), "error");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn default_console_is_stdout() {
        assert_eq!(LogSettings::default().console, ConsoleTarget::Stdout);
    }

    #[test]
    fn creates_log_directory() {
        let dir = std::env::temp_dir().join(format!("poseidon-logs-{}", uuid::Uuid::new_v4()));
        assert!(file_appender(&dir, "poseidon").is_ok());
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
