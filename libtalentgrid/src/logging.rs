//! Log setup shared by the Talentgrid binaries
//!
//! `talent-list` logs to stderr. `talent-tui` owns the terminal, so it logs
//! to a file instead. Format and level come from `TALENTGRID_LOG_FORMAT`
//! and `TALENTGRID_LOG_LEVEL`; `RUST_LOG`, when set, overrides the level.
//!
//! ```no_run
//! use libtalentgrid::logging::{LogFormat, LogSink, LoggingConfig};
//!
//! LoggingConfig::from_env()
//!     .with_format(LogFormat::Json)
//!     .install(LogSink::Stderr)
//!     .expect("a subscriber is already installed");
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::TalentError;

pub const FORMAT_ENV: &str = "TALENTGRID_LOG_FORMAT";
pub const LEVEL_ENV: &str = "TALENTGRID_LOG_LEVEL";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event
    Json,
    /// Multi-line and colored; plain text when writing to a file
    Pretty,
}

impl FromStr for LogFormat {
    type Err = TalentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(TalentError::InvalidInput(format!(
                "Unknown log format '{}'. Valid formats: text, json, pretty",
                s
            ))),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// Truncated on install; missing parent directories are created
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Read format and level from the environment, ignoring bad values
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let format = std::env::var(FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.format);

        let level = std::env::var(LEVEL_ENV)
            .ok()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(defaults.level);

        Self { format, level }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// Fails when the log file cannot be opened or a global subscriber is
    /// already installed.
    pub fn install(&self, sink: LogSink) -> io::Result<()> {
        let (writer, terminal) = match &sink {
            LogSink::Stderr => (BoxMakeWriter::new(io::stderr), true),
            LogSink::File(path) => (BoxMakeWriter::new(Mutex::new(open_truncated(path)?)), false),
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(writer);

        let installed = match self.format {
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(terminal)
                .with_span_list(false)
                .try_init(),
            LogFormat::Pretty if terminal => builder
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Pretty | LogFormat::Text => builder
                .with_ansi(terminal)
                .with_target(!terminal)
                .try_init(),
        };

        installed.map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

fn open_truncated(path: &Path) -> io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}
