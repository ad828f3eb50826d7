//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for Arcade binaries from
//! the `[logging]` config section.
//!
//! Console lines go to stderr so stdout stays free for command output. A
//! configured directory adds a daily rolling file written by a background
//! worker, as plain text or JSON lines. `RUST_LOG` refines the configured
//! level unless explicit directives are set.
//!
//! ## Example
//!
//! ```rust
//! use arcade_domain::config::LoggingConfig;
//! use arcade_logger::Logger;
//!
//! let config = LoggingConfig { level: "debug".to_owned(), ..LoggingConfig::default() };
//! let _logger = Logger::from_config("arcade", &config).unwrap();
//! tracing::debug!("ready");
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use arcade_domain::config::LoggingConfig;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// How file output is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Rolling file output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub dir: PathBuf,
    /// Rotated files kept on disk; older ones are removed.
    pub keep: usize,
    pub format: FileFormat,
}

/// Resolved subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LevelFilter,
    /// Filter directives, e.g. `arcade_icons=debug,reqwest=warn`.
    pub directives: Option<String>,
    pub console: bool,
    pub file: Option<FileOutput>,
}

impl TryFrom<&LoggingConfig> for LogOptions {
    type Error = LoggerError;

    fn try_from(config: &LoggingConfig) -> Result<Self, Self::Error> {
        let level = LevelFilter::from_str(config.level.trim()).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("Unknown log level '{}': {e}", config.level).into(),
                context: Some("logging.level".into()),
            }
        })?;

        let file = config.path.as_ref().map(|dir| FileOutput {
            dir: dir.clone(),
            keep: config.max_files,
            format: if config.json { FileFormat::Json } else { FileFormat::Text },
        });

        Ok(Self { level, directives: config.env_filter.clone(), console: config.console, file })
    }
}

impl LogOptions {
    fn check(&self, name: &str) -> Result<(), LoggerError> {
        if name.trim().is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if !self.console && self.file.is_none() {
            return Err(invalid("No log output enabled; set logging.console or logging.path"));
        }
        if self.file.as_ref().is_some_and(|file| file.keep == 0) {
            return Err(invalid("logging.max_files must be greater than zero"));
        }
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.directives {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid filter directives '{directives}': {e}").into(),
                context: Some("logging.env_filter".into()),
            }),
        }
    }
}

/// The installed subscriber.
///
/// Holds the file worker's guard; buffered file output is flushed when the
/// logger is dropped, so keep it alive until shutdown.
#[must_use = "Dropping the logger stops the file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Installs the global subscriber described by `config`.
    ///
    /// `name` prefixes rolling log files (`<name>.<date>.log`).
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level,
    /// bad filter directives or no enabled output, [`LoggerError::Appender`]
    /// when the log directory cannot be used, and [`LoggerError::Subscriber`]
    /// when a global subscriber is already installed.
    pub fn from_config(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        Self::install(name, &LogOptions::try_from(config)?)
    }

    /// Installs the global subscriber described by `options`.
    ///
    /// # Errors
    /// See [`Logger::from_config`].
    pub fn install(name: &str, options: &LogOptions) -> Result<Self, LoggerError> {
        options.check(name)?;
        let filter = options.env_filter()?;

        let mut layers = Vec::new();
        if options.console {
            layers.push(console_layer());
        }
        let guard = match &options.file {
            Some(file) => {
                let (layer, guard) = file_layer(name, file)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(Self { guard })
    }

    /// Whether file output is active.
    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log file");
        }
    }
}

fn console_layer<S>() -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer().compact().with_writer(std::io::stderr).with_ansi(true).boxed()
}

fn file_layer<S>(name: &str, file: &FileOutput) -> Result<(BoxedLayer<S>, WorkerGuard), LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(&file.dir).context(format!("Creating log directory {}", file.dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(file.keep)
        .build(&file.dir)
        .context(format!("Log directory {}", file.dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = match file.format {
        FileFormat::Text => layer.boxed(),
        FileFormat::Json => layer.json().boxed(),
    };
    Ok((layer, guard))
}

fn invalid(message: &'static str) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}
