//! # Logger
//!
//! Tracing subscriber setup for the Dormant binaries.
//!
//! Console output is either compact, pretty, or JSON lines. An optional rolling file
//! sink writes through a non-blocking worker; keep the returned [`Logger`] alive for
//! the lifetime of the process so buffered lines are flushed on shutdown.
//!
//! `RUST_LOG` always wins over the programmatic level and filter.
//!
//! ## Example
//!
//! ```rust
//! # use dormant_logger::{LevelFilter, LogFormat, Logger};
//! let _logger = Logger::builder()
//!     .name("dormant")
//!     .format(LogFormat::Compact)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console rendering style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(LoggerError::InvalidConfiguration {
                message: format!("Unknown log format '{other}'").into(),
                context: Some("expected compact, pretty or json".into()),
            }),
        }
    }
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    format: LogFormat,
    level: LevelFilter,
    env_filter: Option<String>,
    directory: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            format: LogFormat::default(),
            level: LevelFilter::INFO,
            env_filter: None,
            directory: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// Typestate builder for the global subscriber: a name is mandatory, file-only knobs
/// become available once a directory is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    _file: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the logger; the name also prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { config: self.config, name: WithName(name.into()), _file: PhantomData }
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    #[must_use]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Programmatic directive list such as `dormant_scanner=debug,hyper=info`.
    ///
    /// An invalid directive makes [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables the rolling file sink in `directory`.
    pub fn directory(self, directory: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.directory = Some(directory.into());
        LoggerBuilder { config, name: self.name, _file: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    /// * [`LoggerError::Subscriber`] if a global subscriber is already set.
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero retained files,
    ///   a bad filter, or no enabled sink.
    /// * [`LoggerError::Appender`] if the rolling file appender cannot be created.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let LoggerBuilder { config, name: WithName(name), .. } = self;
        validate(&config, &name)?;

        let filter = env_filter(&config)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if config.console {
            layers.push(console_layer(config.format));
        }

        let guard = match &config.directory {
            Some(directory) => {
                let (file_layer, guard) = file_layer(&config, &name, directory)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging sink enabled".into(),
                context: Some("enable console output or set a log directory".into()),
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;

        Ok(Logger { guard })
    }
}

impl LoggerBuilder<WithName, WithFile> {
    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }
}

/// Handle to the installed subscriber. Dropping it flushes and stops the file worker.
#[must_use = "Dropping this handle stops the background log writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, _file: PhantomData }
    }

    /// Returns `true` when a rolling file sink is active.
    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers");
        }
    }
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => layer().compact().with_ansi(true).boxed(),
        LogFormat::Pretty => layer().pretty().with_ansi(true).boxed(),
        LogFormat::Json => layer().json().with_ansi(false).boxed(),
    }
}

fn file_layer(
    config: &LoggerConfig,
    name: &str,
    directory: &Path,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create log directory {}", directory.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(directory)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let base = layer().with_writer(writer).with_ansi(false);
    let boxed = if config.format == LogFormat::Json { base.json().boxed() } else { base.boxed() };

    Ok((boxed, guard))
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }
    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok().filter(|v| !v.trim().is_empty());
    build_filter(config, from_env.as_deref())
}

/// `from_env` replaces the programmatic directives; the programmatic list is still
/// checked so a broken config fails regardless of the environment.
fn build_filter(config: &LoggerConfig, from_env: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    let programmatic = match &config.env_filter {
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        })?,
        None => builder.parse_lossy(""),
    };

    Ok(match from_env {
        Some(directives) => builder.parse_lossy(directives),
        None => programmatic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    fn filter_config(level: LevelFilter, filter: Option<&str>) -> LoggerConfig {
        LoggerConfig { level, env_filter: filter.map(str::to_owned), ..LoggerConfig::default() }
    }

    #[test]
    fn rust_log_overrides_programmatic_filter() {
        let config = filter_config(LevelFilter::ERROR, Some("dormant=debug"));

        let programmatic = build_filter(&config, None).unwrap();
        assert_eq!(programmatic.max_level_hint(), Some(LevelFilter::DEBUG));

        let overridden = build_filter(&config, Some("dormant=warn")).unwrap();
        assert_eq!(overridden.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn invalid_programmatic_filter_fails_even_with_rust_log() {
        let config = filter_config(LevelFilter::INFO, Some("dormant=loud"));

        assert!(build_filter(&config, None).is_err());
        assert!(build_filter(&config, Some("info")).is_err());
    }

    #[test]
    fn builder_keeps_programmatic_settings() {
        let builder = Logger::builder()
            .name("dormant-test")
            .format(LogFormat::Json)
            .env_filter("dormant=debug")
            .directory("logs")
            .max_files(3);

        assert_eq!(builder.config.format, LogFormat::Json);
        assert_eq!(builder.config.max_files, 3);
        assert_eq!(builder.config.env_filter.as_deref(), Some("dormant=debug"));
        assert_eq!(builder.config.directory.as_deref(), Some(std::path::Path::new("logs")));
    }

    #[test]
    #[serial]
    fn rejects_empty_name_before_touching_global_state() {
        let err = Logger::builder().name("  ").init().expect_err("empty name must fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn rejects_invalid_filter() {
        let err = Logger::builder()
            .name("dormant-test")
            .env_filter("dormant=loudest")
            .init()
            .expect_err("bad filter must fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn rejects_configuration_without_sinks() {
        let err = Logger::builder()
            .name("dormant-test")
            .console(false)
            .init()
            .expect_err("no sink must fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
