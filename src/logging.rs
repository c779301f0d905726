//! Logging
//!
//! Installs the `tracing` subscriber for the `repledger` binary. Everything it
//! reads comes from the `[logging]` section of [`LedgerSettings`], so config
//! files, `REPLEDGER__LOGGING__*` variables and `--log-*` flags all arrive the
//! same way.
//!
//! [`LedgerSettings`]: crate::config::LedgerSettings

use crate::error::SettingsError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "repledger.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
    #[serde(rename = "file+stderr")]
    #[value(name = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    Both,
}

impl LogOutput {
    pub fn writes_stdout(self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both)
    }

    pub fn writes_stderr(self) -> bool {
        matches!(self, LogOutput::Stderr | LogOutput::FileAndStderr | LogOutput::Both)
    }

    pub fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

/// `[logging]` settings section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// Filter directive: a level (`warn`) or a list (`info,sled=warn`)
    pub level: String,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file when output includes a file; None uses the platform state dir
    pub file: Option<PathBuf>,

    /// ANSI colors for text output to a terminal stream
    pub color: bool,

    /// Per-target levels added on top of `level`
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Configured file, else `repledger.log` under the platform state directory
    pub fn log_file_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.file {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => default_log_file_path(),
        }
    }

    fn filter(&self) -> Result<EnvFilter, SettingsError> {
        let mut filter = EnvFilter::try_new(&self.level).map_err(|e| {
            SettingsError::ConfigError(format!("Invalid log level '{}': {}", self.level, e))
        })?;
        for (target, level) in &self.modules {
            let directive = format!("{}={}", target, level);
            filter = filter.add_directive(directive.parse().map_err(|e| {
                SettingsError::ConfigError(format!("Invalid log directive '{}': {}", directive, e))
            })?);
        }
        Ok(filter)
    }

    fn writer(&self) -> Result<BoxMakeWriter, SettingsError> {
        let writer = match self.output {
            LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            LogOutput::File => BoxMakeWriter::new(open_log_file(&self.log_file_path()?)?),
            LogOutput::FileAndStderr => {
                let file = open_log_file(&self.log_file_path()?)?;
                BoxMakeWriter::new(file.and(std::io::stderr))
            }
        };
        Ok(writer)
    }
}

fn default_log_file_path() -> Result<PathBuf, SettingsError> {
    let project_dirs = directories::ProjectDirs::from("", "repledger", "repledger").ok_or_else(|| {
        SettingsError::ConfigError(
            "Could not determine platform state directory for log file".to_string(),
        )
    })?;
    // macOS and Windows have no state dir
    let base = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(base.join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> Result<Arc<File>, SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            SettingsError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            SettingsError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })?;
    Ok(Arc::new(file))
}

/// Install the global subscriber. A disabled config installs nothing.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SettingsError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = config.filter()?;
    let writer = config.writer()?;
    let use_color = config.color && !config.output.writes_file();

    let subscriber = Registry::default().with(filter);
    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);

    match config.format {
        LogFormat::Json => subscriber.with(layer.json()).init(),
        LogFormat::Text => subscriber.with(layer.with_ansi(use_color)).init(),
    }
    Ok(())
}
