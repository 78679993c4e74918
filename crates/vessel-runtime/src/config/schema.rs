//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vessel_core::ResolverOptions;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VesselConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extractor resolution switches.
    #[serde(default)]
    pub resolution: ResolverOptions,

    /// Defaults applied to cascading builders created by the runtime.
    #[serde(default)]
    pub cascading: CascadingConfig,

    /// Built-in extractor selection.
    #[serde(default)]
    pub extractors: ExtractorsConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `Full` otherwise.
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Requires `logging.file_path`.
    File,
}

/// Time-based rollover of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Minutely,
    Hourly,
    Daily,
}

/// Span lifecycle events to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level.
    pub level: LogLevel,

    pub format: LogFormat,

    pub output: LogOutput,

    pub span_events: SpanEventConfig,

    /// Include thread ids in log lines.
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    pub file_location: bool,

    /// Log file for [`LogOutput::File`].
    pub file_path: Option<PathBuf>,

    /// How often the log file is rolled over.
    pub rotation: LogRotation,

    /// Number of rolled log files to keep.
    pub max_files: u32,

    /// Per-module levels, e.g. `vessel_core::resolver = "trace"`.
    pub filters: BTreeMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            rotation: LogRotation::Never,
            max_files: 5,
            filters: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Cascading & Extractors
// =============================================================================

/// Defaults for cascading builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadingConfig {
    /// Cascading roots declared as `Map`, `List`, `Iterable`, `Optional` or
    /// an array implicitly cascade into their elements.
    pub legacy_container_cascading: bool,
}

impl Default for CascadingConfig {
    fn default() -> Self {
        Self {
            legacy_container_cascading: true,
        }
    }
}

/// Built-in extractor selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractorsConfig {
    /// Names of built-in extractors left out of the registry.
    pub disabled: Vec<String>,
}
