// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Logging configuration: output format, level resolution and destination.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "LFSFETCH_LOG";

/// Level used when neither the caller nor the environment sets one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Errors that can occur while configuring logging
#[derive(Error, Debug)]
pub enum LogError {
    /// Unknown `--log-format` value
    #[error("unknown log format '{0}', expected one of: pretty, compact, json")]
    UnknownFormat(String),

    /// The level string could not be parsed as an `EnvFilter` directive
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directive
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber was already installed
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Output format for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,

    /// Single-line output, the default for the CLI
    #[default]
    Compact,

    /// Newline-delimited JSON
    Json,
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LogError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// Standard error; keeps stdout free for command output
    #[default]
    Stderr,

    /// Standard output
    Stdout,
}

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format
    pub format: LogFormat,

    /// Explicit filter directive (e.g. "debug", "lfsfetch_git=trace").
    /// When `None` the environment decides, see [`LogConfig::effective_level`].
    pub level: Option<String>,

    /// ANSI colors
    pub use_color: bool,

    /// Include timestamps
    pub use_timestamps: bool,

    /// Include the emitting module path
    pub include_targets: bool,

    /// Where log lines go
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::default(),
            level: None,
            use_color: true,
            use_timestamps: false,
            include_targets: false,
            output: LogOutput::default(),
        }
    }
}

impl LogConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set an explicit filter directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enable or disable color output
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Enable or disable timestamps
    pub fn with_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    /// Enable or disable target module names
    pub fn with_targets(mut self, include_targets: bool) -> Self {
        self.include_targets = include_targets;
        self
    }

    /// Set the output destination
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Resolve the filter directive.
    ///
    /// Order: explicit level, `LFSFETCH_LOG`, `RUST_LOG`, then [`DEFAULT_LEVEL`].
    /// Empty environment values are ignored.
    pub fn effective_level(&self) -> String {
        self.level
            .clone()
            .or_else(|| non_empty_env(LOG_ENV_VAR))
            .or_else(|| non_empty_env("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
