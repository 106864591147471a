// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Global subscriber installation.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Initialize tracing with a format and an optional filter directive.
///
/// # Example
///
/// ```no_run
/// use lfsfetch_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Compact, Some("info")).unwrap();
/// tracing::info!("ready");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(&config)
}

/// Initialize tracing from a full [`LogConfig`].
///
/// Fails with [`LogError::AlreadyInitialized`] if a global subscriber exists.
pub fn init_tracing_with_config(config: &LogConfig) -> Result<(), LogError> {
    let filter = build_env_filter(config)?;
    let layer = build_layer(config);

    Registry::default()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))
}

fn build_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = fmt::layer()
        .with_writer(make_writer(config.output))
        .with_target(config.include_targets)
        .with_ansi(config.use_color && config.format != LogFormat::Json);

    match (config.format, config.use_timestamps) {
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
    }
}

fn make_writer(output: LogOutput) -> BoxMakeWriter {
    match output {
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
    }
}

fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let directive = config.effective_level();

    EnvFilter::try_new(&directive).map_err(|e| LogError::InvalidFilter {
        filter: directive.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Installing the global subscriber is a one-shot per process, so only the
    // filter construction is exercised here.

    #[test]
    fn test_env_filter_accepts_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(build_env_filter(&LogConfig::new().with_level(level)).is_ok());
        }
    }

    #[test]
    fn test_env_filter_accepts_target_directives() {
        let config = LogConfig::new().with_level("warn,lfsfetch_git=debug");
        assert!(build_env_filter(&config).is_ok());
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        let config = LogConfig::new().with_level("lfsfetch_git=notalevel");
        assert!(matches!(
            build_env_filter(&config),
            Err(LogError::InvalidFilter { .. })
        ));
    }
}
