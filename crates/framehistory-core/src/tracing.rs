//! Tracing setup for framehistory
//!
//! Provides unified logging and tracing configuration for the host runtime
//! and the command-line tools.
//!
//! # Usage
//!
//! For CLI applications:
//! ```ignore
//! use framehistory_core::tracing::{TracingConfig, init_tracing};
//!
//! init_tracing(TracingConfig::default()).expect("failed to initialize tracing");
//! ```
//!
//! For machine-readable output (e.g. when a harness collects logs):
//! ```ignore
//! use framehistory_core::tracing::{TracingConfig, TracingOutputFormat, init_tracing};
//!
//! init_tracing(TracingConfig::default().with_format(TracingOutputFormat::Json))
//!     .expect("failed to initialize tracing");
//! ```

use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::Layered, prelude::*};

const CRATE_TARGETS: &[&str] = &[
    "framehistory_core",
    "framehistory_protocol",
    "framehistory_host",
    "framehistory_web",
    "framehistory_cli",
];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Human-readable pretty format (default)
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format, one object per event
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when RUST_LOG is not set
    pub default_level: Level,
    /// Output format for log messages
    pub output_format: TracingOutputFormat,
    /// Whether to include file/line information in logs
    pub include_location: bool,
    /// Whether to include target (module path) in logs
    pub include_target: bool,
    /// Whether to include timestamps
    pub include_timestamp: bool,
    /// Custom env filter directive (overrides default_level if set)
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Pretty,
            include_location: false,
            include_target: true,
            include_timestamp: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Create a config suitable for CLI usage with debug mode
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            include_target: true,
            include_timestamp: false,
            env_filter: None,
        }
    }

    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set a custom env filter directive
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Directive used when neither `RUST_LOG` nor a custom filter is set.
    ///
    /// Every `framehistory_*` crate logs under its own target, so the default
    /// directive names each of them.
    pub fn default_directive(&self) -> String {
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.default_level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Builds the subscriber described by `config` without installing it.
///
/// # Errors
///
/// Returns an error if the custom env filter directive is invalid.
pub fn build_subscriber(
    config: &TracingConfig,
) -> Result<impl Subscriber + Send + Sync + 'static, TracingError> {
    let env_filter = match config.env_filter {
        Some(ref filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.default_directive())),
    };

    // Logs go to stderr; stdout belongs to command output.
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target);
    let layer: Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync> =
        match (config.output_format, config.include_timestamp) {
            (TracingOutputFormat::Pretty, _) => layer.pretty().boxed(),
            (TracingOutputFormat::Compact, true) => layer.compact().boxed(),
            (TracingOutputFormat::Compact, false) => layer.compact().without_time().boxed(),
            (TracingOutputFormat::Json, _) => layer.json().boxed(),
        };

    Ok(tracing_subscriber::registry().with(env_filter).with(layer))
}

/// Initialize tracing with the given configuration.
///
/// Call once at the start of the application. `RUST_LOG` overrides the
/// default level unless a custom filter is configured.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the env filter directive is invalid.
///
/// # Example
///
/// ```ignore
/// use framehistory_core::tracing::{TracingConfig, TracingOutputFormat, init_tracing};
///
/// init_tracing(TracingConfig::cli_debug().with_format(TracingOutputFormat::Json))?;
/// ```
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    tracing::subscriber::set_global_default(build_subscriber(&config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert_eq!(config.output_format, TracingOutputFormat::Pretty);
        assert!(!config.include_location);
        assert!(config.include_target);
        assert!(config.include_timestamp);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_cli_debug_config() {
        let config = TracingConfig::cli_debug();
        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.output_format, TracingOutputFormat::Compact);
        assert!(config.include_location);
    }

    #[test]
    fn test_default_directive_covers_all_crates() {
        let directive = TracingConfig::default().with_level(Level::DEBUG).default_directive();
        assert!(directive.contains("framehistory_host=DEBUG"));
        assert!(directive.contains("framehistory_protocol=DEBUG"));
        assert_eq!(directive.split(',').count(), CRATE_TARGETS.len());
    }

    #[test]
    fn test_builder_methods() {
        let config = TracingConfig::default()
            .with_level(Level::WARN)
            .with_format(TracingOutputFormat::Json)
            .with_env_filter("framehistory_host=trace");

        assert_eq!(config.default_level, Level::WARN);
        assert_eq!(config.output_format, TracingOutputFormat::Json);
        assert_eq!(config.env_filter, Some("framehistory_host=trace".to_string()));
    }

    #[test]
    fn every_format_builds_a_working_subscriber() {
        for format in [
            TracingOutputFormat::Pretty,
            TracingOutputFormat::Compact,
            TracingOutputFormat::Json,
        ] {
            for include_timestamp in [true, false] {
                let mut config = TracingConfig::cli_debug().with_format(format);
                config.include_timestamp = include_timestamp;
                let subscriber = build_subscriber(&config).unwrap();
                tracing::subscriber::with_default(subscriber, || {
                    tracing::debug!(target: "framehistory_core", ?format, "Subscriber ready");
                });
            }
        }
    }

    #[test]
    fn invalid_custom_filter_is_rejected() {
        let config = TracingConfig::default().with_env_filter("framehistory_host=notalevel");
        assert!(matches!(
            build_subscriber(&config),
            Err(TracingError::EnvFilter(_))
        ));
    }
}
