//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use framehistory_core::{TracingConfig, TracingOutputFormat};
use framehistory_host::{HistoryConfig, StrategyPreference};
use tracing::Level;

use crate::error::{CliError, CliResult};

/// framehistory - inspect and exercise iframe-backed history
#[derive(Debug, Parser)]
#[command(name = "framehistory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "FRAMEHISTORY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    // --- Config overrides ---
    /// Reserved tag identifying our envelopes
    #[arg(long, global = true)]
    pub tag: Option<String>,

    /// Age in milliseconds under which unforced states are dropped
    #[arg(long, global = true)]
    pub stale_threshold_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Tracing setup for the `--debug` and `--log-format` flags.
    pub fn tracing_config(&self) -> TracingConfig {
        let level = if self.debug { Level::DEBUG } else { Level::WARN };
        TracingConfig::cli_debug()
            .with_level(level)
            .with_format(self.log_format.into())
    }

    /// Loads the configuration file, if any, and applies the overrides.
    pub fn load_config(&self) -> CliResult<HistoryConfig> {
        let config = match self.config {
            Some(ref path) => {
                HistoryConfig::load_from(path).map_err(|e| CliError::Config(e.to_string()))?
            }
            None => HistoryConfig::default(),
        };
        Ok(self.apply_overrides(config))
    }

    /// Applies command-line overrides on top of `config`.
    pub fn apply_overrides(&self, mut config: HistoryConfig) -> HistoryConfig {
        if let Some(ref tag) = self.tag {
            config = config.with_reserved_tag(tag.clone());
        }
        if let Some(millis) = self.stale_threshold_ms {
            config = config.with_stale_threshold_ms(millis);
        }
        config
    }
}

/// Log output format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One line per event
    Compact,
    /// JSON lines
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => TracingOutputFormat::Pretty,
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

/// Frame loading strategy selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// document.open / write / close
    Legacy,
    /// base64 data: URL navigation
    Standard,
}

impl From<StrategyArg> for StrategyPreference {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Legacy => StrategyPreference::Legacy,
            StrategyArg::Standard => StrategyPreference::Standard,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the child document for a state
    Synthesize {
        /// Document title
        #[arg(long, default_value = "")]
        title: String,

        /// Application state as JSON
        #[arg(long, default_value = "null")]
        state: String,

        /// Deliver even when fresh
        #[arg(long)]
        force: bool,

        /// Origin the child document posts to
        #[arg(long)]
        origin: Option<String>,

        /// Loading strategy (defaults to the configured one)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// User agent used when the strategy is detected
        #[arg(long)]
        user_agent: Option<String>,

        /// Envelope timestamp in epoch milliseconds (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,
    },

    /// Decode a message payload as the listener would
    Decode {
        /// Raw message data, or `-` to read stdin
        payload: String,
    },

    /// Show what a child document posts
    Inspect {
        /// Document source, data: URL, or `-` to read stdin
        document: String,
    },

    /// Run a push / load / receive round trip in a headless window
    Simulate {
        /// Document title
        #[arg(long, default_value = "")]
        title: String,

        /// Application state as JSON
        #[arg(long, default_value = "null")]
        state: String,

        /// Deliver even when fresh
        #[arg(long)]
        force: bool,

        /// Location of the headless window
        #[arg(long, default_value = "https://app.example")]
        location: String,

        /// Re-run the child this many milliseconds later, as a back navigation would
        #[arg(long)]
        revisit_after_ms: Option<i64>,
    },
}
