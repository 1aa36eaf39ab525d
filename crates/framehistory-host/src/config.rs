//! Frame history configuration.
//!
//! Every field has a protocol default, so an empty TOML file is valid:
//!
//! ```toml
//! stale_threshold_ms = 200
//! reserved_tag = "IFRAME_HISTORY"
//! strategy = "auto"          # or "legacy" / "standard"
//! target_origin = "https://app.example"
//! ```

use std::path::Path;

use framehistory_protocol::{DEFAULT_STALE_THRESHOLD_MS, RESERVED_TAG};
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, LoadStrategy};
use crate::error::{HostError, HostResult};

/// How the frame loader strategy is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyPreference {
    /// Detect the engine from the user agent.
    #[default]
    Auto,
    /// Always write the document directly.
    Legacy,
    /// Always navigate to a `data:` URL.
    Standard,
}

impl StrategyPreference {
    /// Resolves the preference against a user agent string.
    pub fn resolve(self, user_agent: &str) -> LoadStrategy {
        match self {
            Self::Auto => Engine::detect(user_agent).load_strategy(),
            Self::Legacy => LoadStrategy::DocumentWrite,
            Self::Standard => LoadStrategy::DataUrl,
        }
    }
}

/// Frame history configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Unforced envelopes must be strictly older than this to be delivered.
    pub stale_threshold_ms: u64,

    /// Marker identifying this protocol's messages.
    pub reserved_tag: String,

    /// Frame loading strategy.
    pub strategy: StrategyPreference,

    /// Origin the child posts to; defaults to the hosting page's origin.
    pub target_origin: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            stale_threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
            reserved_tag: RESERVED_TAG.to_string(),
            strategy: StrategyPreference::Auto,
            target_origin: None,
        }
    }
}

impl HistoryConfig {
    /// Parses a configuration from TOML.
    pub fn from_toml_str(content: &str) -> HostResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| HostError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> HostResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> HostResult<()> {
        if self.reserved_tag.is_empty() {
            return Err(HostError::config("reserved_tag must not be empty"));
        }
        if let Some(origin) = &self.target_origin {
            framehistory_protocol::TargetOrigin::parse(origin)?;
        }
        Ok(())
    }

    /// Builder: set the staleness threshold in milliseconds.
    pub fn with_stale_threshold_ms(mut self, millis: u64) -> Self {
        self.stale_threshold_ms = millis;
        self
    }

    /// Builder: set the reserved tag.
    pub fn with_reserved_tag(mut self, tag: impl Into<String>) -> Self {
        self.reserved_tag = tag.into();
        self
    }

    /// Builder: set the strategy preference.
    pub fn with_strategy(mut self, strategy: StrategyPreference) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder: set the target origin.
    pub fn with_target_origin(mut self, origin: impl Into<String>) -> Self {
        self.target_origin = Some(origin.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = HistoryConfig::default();
        assert_eq!(config.stale_threshold_ms, 200);
        assert_eq!(config.reserved_tag, "IFRAME_HISTORY");
        assert_eq!(config.strategy, StrategyPreference::Auto);
        assert!(config.target_origin.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = HistoryConfig::default()
            .with_stale_threshold_ms(500)
            .with_reserved_tag("MY_APP")
            .with_strategy(StrategyPreference::Legacy)
            .with_target_origin("https://app.example");

        assert_eq!(config.stale_threshold_ms, 500);
        assert_eq!(config.reserved_tag, "MY_APP");
        assert_eq!(config.strategy, StrategyPreference::Legacy);
        assert_eq!(config.target_origin.as_deref(), Some("https://app.example"));
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = HistoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, HistoryConfig::default());
    }

    #[test]
    fn toml_overrides_fields() {
        let config = HistoryConfig::from_toml_str(
            r#"
stale_threshold_ms = 50
strategy = "standard"
target_origin = "http://localhost:8080"
"#,
        )
        .unwrap();
        assert_eq!(config.stale_threshold_ms, 50);
        assert_eq!(config.strategy, StrategyPreference::Standard);
        assert_eq!(config.reserved_tag, "IFRAME_HISTORY");
        assert_eq!(config.target_origin.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let result = HistoryConfig::from_toml_str("strategy = \"sideways\"");
        assert!(matches!(result, Err(HostError::Config { .. })));
    }

    #[test]
    fn empty_tag_is_rejected() {
        let result = HistoryConfig::from_toml_str("reserved_tag = \"\"");
        assert!(matches!(result, Err(HostError::Config { .. })));
    }

    #[test]
    fn bad_origin_is_rejected() {
        let result = HistoryConfig::default()
            .with_target_origin("not an origin")
            .validate();
        assert!(matches!(result, Err(HostError::Protocol(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("framehistory.toml");
        std::fs::write(&path, "reserved_tag = \"OTHER\"\n").unwrap();

        let config = HistoryConfig::load_from(&path).unwrap();
        assert_eq!(config.reserved_tag, "OTHER");
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let result = HistoryConfig::load_from("/nonexistent/framehistory.toml");
        assert!(matches!(result, Err(HostError::Io(_))));
    }

    #[test]
    fn preference_resolution() {
        let ie = "Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko";
        let firefox = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

        assert_eq!(StrategyPreference::Auto.resolve(ie), LoadStrategy::DocumentWrite);
        assert_eq!(StrategyPreference::Auto.resolve(firefox), LoadStrategy::DataUrl);
        assert_eq!(StrategyPreference::Standard.resolve(ie), LoadStrategy::DataUrl);
        assert_eq!(StrategyPreference::Legacy.resolve(firefox), LoadStrategy::DocumentWrite);
    }
}
