//! The state envelope carried across the document boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::RESERVED_TAG;

/// Tagged, timestamped wrapper around an opaque application state.
///
/// Only `reserved` is required when decoding: anything without it cannot be
/// one of ours. The remaining fields fall back to their defaults when absent
/// or `null`, so a sparse-but-tagged message still updates the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEnvelope {
    /// Protocol marker, [`RESERVED_TAG`] for envelopes we produce.
    pub reserved: String,
    /// Bypasses the staleness filter when set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub force: bool,
    /// Wall-clock milliseconds at encode time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    /// Title for both the child document and, on receipt, the parent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// The application state. Never inspected.
    #[serde(default)]
    pub object: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl StateEnvelope {
    /// Creates an envelope tagged with [`RESERVED_TAG`].
    pub fn new(object: Value, title: impl Into<String>, force: bool, timestamp: i64) -> Self {
        Self {
            reserved: RESERVED_TAG.to_string(),
            force,
            timestamp,
            title: title.into(),
            object,
        }
    }

    /// Builder: replace the protocol marker.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.reserved = tag.into();
        self
    }

    /// Returns `true` if the envelope carries exactly `tag`.
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.reserved == tag
    }

    /// Milliseconds elapsed between encoding and `now`.
    ///
    /// Negative when the sender's clock is ahead of ours.
    pub fn age_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    /// Staleness filter: forced envelopes always pass, others only once they
    /// are strictly older than `threshold_ms`.
    pub fn passes_staleness(&self, now: i64, threshold_ms: u64) -> bool {
        self.force || i128::from(self.age_ms(now)) > i128::from(threshold_ms)
    }
}
