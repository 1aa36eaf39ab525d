//! Wire protocol for smuggling application state through a child frame.
//!
//! A state snapshot is wrapped in a [`StateEnvelope`], serialized into a
//! self-posting HTML document, and comes back to the parent window as a
//! cross-document message.
//!
//! # Wire Format
//!
//! The message posted by the child is a JSON string:
//!
//! ```text
//! { "reserved": "IFRAME_HISTORY", "force": bool, "timestamp": ms, "title": string, "object": any }
//! ```
//!
//! Inside the generated script that string is JSON-encoded a second time, so
//! the script carries a single quoted literal whose escaping is handled by the
//! encoder rather than by the caller.
//!
//! # Example
//!
//! ```rust
//! use framehistory_protocol::{StateEnvelope, TargetOrigin, decode, encode, synthesize};
//! use serde_json::json;
//!
//! let envelope = StateEnvelope::new(json!({"count": 1}), "Page 1", true, 1_700_000_000_000);
//! let payload = encode(&envelope).unwrap();
//! assert_eq!(decode(&payload), Some(envelope.clone()));
//!
//! let origin = TargetOrigin::parse("https://app.example").unwrap();
//! let document = synthesize(&envelope, &origin).unwrap();
//! assert!(document.contains("<title>Page 1</title>"));
//! ```

mod codec;
mod document;
mod envelope;
mod error;
mod origin;

pub use codec::{decode, encode, encode_script_literal, script_literal};
pub use document::{
    ChildDocument, DATA_URL_PREFIX, decode_data_url, encode_data_url, synthesize,
};
pub use envelope::StateEnvelope;
pub use error::{ProtocolError, ProtocolResult};
pub use origin::TargetOrigin;

/// Marker carried by every envelope of this protocol.
pub const RESERVED_TAG: &str = "IFRAME_HISTORY";

/// Deepest array/object nesting allowed in a state.
///
/// The decoder follows at most 127 nested containers and the envelope itself
/// is one of them.
pub const MAX_STATE_DEPTH: usize = 126;

/// Envelopes younger than this are not delivered unless forced.
pub const DEFAULT_STALE_THRESHOLD_MS: u64 = 200;
