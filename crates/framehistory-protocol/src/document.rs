//! Child document synthesis.
//!
//! The synthesized document has no behavior besides one inline statement that
//! posts the encoded envelope to its parent as soon as it loads:
//!
//! ```text
//! <!DOCTYPE html><html><head><title>{escaped title}</title>
//! <script>window.parent.postMessage({payload literal}, {origin literal});</script>
//! </head><body></body></html>
//! ```
//!
//! (shown wrapped; the generated document is a single line).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use framehistory_core::html_escape;

use crate::codec::{encode_script_literal, script_literal};
use crate::envelope::StateEnvelope;
use crate::error::{ProtocolError, ProtocolResult};
use crate::origin::TargetOrigin;

/// Prefix of the `data:` URLs produced by [`encode_data_url`].
pub const DATA_URL_PREFIX: &str = "data:text/html;charset=UTF-8;base64,";

const POST_CALL: &str = "window.parent.postMessage(";
const POST_END: &str = ");";
const SCRIPT_OPEN: &str = "<script>";
const SCRIPT_CLOSE: &str = "</script>";

/// Builds the self-posting HTML document for `envelope`.
///
/// The title is HTML-escaped; the payload and origin are script-safe string
/// literals, so no title can inject markup or break out of the script.
pub fn synthesize(envelope: &StateEnvelope, target_origin: &TargetOrigin) -> ProtocolResult<String> {
    let payload = encode_script_literal(envelope)?;
    let origin = script_literal(target_origin.as_str())?;
    Ok(format!(
        "<!DOCTYPE html><html><head><title>{title}</title>\
         {SCRIPT_OPEN}{POST_CALL}{payload}, {origin}{POST_END}{SCRIPT_CLOSE}\
         </head><body></body></html>",
        title = html_escape(&envelope.title),
    ))
}

/// Wraps a document in a base64 `data:` URL.
///
/// The document is encoded as UTF-8 bytes, matching the declared charset.
pub fn encode_data_url(source: &str) -> String {
    format!("{DATA_URL_PREFIX}{}", STANDARD.encode(source.as_bytes()))
}

/// Recovers the document from a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> ProtocolResult<String> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ProtocolError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| ProtocolError::InvalidDataUrl("missing ',' separator".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(ProtocolError::InvalidDataUrl(
            "only base64 payloads are supported".to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| ProtocolError::InvalidDataUrl(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ProtocolError::InvalidDataUrl(e.to_string()))
}

/// What a synthesized document does when it runs: post `payload` to the
/// parent window, restricted to `target_origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDocument {
    /// The message posted to the parent (the envelope's JSON text).
    pub payload: String,
    /// The origin the message is restricted to.
    pub target_origin: String,
}

impl ChildDocument {
    /// Extracts the self-post from a document produced by [`synthesize`].
    pub fn parse(source: &str) -> ProtocolResult<Self> {
        let start = source
            .find(SCRIPT_OPEN)
            .ok_or_else(|| ProtocolError::malformed("no <script> element"))?
            + SCRIPT_OPEN.len();
        let len = source[start..]
            .find(SCRIPT_CLOSE)
            .ok_or_else(|| ProtocolError::malformed("unterminated <script> element"))?;
        let statement = source[start..start + len].trim();

        let args = statement
            .strip_prefix(POST_CALL)
            .and_then(|rest| rest.strip_suffix(POST_END))
            .ok_or_else(|| ProtocolError::malformed("script is not a single postMessage call"))?;

        // Both arguments are JSON string literals, so the argument list is
        // the body of a JSON array.
        let mut parts: Vec<String> = serde_json::from_str(&format!("[{args}]"))
            .map_err(|e| ProtocolError::malformed(format!("bad postMessage arguments: {e}")))?;
        if parts.len() != 2 {
            return Err(ProtocolError::malformed(format!(
                "postMessage takes 2 arguments, found {}",
                parts.len()
            )));
        }

        let target_origin = parts.pop().unwrap_or_default();
        let payload = parts.pop().unwrap_or_default();
        Ok(Self {
            payload,
            target_origin,
        })
    }

    /// Like [`ChildDocument::parse`], but also accepts a `data:` URL.
    pub fn parse_any(document_or_url: &str) -> ProtocolResult<Self> {
        if document_or_url.starts_with("data:") {
            Self::parse(&decode_data_url(document_or_url)?)
        } else {
            Self::parse(document_or_url)
        }
    }
}
