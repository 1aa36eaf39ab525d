//! Message codec for state envelopes.
//!
//! The payload on the message channel is the envelope's JSON text. When the
//! payload is embedded in the child document's script it is JSON-encoded once
//! more, producing a quoted string literal that carries its own escaping.

use serde_json::Value;

use crate::MAX_STATE_DEPTH;
use crate::envelope::StateEnvelope;
use crate::error::{ProtocolError, ProtocolResult};

/// Encodes an envelope to the JSON payload posted on the message channel.
///
/// Fails with [`ProtocolError::StateTooDeep`] when the state nests deeper
/// than [`MAX_STATE_DEPTH`], since [`decode`] could not read it back.
///
/// # Example
///
/// ```rust
/// use framehistory_protocol::{StateEnvelope, encode};
/// use serde_json::json;
///
/// let envelope = StateEnvelope::new(json!(null), "Home", false, 42);
/// let payload = encode(&envelope).unwrap();
/// assert!(payload.starts_with(r#"{"reserved":"IFRAME_HISTORY""#));
/// ```
pub fn encode(envelope: &StateEnvelope) -> ProtocolResult<String> {
    let depth = nesting_depth(&envelope.object);
    if depth > MAX_STATE_DEPTH {
        return Err(ProtocolError::StateTooDeep {
            depth,
            limit: MAX_STATE_DEPTH,
        });
    }
    Ok(serde_json::to_string(envelope)?)
}

/// Number of nested arrays/objects in `value`; scalars are 0.
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0)];
    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Array(items) => {
                deepest = deepest.max(depth + 1);
                stack.extend(items.iter().map(|child| (child, depth + 1)));
            }
            Value::Object(map) => {
                deepest = deepest.max(depth + 1);
                stack.extend(map.values().map(|child| (child, depth + 1)));
            }
            _ => {}
        }
    }
    deepest
}

/// Encodes an envelope as a script string literal whose value is the payload.
pub fn encode_script_literal(envelope: &StateEnvelope) -> ProtocolResult<String> {
    script_literal(&encode(envelope)?)
}

/// Quotes `text` as a JSON string literal that is also safe inside an inline
/// `<script>` element.
///
/// Beyond JSON's own escaping, `<`, `>` and `&` become `\u` escapes so a
/// `</script>` in the text cannot close the element, and U+2028/U+2029 are
/// escaped for engines that reject them in string literals.
pub fn script_literal(text: &str) -> ProtocolResult<String> {
    let quoted = serde_json::to_string(text)?;
    let mut out = String::with_capacity(quoted.len());
    for ch in quoted.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    Ok(out)
}

/// Decodes an inbound payload.
///
/// Returns `None` for anything that is not a JSON object carrying a string
/// `reserved` field. The message channel is shared with unrelated code, so
/// malformed input is routine and never an error.
pub fn decode(raw: &str) -> Option<StateEnvelope> {
    let value: Value = serde_json::from_str(raw).ok()?;
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StateEnvelope {
        StateEnvelope::new(
            json!({"count": 1, "tags": ["a", "b"], "nested": {"ok": true}}),
            "Page 1",
            true,
            1_700_000_000_000,
        )
    }

    #[test]
    fn decode_inverts_encode() {
        let envelope = sample();
        let payload = encode(&envelope).unwrap();
        assert_eq!(decode(&payload), Some(envelope));
    }

    #[test]
    fn decode_inverts_encode_for_awkward_titles() {
        for title in [
            "",
            "it's \"quoted\"",
            "</script><script>alert(1)</script>",
            "back\\slash\nnewline",
            "line\u{2028}separator",
            "emoji 🎉 and ünïcödé",
        ] {
            let envelope = StateEnvelope::new(json!([title]), title, false, 7);
            let payload = encode(&envelope).unwrap();
            assert_eq!(decode(&payload), Some(envelope), "title {title:?}");
        }
    }

    #[test]
    fn decode_inverts_encode_for_fractional_numbers() {
        for scroll in [
            923.8829120510785,
            124.39865742652701,
            0.1 + 0.2,
            -0.000_001_234_567_890_123,
            1.7976931348623157e308,
            5e-324,
        ] {
            let envelope = StateEnvelope::new(json!({"scroll": scroll}), "Doc", false, 1);
            let decoded = decode(&encode(&envelope).unwrap()).unwrap();
            assert_eq!(decoded.object["scroll"].as_f64(), Some(scroll));
            assert_eq!(decoded, envelope);
        }
    }

    fn nested(depth: usize) -> Value {
        (0..depth).fold(json!(1), |inner, _| json!([inner]))
    }

    #[test]
    fn nesting_depth_counts_containers() {
        assert_eq!(nesting_depth(&json!(1)), 0);
        assert_eq!(nesting_depth(&json!([])), 1);
        assert_eq!(nesting_depth(&json!({"a": [1, {"b": []}], "c": 2})), 3);
        assert_eq!(nesting_depth(&nested(40)), 40);
    }

    #[test]
    fn decode_inverts_encode_at_depth_limit() {
        let envelope = StateEnvelope::new(nested(MAX_STATE_DEPTH), "Deep", true, 1);
        let payload = encode(&envelope).unwrap();
        assert_eq!(decode(&payload), Some(envelope));
    }

    #[test]
    fn encode_rejects_states_decode_cannot_read() {
        for depth in [MAX_STATE_DEPTH + 1, 200] {
            let envelope = StateEnvelope::new(nested(depth), "Deep", true, 1);
            match encode(&envelope) {
                Err(ProtocolError::StateTooDeep { depth: found, limit }) => {
                    assert_eq!(found, depth);
                    assert_eq!(limit, MAX_STATE_DEPTH);
                }
                other => panic!("expected StateTooDeep, got {other:?}"),
            }
        }
    }

    #[test]
    fn script_literal_unquotes_to_payload() {
        let envelope = sample();
        let literal = encode_script_literal(&envelope).unwrap();
        assert!(literal.starts_with('"') && literal.ends_with('"'));

        let payload: String = serde_json::from_str(&literal).unwrap();
        assert_eq!(payload, encode(&envelope).unwrap());
    }

    #[test]
    fn script_literal_has_no_bare_quotes_inside() {
        let literal = script_literal(r#"{"title":"it's"}"#).unwrap();
        let inner = &literal[1..literal.len() - 1];
        let bare_quotes = inner
            .char_indices()
            .filter(|(i, c)| *c == '"' && !inner[..*i].ends_with('\\'))
            .count();
        assert_eq!(bare_quotes, 0);
    }

    #[test]
    fn script_literal_cannot_close_script_element() {
        let literal = script_literal("</script><b>&amp;").unwrap();
        assert!(!literal.contains('<'));
        assert!(!literal.contains('>'));
        assert!(!literal.contains('&'));

        let back: String = serde_json::from_str(&literal).unwrap();
        assert_eq!(back, "</script><b>&amp;");
    }

    #[test]
    fn script_literal_escapes_line_separators() {
        let literal = script_literal("a\u{2028}b\u{2029}c").unwrap();
        assert_eq!(literal, r#""a\u2028b\u2029c""#);
    }

    #[test]
    fn decode_ignores_non_json() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("hello"), None);
        assert_eq!(decode("{not json"), None);
        assert_eq!(decode("[object Object]"), None);
    }

    #[test]
    fn decode_ignores_json_without_tag() {
        assert_eq!(decode("null"), None);
        assert_eq!(decode("42"), None);
        assert_eq!(decode(r#""IFRAME_HISTORY""#), None);
        assert_eq!(decode(r#"{"type":"webpackOk"}"#), None);
        assert_eq!(decode(r#"{"reserved":17}"#), None);
    }

    #[test]
    fn decode_keeps_foreign_tags() {
        // Tag matching is the listener's job.
        let decoded = decode(r#"{"reserved":"SOMETHING_ELSE","force":true}"#).unwrap();
        assert_eq!(decoded.reserved, "SOMETHING_ELSE");
        assert!(decoded.force);
    }
}
