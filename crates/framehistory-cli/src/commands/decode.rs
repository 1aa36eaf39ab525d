//! `framehistory decode`

use std::io::Write;

use framehistory_host::HistoryConfig;
use framehistory_protocol::decode;

use crate::error::CliResult;

/// Reports what the listener would do with `payload` at time `now`.
pub fn run(config: &HistoryConfig, payload: &str, now: i64, out: &mut impl Write) -> CliResult<()> {
    let Some(envelope) = decode(payload) else {
        writeln!(out, "ignored: not a state envelope")?;
        return Ok(());
    };
    if !envelope.is_tagged(&config.reserved_tag) {
        writeln!(
            out,
            "ignored: tag {:?} does not match {:?}",
            envelope.reserved, config.reserved_tag
        )?;
        return Ok(());
    }

    writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;
    writeln!(out, "title: applied ({:?})", envelope.title)?;

    let age_ms = envelope.age_ms(now);
    if envelope.force {
        writeln!(out, "delivery: forced")?;
    } else if envelope.passes_staleness(now, config.stale_threshold_ms) {
        writeln!(out, "delivery: accepted (age {age_ms} ms)")?;
    } else {
        writeln!(
            out,
            "delivery: suppressed (age {age_ms} ms, threshold {} ms)",
            config.stale_threshold_ms
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use framehistory_protocol::{StateEnvelope, encode};
    use serde_json::json;

    fn report(config: &HistoryConfig, payload: &str, now: i64) -> String {
        let mut out = Vec::new();
        run(config, payload, now, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn payload(force: bool) -> String {
        encode(&StateEnvelope::new(json!({"page": 3}), "Three", force, 10_000)).unwrap()
    }

    #[test]
    fn foreign_payload_is_ignored() {
        let report = report(&HistoryConfig::default(), "hello", 0);
        assert_eq!(report, "ignored: not a state envelope\n");
    }

    #[test]
    fn wrong_tag_is_ignored() {
        let config = HistoryConfig::default().with_reserved_tag("APP");
        let report = report(&config, &payload(true), 0);
        assert!(report.starts_with("ignored: tag \"IFRAME_HISTORY\""));
    }

    #[test]
    fn staleness_verdicts() {
        let config = HistoryConfig::default();
        assert!(report(&config, &payload(true), 10_000).ends_with("delivery: forced\n"));
        assert!(report(&config, &payload(false), 10_200).ends_with(
            "delivery: suppressed (age 200 ms, threshold 200 ms)\n"
        ));
        assert!(report(&config, &payload(false), 10_201).ends_with("delivery: accepted (age 201 ms)\n"));
    }

    #[test]
    fn envelope_is_printed() {
        let report = report(&HistoryConfig::default(), &payload(true), 10_000);
        assert!(report.contains("\"reserved\": \"IFRAME_HISTORY\""));
        assert!(report.contains("title: applied (\"Three\")"));
    }
}
