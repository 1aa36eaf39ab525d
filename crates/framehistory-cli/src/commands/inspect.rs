//! `framehistory inspect`

use std::io::Write;

use framehistory_protocol::{ChildDocument, decode};

use crate::error::CliResult;

/// Prints the message a child document posts and where it posts it.
pub fn run(document: &str, out: &mut impl Write) -> CliResult<()> {
    let child = ChildDocument::parse_any(document)?;
    writeln!(out, "target origin: {}", child.target_origin)?;
    writeln!(out, "payload: {}", child.payload)?;
    match decode(&child.payload) {
        Some(envelope) => writeln!(out, "envelope: {}", serde_json::to_string_pretty(&envelope)?)?,
        None => writeln!(out, "envelope: none (payload is not a state envelope)")?,
    }
    Ok(())
}
