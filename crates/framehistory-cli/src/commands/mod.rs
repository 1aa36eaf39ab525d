//! Command implementations.
//!
//! Every command writes its report to the given writer so it can be tested
//! without capturing stdout.

pub mod decode;
pub mod inspect;
pub mod simulate;
pub mod synthesize;

use std::io::Read;

use serde_json::Value;

use crate::error::CliResult;

/// Returns `arg`, or the whole of stdin when `arg` is `-`.
pub fn read_input(arg: &str) -> CliResult<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input.trim_end().to_string())
}

/// Parses a `--state` argument.
pub fn parse_state(text: &str) -> CliResult<Value> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_input_passes_through() {
        assert_eq!(read_input("{\"a\":1}").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn state_must_be_json() {
        assert_eq!(parse_state(r#"{"count":1}"#).unwrap(), json!({"count": 1}));
        assert!(parse_state("count=1").is_err());
    }
}
