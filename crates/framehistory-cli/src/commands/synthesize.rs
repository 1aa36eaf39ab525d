//! `framehistory synthesize`

use std::io::Write;

use framehistory_host::{HEADLESS_USER_AGENT, HistoryConfig, LoadStrategy, StrategyPreference};
use framehistory_protocol::{StateEnvelope, TargetOrigin, encode_data_url, synthesize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Inputs of the `synthesize` command.
#[derive(Debug, Clone)]
pub struct SynthesizeArgs {
    pub title: String,
    pub state: serde_json::Value,
    pub force: bool,
    pub origin: Option<String>,
    pub strategy: Option<StrategyPreference>,
    pub user_agent: Option<String>,
    pub timestamp: i64,
}

/// Prints what would be loaded into the frame: the document itself for the
/// legacy strategy, the `data:` URL otherwise.
pub fn run(config: &HistoryConfig, args: SynthesizeArgs, out: &mut impl Write) -> CliResult<()> {
    config.validate()?;

    let origin = args
        .origin
        .as_deref()
        .or(config.target_origin.as_deref())
        .ok_or_else(|| {
            CliError::argument("no target origin; pass --origin or set target_origin in the config")
        })?;
    let origin = TargetOrigin::parse(origin)?;

    let user_agent = args.user_agent.as_deref().unwrap_or(HEADLESS_USER_AGENT);
    let strategy = args.strategy.unwrap_or(config.strategy).resolve(user_agent);
    debug!(?strategy, origin = %origin, "Synthesizing child document");

    let envelope = StateEnvelope::new(args.state, args.title, args.force, args.timestamp)
        .with_tag(config.reserved_tag.as_str());
    let document = synthesize(&envelope, &origin)?;

    match strategy {
        LoadStrategy::DocumentWrite => writeln!(out, "{document}")?,
        LoadStrategy::DataUrl => writeln!(out, "{}", encode_data_url(&document))?,
    }
    Ok(())
}
