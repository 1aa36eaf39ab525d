//! framehistory CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use framehistory_core::{Clock, SystemClock, init_tracing};

use framehistory_cli::cli::{Cli, Command};
use framehistory_cli::commands::{self, decode, inspect, simulate, synthesize};
use framehistory_cli::error::CliResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("warning: failed to initialize tracing: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = cli.load_config()?;

    let now = SystemClock.now_millis();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Synthesize {
            title,
            state,
            force,
            origin,
            strategy,
            user_agent,
            timestamp,
        } => synthesize::run(
            &config,
            synthesize::SynthesizeArgs {
                title,
                state: commands::parse_state(&state)?,
                force,
                origin,
                strategy: strategy.map(Into::into),
                user_agent,
                timestamp: timestamp.unwrap_or(now),
            },
            &mut out,
        )?,
        Command::Decode { payload } => {
            decode::run(&config, &commands::read_input(&payload)?, now, &mut out)?
        }
        Command::Inspect { document } => {
            inspect::run(&commands::read_input(&document)?, &mut out)?
        }
        Command::Simulate {
            title,
            state,
            force,
            location,
            revisit_after_ms,
        } => simulate::run(
            config,
            simulate::SimulateArgs {
                title,
                state: commands::parse_state(&state)?,
                force,
                location,
                revisit_after_ms,
            },
            now,
            &mut out,
        )?,
    }

    out.flush()?;
    Ok(())
}
