//! `framehistory simulate`
//!
//! Pushes one state through a [`HeadlessWindow`] with a manual clock, runs
//! the child document, and reports what the subscriber saw. With
//! `revisit_after_ms` the child runs a second time later, which is what a
//! back navigation onto the entry does.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use framehistory_core::ManualClock;
use framehistory_host::{FrameHistory, HeadlessWindow, HistoryConfig, Location, TurnQueue};
use serde_json::Value;
use tracing::info;

use crate::error::{CliError, CliResult};

/// Inputs of the `simulate` command.
#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub title: String,
    pub state: Value,
    pub force: bool,
    pub location: String,
    pub revisit_after_ms: Option<i64>,
}

fn parse_location(location: &str) -> CliResult<Location> {
    let (protocol, host) = location
        .split_once("//")
        .filter(|(protocol, host)| protocol.ends_with(':') && !host.is_empty())
        .ok_or_else(|| CliError::argument(format!("location must look like scheme://host, got {location}")))?;
    Ok(Location::new(protocol, host.trim_end_matches('/')))
}

fn report(
    label: &str,
    delivered: &RefCell<Vec<Value>>,
    out: &mut impl Write,
) -> CliResult<()> {
    match delivered.borrow_mut().pop() {
        Some(state) => writeln!(out, "{label}: delivered {state}")?,
        None => writeln!(out, "{label}: nothing delivered")?,
    }
    Ok(())
}

/// Runs the round trip starting at time `now`.
pub fn run(config: HistoryConfig, args: SimulateArgs, now: i64, out: &mut impl Write) -> CliResult<()> {
    let window = Rc::new(HeadlessWindow::new(parse_location(&args.location)?));
    let clock = Rc::new(ManualClock::new(now));
    let turns = Rc::new(TurnQueue::default());
    let history = FrameHistory::builder(window.clone())
        .with_config(config)
        .with_scheduler(turns.clone())
        .with_clock(clock.clone())
        .build()?;

    let delivered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&delivered);
    history.on_state_change(move |state| sink.borrow_mut().push(state));

    history.push_state_to(&*window.frame(), args.state, &args.title, args.force)?;
    writeln!(out, "strategy: {:?}", history.strategy())?;
    writeln!(out, "target origin: {}", history.target_origin())?;

    let admitted = window.run_child()?;
    let tasks = turns.run_until_idle();
    info!(admitted, tasks, "Child document executed");
    report("load", &delivered, out)?;

    if let Some(millis) = args.revisit_after_ms {
        clock.advance(millis);
        window.run_child()?;
        turns.run_until_idle();
        report(&format!("revisit after {millis} ms"), &delivered, out)?;
    }

    writeln!(out, "title: {}", window.title())?;
    Ok(())
}
