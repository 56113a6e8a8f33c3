use clap::Subcommand;
use std::io::Write;

use pomoquest_core::clock::TICK_INTERVAL;
use pomoquest_core::timer::format_clock;
use pomoquest_core::{Action, Event};

use super::{print_json, print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum SetAction {
    /// Work session length in minutes (1-60)
    Session { minutes: u32 },
    /// Break length in minutes (1-30)
    Break { minutes: u32 },
    /// Planned sessions per cycle (1-10)
    Total { count: u32 },
}

/// Print the current timer and progress state as JSON.
pub fn status() -> CliResult {
    let ctx = Context::open()?;
    print_json(&ctx.status())
}

/// Run the current phase in real time, one tick per second, until it ends.
pub fn run(quiet: bool) -> CliResult {
    let mut ctx = Context::open()?;
    let mut events = ctx.apply(Action::Start)?;
    if events.is_empty() {
        return print_outcome(&ctx, &events);
    }

    while ctx.session().timer().is_running {
        std::thread::sleep(TICK_INTERVAL);
        events.extend(ctx.apply(Action::Tick)?);
        if !quiet {
            let timer = ctx.session().timer();
            eprint!("\r{} {}  ", timer.phase.label(), format_clock(timer.remaining_secs));
            std::io::stderr().flush()?;
        }
    }
    if !quiet {
        eprintln!();
    }

    print_outcome(&ctx, &events)
}

/// Advance `count` simulated seconds, stopping early at a phase end.
pub fn tick(count: u32) -> CliResult {
    let mut ctx = Context::open()?;
    if count == 0 {
        return print_outcome(&ctx, &[]);
    }
    let mut events: Vec<Event> = ctx.apply(Action::Start)?;
    events.extend(ctx.advance(count)?);
    events.extend(ctx.apply(Action::Pause)?);

    print_outcome(&ctx, &events)
}

pub fn reset() -> CliResult {
    let mut ctx = Context::open()?;
    let events = ctx.reset()?;
    print_outcome(&ctx, &events)
}

pub fn set(action: SetAction) -> CliResult {
    let mut ctx = Context::open()?;
    let action = match action {
        SetAction::Session { minutes } => Action::SetSessionLength(minutes),
        SetAction::Break { minutes } => Action::SetBreakLength(minutes),
        SetAction::Total { count } => Action::SetTotalSessions(count),
    };
    let events = ctx.apply(action)?;
    print_outcome(&ctx, &events)
}
