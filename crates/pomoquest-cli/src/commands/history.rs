use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use pomoquest_core::progress::recent;
use pomoquest_core::Rank;

use super::{print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Completed sessions, newest first
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Totals across the history
    Summary,
}

pub fn run(action: HistoryAction) -> CliResult {
    let ctx = Context::open()?;
    let history = &ctx.session().progress().history;

    match action {
        HistoryAction::List { limit } => print_json(&recent(history, limit)),
        HistoryAction::Summary => print_json(&ctx.session().progress().summary(Utc::now())),
    }
}

#[derive(Serialize)]
struct ProgressReport {
    points: u32,
    level: u32,
    streak: u32,
    rank: Rank,
    /// Points at which the level advances.
    next_level_at: u32,
    next_rank: Option<Rank>,
    next_rank_at: Option<u32>,
    completed_sessions: u32,
}

/// Points, level, streak, rank and the next thresholds.
pub fn progress() -> CliResult {
    let ctx = Context::open()?;
    let progress = ctx.session().progress();
    let next = progress.rank.next();
    print_json(&ProgressReport {
        points: progress.points,
        level: progress.level,
        streak: progress.streak,
        rank: progress.rank,
        next_level_at: progress.level_threshold(),
        next_rank: next.map(|(rank, _)| rank),
        next_rank_at: next.map(|(_, min)| min),
        completed_sessions: ctx.session().timer().completed_sessions,
    })
}
