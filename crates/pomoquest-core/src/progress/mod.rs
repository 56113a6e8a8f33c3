//! Gamified progress: points, level, streak, rank and session history.
//!
//! ## Scoring
//!
//! | source | points |
//! |---|---|
//! | work session completed | 50 |
//! | break completed | 10 |
//! | task marked completed | 25 |
//!
//! A level is gained when points reach `level * 100`. Each award advances
//! the level by at most one, even if it crosses several thresholds.

mod history;
mod rank;

pub use history::{recent, HistoryEntry, HistorySummary};
pub use rank::Rank;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

pub const SESSION_POINTS: u32 = 50;
pub const BREAK_POINTS: u32 = 10;
pub const TASK_POINTS: u32 = 25;
pub const POINTS_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub points: u32,
    pub level: u32,
    pub streak: u32,
    pub rank: Rank,
    pub history: Vec<HistoryEntry>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            streak: 0,
            rank: Rank::default(),
            history: Vec::new(),
        }
    }
}

impl ProgressState {
    /// Add `amount` points, then advance level and rank as needed.
    pub fn award(&mut self, amount: u32, at: DateTime<Utc>) -> Vec<Event> {
        self.points = self.points.saturating_add(amount);
        let mut events = vec![Event::PointsAwarded {
            amount,
            points: self.points,
            at,
        }];

        if self.points >= self.level_threshold() && self.level < u32::MAX {
            self.level += 1;
            tracing::info!(level = self.level, "level up");
            events.push(Event::LevelUp {
                level: self.level,
                at,
            });
        }

        let rank = Rank::for_points(self.points);
        if rank != self.rank {
            self.rank = rank;
            tracing::info!(%rank, "rank up");
            events.push(Event::RankUp { rank, at });
        }

        events
    }

    /// Points needed to leave the current level.
    pub fn level_threshold(&self) -> u32 {
        self.level.saturating_mul(POINTS_PER_LEVEL)
    }

    /// Record a finished work session.
    pub fn record_session(&mut self, duration_min: u32, at: DateTime<Utc>) {
        self.streak = self.streak.saturating_add(1);
        self.history.push(HistoryEntry {
            completed_at: at,
            duration_min,
        });
    }

    /// Zero everything except the history.
    pub fn reset(&mut self) {
        let history = std::mem::take(&mut self.history);
        *self = Self {
            history,
            ..Self::default()
        };
    }

    pub fn summary(&self, now: DateTime<Utc>) -> HistorySummary {
        HistorySummary::from_history(&self.history, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn crossing_level_threshold_advances_level() {
        let mut progress = ProgressState {
            points: 90,
            ..ProgressState::default()
        };
        let events = progress.award(20, Utc::now());
        assert_eq!(progress.points, 110);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.rank, Rank::FocusApprentice);
        assert!(events.iter().any(|e| matches!(e, Event::LevelUp { level: 2, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::RankUp { rank: Rank::FocusApprentice, .. })));
    }

    #[test]
    fn large_award_advances_level_only_once() {
        let mut progress = ProgressState::default();
        progress.award(350, Utc::now());
        assert_eq!(progress.points, 350);
        assert_eq!(progress.level, 2);
        // The next small award catches up one more step.
        progress.award(1, Utc::now());
        assert_eq!(progress.level, 3);
    }

    #[test]
    fn award_below_threshold_emits_only_points() {
        let mut progress = ProgressState::default();
        let events = progress.award(50, Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.rank, Rank::TimeNovice);
    }

    #[test]
    fn reset_keeps_history() {
        let mut progress = ProgressState::default();
        progress.award(600, Utc::now());
        progress.record_session(25, Utc::now());
        progress.reset();
        assert_eq!(progress.points, 0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.rank, Rank::TimeNovice);
        assert_eq!(progress.history.len(), 1);
    }

    #[test]
    fn counters_saturate_at_their_maximum() {
        let mut progress = ProgressState {
            points: u32::MAX,
            level: u32::MAX,
            streak: u32::MAX,
            ..ProgressState::default()
        };
        progress.record_session(25, Utc::now());
        let events = progress.award(50, Utc::now());
        assert_eq!(progress.streak, u32::MAX);
        assert_eq!(progress.level, u32::MAX);
        assert!(!events.iter().any(|e| matches!(e, Event::LevelUp { .. })));
    }

    proptest! {
        #[test]
        fn awards_never_decrease_points_or_level(awards in proptest::collection::vec(0u32..400, 1..50)) {
            let mut progress = ProgressState::default();
            for amount in awards {
                let (points, level, rank) = (progress.points, progress.level, progress.rank);
                progress.award(amount, Utc::now());
                prop_assert!(progress.points >= points);
                prop_assert!(progress.level >= level);
                prop_assert!(progress.level <= level + 1);
                prop_assert!(progress.rank >= rank);
                prop_assert_eq!(progress.rank, Rank::for_points(progress.points));
            }
        }
    }
}
