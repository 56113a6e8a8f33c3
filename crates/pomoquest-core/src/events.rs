use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::Alert;
use crate::progress::Rank;

/// Every state change in a session produces an Event.
/// The CLI prints them; the notifier turns a few of them into alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        remaining_secs: u32,
        is_break: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A work session ran down to zero; the break begins.
    SessionEnded {
        completed_sessions: u32,
        duration_min: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// A break ran down to zero; the next work session is ready.
    BreakEnded {
        at: DateTime<Utc>,
    },
    PointsAwarded {
        amount: u32,
        points: u32,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    RankUp {
        rank: Rank,
        at: DateTime<Utc>,
    },
    TaskAdded {
        task_id: i64,
        name: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: i64,
        at: DateTime<Utc>,
    },
    TaskReopened {
        task_id: i64,
        at: DateTime<Utc>,
    },
    TaskActivated {
        task_id: i64,
        at: DateTime<Utc>,
    },
    TaskDeactivated {
        task_id: i64,
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        session_length_min: u32,
        break_length_min: u32,
        total_sessions: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The user-facing alert for this event, if it warrants one.
    pub fn alert(&self) -> Option<Alert> {
        match self {
            Event::BreakEnded { .. } => Some(Alert::new("Break ended", "Time to start working!")),
            Event::SessionEnded { .. } => Some(Alert::new("Session ended", "Time for a break!")),
            Event::LevelUp { level, .. } => {
                Some(Alert::new("Level Up!", format!("You've reached level {level}!")))
            }
            Event::RankUp { rank, .. } => Some(Alert::new(
                "Rank Up!",
                format!("You've achieved the rank of {rank}!"),
            )),
            _ => None,
        }
    }
}
