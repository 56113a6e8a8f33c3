use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One completed work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "date")]
    pub completed_at: DateTime<Utc>,
    /// Configured session length at the time it completed, in minutes.
    #[serde(rename = "duration")]
    pub duration_min: u32,
}

/// Aggregate figures over the session history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_sessions: u64,
    pub total_focus_min: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
    pub longest_session_min: u32,
}

impl HistorySummary {
    /// Summarize `history`, counting entries on the local calendar day of `now` as today.
    pub fn from_history(history: &[HistoryEntry], now: DateTime<Utc>) -> Self {
        Self::from_history_in(history, now, &Local)
    }

    /// Like [`HistorySummary::from_history`], with "today" taken in `tz`.
    pub fn from_history_in<Tz: TimeZone>(history: &[HistoryEntry], now: DateTime<Utc>, tz: &Tz) -> Self {
        let today = now.with_timezone(tz).date_naive();
        history.iter().fold(Self::default(), |mut acc, entry| {
            acc.total_sessions += 1;
            acc.total_focus_min += u64::from(entry.duration_min);
            acc.longest_session_min = acc.longest_session_min.max(entry.duration_min);
            if entry.completed_at.with_timezone(tz).date_naive() == today {
                acc.today_sessions += 1;
                acc.today_focus_min += u64::from(entry.duration_min);
            }
            acc
        })
    }
}

/// Entries newest first, optionally truncated to `limit`.
pub fn recent(history: &[HistoryEntry], limit: Option<usize>) -> Vec<&HistoryEntry> {
    let iter = history.iter().rev();
    match limit {
        Some(n) => iter.take(n).collect(),
        None => iter.collect(),
    }
}
