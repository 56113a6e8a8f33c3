//! Field-by-field session snapshots.
//!
//! Each field is stored under its own key so a single corrupt value only
//! costs that field: it falls back to its default and everything else loads.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::SnapshotStore;
use crate::error::Result;
use crate::progress::{HistoryEntry, ProgressState, Rank};
use crate::task::{Task, TaskList};
use crate::timer::{
    Phase, Session, TimerState, BREAK_LENGTH_RANGE, SESSION_LENGTH_RANGE, TOTAL_SESSIONS_RANGE,
};

pub const KEY_TIME: &str = "time";
pub const KEY_SESSION_DURATION: &str = "sessionDuration";
pub const KEY_TASKS: &str = "tasks";
pub const KEY_IS_BREAK: &str = "isBreak";
pub const KEY_BREAK_DURATION: &str = "breakDuration";
pub const KEY_TOTAL_SESSIONS: &str = "totalSessions";
pub const KEY_COMPLETED_SESSIONS: &str = "completedSessions";
pub const KEY_POINTS: &str = "points";
pub const KEY_LEVEL: &str = "level";
pub const KEY_STREAK: &str = "streak";
pub const KEY_RANK: &str = "rank";
pub const KEY_SESSION_HISTORY: &str = "sessionHistory";

pub const ALL_KEYS: [&str; 12] = [
    KEY_TIME,
    KEY_SESSION_DURATION,
    KEY_TASKS,
    KEY_IS_BREAK,
    KEY_BREAK_DURATION,
    KEY_TOTAL_SESSIONS,
    KEY_COMPLETED_SESSIONS,
    KEY_POINTS,
    KEY_LEVEL,
    KEY_STREAK,
    KEY_RANK,
    KEY_SESSION_HISTORY,
];

/// Read one field, or `None` if it is missing or unreadable.
fn read<T: DeserializeOwned>(store: &impl SnapshotStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, "snapshot read failed, using default: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, "malformed snapshot value, using default: {e}");
            None
        }
    }
}

fn read_in_range(store: &impl SnapshotStore, key: &str, (min, max): (u32, u32)) -> Option<u32> {
    read::<u32>(store, key).filter(|v| {
        let ok = (min..=max).contains(v);
        if !ok {
            tracing::warn!(key, value = *v, "snapshot value out of range, using default");
        }
        ok
    })
}

/// Load a session, falling back per field to `defaults` (or the built-in
/// defaults for progress fields). Never fails.
pub fn load_session(store: &impl SnapshotStore, defaults: &TimerState) -> Session {
    let session_length_min =
        read_in_range(store, KEY_SESSION_DURATION, SESSION_LENGTH_RANGE).unwrap_or(defaults.session_length_min);
    let break_length_min =
        read_in_range(store, KEY_BREAK_DURATION, BREAK_LENGTH_RANGE).unwrap_or(defaults.break_length_min);
    let total_planned_sessions =
        read_in_range(store, KEY_TOTAL_SESSIONS, TOTAL_SESSIONS_RANGE).unwrap_or(defaults.total_planned_sessions);

    let timer = TimerState {
        remaining_secs: read(store, KEY_TIME).unwrap_or(session_length_min * 60),
        is_running: false,
        phase: Phase::from_is_break(read(store, KEY_IS_BREAK).unwrap_or(false)),
        session_length_min,
        break_length_min,
        total_planned_sessions,
        completed_sessions: read(store, KEY_COMPLETED_SESSIONS).unwrap_or(0),
    };

    let defaults = ProgressState::default();
    let progress = ProgressState {
        points: read(store, KEY_POINTS).unwrap_or(defaults.points),
        level: read::<u32>(store, KEY_LEVEL).filter(|l| *l >= 1).unwrap_or(defaults.level),
        streak: read(store, KEY_STREAK).unwrap_or(defaults.streak),
        rank: read::<Rank>(store, KEY_RANK).unwrap_or(defaults.rank),
        history: read::<Vec<HistoryEntry>>(store, KEY_SESSION_HISTORY).unwrap_or_default(),
    };

    let tasks = TaskList::from_tasks(read::<Vec<Task>>(store, KEY_TASKS).unwrap_or_default());

    Session::from_parts(timer, tasks, progress)
}

/// Every persisted field of `session` with its JSON value.
pub fn fields(session: &Session) -> Result<Vec<(&'static str, Value)>> {
    let timer = session.timer();
    let progress = session.progress();
    Ok(vec![
        (KEY_TIME, Value::from(timer.remaining_secs)),
        (KEY_SESSION_DURATION, Value::from(timer.session_length_min)),
        (KEY_TASKS, serde_json::to_value(session.tasks())?),
        (KEY_IS_BREAK, Value::from(timer.phase.is_break())),
        (KEY_BREAK_DURATION, Value::from(timer.break_length_min)),
        (KEY_TOTAL_SESSIONS, Value::from(timer.total_planned_sessions)),
        (KEY_COMPLETED_SESSIONS, Value::from(timer.completed_sessions)),
        (KEY_POINTS, Value::from(progress.points)),
        (KEY_LEVEL, Value::from(progress.level)),
        (KEY_STREAK, Value::from(progress.streak)),
        (KEY_RANK, serde_json::to_value(progress.rank)?),
        (KEY_SESSION_HISTORY, serde_json::to_value(&progress.history)?),
    ])
}

/// Write every field.
///
/// # Errors
/// Returns an error if a field cannot be encoded or the store rejects a write.
pub fn save_session(store: &mut impl SnapshotStore, session: &Session) -> Result<()> {
    for (key, value) in fields(session)? {
        store.set(key, &value.to_string())?;
    }
    Ok(())
}

/// Rewrite only the fields that differ between `before` and `after`.
/// Returns the keys written.
///
/// # Errors
/// Returns an error if a field cannot be encoded or the store rejects a write.
pub fn save_changes(
    store: &mut impl SnapshotStore,
    before: &Session,
    after: &Session,
) -> Result<Vec<&'static str>> {
    let old = fields(before)?;
    let mut written = Vec::new();
    for ((key, new_value), (_, old_value)) in fields(after)?.into_iter().zip(old) {
        if new_value != old_value {
            store.set(key, &new_value.to_string())?;
            written.push(key);
        }
    }
    tracing::debug!(?written, "snapshot saved");
    Ok(written)
}

/// Drop every stored key except the session history.
///
/// # Errors
/// Returns an error if the store cannot list or remove keys.
pub fn clear_except_history(store: &mut impl SnapshotStore) -> Result<()> {
    for key in store.keys()? {
        if key != KEY_SESSION_HISTORY {
            store.remove(&key)?;
        }
    }
    Ok(())
}
