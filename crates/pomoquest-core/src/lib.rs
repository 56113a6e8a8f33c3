//! # pomoquest Core Library
//!
//! Business logic for the pomoquest focus timer: a Pomodoro countdown with
//! task time tracking and gamified progress (points, levels, streaks, ranks).
//! The CLI binary is a thin driver over this crate.
//!
//! ## Architecture
//!
//! - **Session**: one owned state value updated through a single reducer.
//!   The caller delivers one `tick()` per second while the timer runs.
//! - **Tasks**: a task list that keeps at most one task active.
//! - **Progress**: scoring, levels, the rank table and session history.
//! - **Storage**: field-by-field snapshots in SQLite and TOML configuration.
//! - **Notify**: permission-gated, best-effort alerts.
//!
//! ## Key Components
//!
//! - [`Session`]: session state machine
//! - [`Database`]: snapshot persistence
//! - [`Config`]: application configuration
//! - [`Notifier`]: trait for alert channels

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod progress;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use notify::{Alert, NotificationCenter, Notifier, Permission};
pub use progress::{HistoryEntry, HistorySummary, ProgressState, Rank};
pub use storage::{Config, Database, MemoryStore, SnapshotStore};
pub use task::{Task, TaskList, PRESET_TASKS};
pub use timer::{Action, Phase, Session, Status, TimerState};
