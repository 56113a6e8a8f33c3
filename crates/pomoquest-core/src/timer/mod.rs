mod engine;
mod state;

pub use engine::{Action, Session, Status, CELEBRATION_SECS};
pub use state::{
    format_clock, Phase, TimerState, BREAK_LENGTH_RANGE, DEFAULT_BREAK_LENGTH_MIN,
    DEFAULT_SESSION_LENGTH_MIN, DEFAULT_TOTAL_SESSIONS, SESSION_LENGTH_RANGE, TOTAL_SESSIONS_RANGE,
};
