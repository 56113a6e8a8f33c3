use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const SESSION_LENGTH_RANGE: (u32, u32) = (1, 60);
pub const BREAK_LENGTH_RANGE: (u32, u32) = (1, 30);
pub const TOTAL_SESSIONS_RANGE: (u32, u32) = (1, 10);

pub const DEFAULT_SESSION_LENGTH_MIN: u32 = 25;
pub const DEFAULT_BREAK_LENGTH_MIN: u32 = 5;
pub const DEFAULT_TOTAL_SESSIONS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

impl Phase {
    pub fn is_break(self) -> bool {
        self == Phase::Break
    }

    pub fn from_is_break(is_break: bool) -> Self {
        if is_break {
            Phase::Break
        } else {
            Phase::Work
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Pomodoro Timer",
            Phase::Break => "Break Time",
        }
    }
}

/// Countdown and cycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u32,
    pub is_running: bool,
    pub phase: Phase,
    pub session_length_min: u32,
    pub break_length_min: u32,
    pub total_planned_sessions: u32,
    pub completed_sessions: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::with_lengths(
            DEFAULT_SESSION_LENGTH_MIN,
            DEFAULT_BREAK_LENGTH_MIN,
            DEFAULT_TOTAL_SESSIONS,
        )
    }
}

impl TimerState {
    /// Idle at the start of a work phase with the given settings.
    pub fn with_lengths(session_length_min: u32, break_length_min: u32, total_planned_sessions: u32) -> Self {
        Self {
            remaining_secs: session_length_min.saturating_mul(60),
            is_running: false,
            phase: Phase::Work,
            session_length_min,
            break_length_min,
            total_planned_sessions,
            completed_sessions: 0,
        }
    }

    pub fn session_secs(&self) -> u32 {
        self.session_length_min.saturating_mul(60)
    }

    pub fn break_secs(&self) -> u32 {
        self.break_length_min.saturating_mul(60)
    }

    /// Full length of the phase in progress.
    pub fn phase_secs(&self) -> u32 {
        match self.phase {
            Phase::Work => self.session_secs(),
            Phase::Break => self.break_secs(),
        }
    }

    /// 1-based number of the session in progress ("Session N of M").
    pub fn session_number(&self) -> u32 {
        self.completed_sessions.saturating_add(1)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.remaining_secs) / f64::from(total)).clamp(0.0, 1.0)
    }
}

/// `MM:SS`, minutes padded to at least two digits.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub(crate) fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<u32, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
