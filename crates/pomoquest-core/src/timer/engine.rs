//! Session state machine.
//!
//! The whole session (countdown, tasks, progress) is one owned value. User
//! actions and clock ticks are applied through [`Session::update`], which
//! returns the events each transition produced. There are no internal
//! threads: the driver calls `tick()` once per second while running.
//!
//! ## Phase cycle
//!
//! ```text
//! Work --(remaining hits 0)--> Break --(remaining hits 0)--> Work
//! ```
//!
//! The timer stops itself at every phase boundary; the next phase waits for
//! an explicit start.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::state::{
    check_range, format_clock, Phase, TimerState, BREAK_LENGTH_RANGE, SESSION_LENGTH_RANGE,
    TOTAL_SESSIONS_RANGE,
};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::progress::{ProgressState, Rank, BREAK_POINTS, SESSION_POINTS, TASK_POINTS};
use crate::task::{Activation, Task, TaskList};

/// How long the celebration cue stays up after a session ends.
pub const CELEBRATION_SECS: i64 = 5;

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    Tick,
    ToggleRun,
    Start,
    Pause,
    Reset,
    SetSessionLength(u32),
    SetBreakLength(u32),
    SetTotalSessions(u32),
    AddTask(String),
    AddPresetTask(String),
    ToggleComplete(i64),
    SetActive(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    timer: TimerState,
    tasks: TaskList,
    progress: ProgressState,
    #[serde(default)]
    celebration_until: Option<DateTime<Utc>>,
}

/// Display snapshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub phase: Phase,
    pub label: &'static str,
    pub clock: String,
    pub remaining_secs: u32,
    /// 0.0 .. 1.0 through the current phase.
    pub phase_progress: f64,
    pub is_running: bool,
    pub session_number: u32,
    pub total_sessions: u32,
    pub session_length_min: u32,
    pub break_length_min: u32,
    pub points: u32,
    pub level: u32,
    pub streak: u32,
    pub rank: Rank,
    pub active_task: Option<Task>,
    pub celebrating: bool,
}

impl Session {
    pub fn new(timer: TimerState) -> Self {
        Self::from_parts(timer, TaskList::default(), ProgressState::default())
    }

    pub fn from_parts(timer: TimerState, tasks: TaskList, progress: ProgressState) -> Self {
        Self {
            timer,
            tasks,
            progress,
            celebration_until: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn is_celebrating(&self, now: DateTime<Utc>) -> bool {
        self.celebration_until.is_some_and(|until| now < until)
    }

    pub fn status(&self, now: DateTime<Utc>) -> Status {
        Status {
            phase: self.timer.phase,
            label: self.timer.phase.label(),
            clock: format_clock(self.timer.remaining_secs),
            remaining_secs: self.timer.remaining_secs,
            phase_progress: self.timer.phase_progress(),
            is_running: self.timer.is_running,
            session_number: self.timer.session_number(),
            total_sessions: self.timer.total_planned_sessions,
            session_length_min: self.timer.session_length_min,
            break_length_min: self.timer.break_length_min,
            points: self.progress.points,
            level: self.progress.level,
            streak: self.progress.streak,
            rank: self.progress.rank,
            active_task: self.tasks.active().cloned(),
            celebrating: self.is_celebrating(now),
        }
    }

    // ── Reducer ──────────────────────────────────────────────────────

    /// Apply one action. Validation failures leave the session untouched.
    pub fn update(&mut self, action: Action, now: DateTime<Utc>) -> Result<Vec<Event>> {
        tracing::debug!(?action, "session update");
        let events = match action {
            Action::Tick => self.tick(now),
            Action::ToggleRun => self.toggle_run(now),
            Action::Start => self.start(now),
            Action::Pause => self.pause(now),
            Action::Reset => self.reset(now),
            Action::SetSessionLength(min) => self.set_session_length(min, now)?,
            Action::SetBreakLength(min) => self.set_break_length(min, now)?,
            Action::SetTotalSessions(n) => self.set_total_sessions(n, now)?,
            Action::AddTask(name) => self.add_task(&name, now)?,
            Action::AddPresetTask(name) => self.add_preset_task(&name, now)?,
            Action::ToggleComplete(id) => self.toggle_complete(id, now)?,
            Action::SetActive(id) => self.set_active(id, now)?,
        };
        Ok(events)
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Advance one second. No-op unless running.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if !self.timer.is_running {
            return Vec::new();
        }

        self.timer.remaining_secs = self.timer.remaining_secs.saturating_sub(1);
        if self.timer.phase == Phase::Work {
            self.tasks.tick_active();
        }

        if self.timer.remaining_secs > 0 {
            return Vec::new();
        }

        self.timer.is_running = false;
        match self.timer.phase {
            Phase::Break => self.end_break(now),
            Phase::Work => self.end_session(now),
        }
    }

    /// Work phase finished: start the break and score the session.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let duration_min = self.timer.session_length_min;
        self.timer.phase = Phase::Break;
        self.timer.remaining_secs = self.timer.break_secs();
        self.timer.completed_sessions = self.timer.completed_sessions.saturating_add(1);
        self.progress.record_session(duration_min, now);
        self.celebration_until = Some(now + Duration::seconds(CELEBRATION_SECS));

        tracing::info!(
            completed = self.timer.completed_sessions,
            streak = self.progress.streak,
            "session ended"
        );

        let mut events = vec![Event::SessionEnded {
            completed_sessions: self.timer.completed_sessions,
            duration_min,
            streak: self.progress.streak,
            at: now,
        }];
        events.extend(self.progress.award(SESSION_POINTS, now));
        events
    }

    /// Break finished: queue up the next work session.
    pub fn end_break(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.timer.phase = Phase::Work;
        self.timer.remaining_secs = self.timer.session_secs();
        tracing::info!("break ended");

        let mut events = vec![Event::BreakEnded { at: now }];
        events.extend(self.progress.award(BREAK_POINTS, now));
        events
    }

    /// Complete a phase whose countdown already reached zero while stopped,
    /// as a snapshot saved right at a phase end can hold.
    pub fn finish_pending_phase(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.timer.is_running || self.timer.remaining_secs > 0 {
            return Vec::new();
        }
        tracing::info!(phase = ?self.timer.phase, "finishing phase left at 00:00");
        match self.timer.phase {
            Phase::Break => self.end_break(now),
            Phase::Work => self.end_session(now),
        }
    }

    // ── Run control ──────────────────────────────────────────────────

    pub fn toggle_run(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.timer.is_running {
            self.pause(now)
        } else {
            self.start(now)
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.timer.is_running || self.timer.remaining_secs == 0 {
            return Vec::new();
        }
        self.timer.is_running = true;
        vec![Event::TimerStarted {
            remaining_secs: self.timer.remaining_secs,
            is_break: self.timer.phase.is_break(),
            at: now,
        }]
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if !self.timer.is_running {
            return Vec::new();
        }
        self.timer.is_running = false;
        vec![Event::TimerPaused {
            remaining_secs: self.timer.remaining_secs,
            at: now,
        }]
    }

    /// Back to an idle work phase with zeroed progress. History and the
    /// duration settings survive.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.timer = TimerState::with_lengths(
            self.timer.session_length_min,
            self.timer.break_length_min,
            self.timer.total_planned_sessions,
        );
        self.progress.reset();
        self.tasks.clear();
        self.celebration_until = None;
        tracing::info!("session reset");
        vec![Event::TimerReset { at: now }]
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Retargets the countdown only when idle in the work phase.
    pub fn set_session_length(&mut self, min: u32, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        self.timer.session_length_min = check_range("session length", min, SESSION_LENGTH_RANGE)?;
        if !self.timer.is_running && self.timer.phase == Phase::Work {
            self.timer.remaining_secs = self.timer.session_secs();
        }
        Ok(vec![self.durations_changed(now)])
    }

    /// Takes effect at the next break; a break already counting down keeps its time.
    pub fn set_break_length(&mut self, min: u32, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        self.timer.break_length_min = check_range("break length", min, BREAK_LENGTH_RANGE)?;
        Ok(vec![self.durations_changed(now)])
    }

    pub fn set_total_sessions(&mut self, total: u32, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        self.timer.total_planned_sessions = check_range("total sessions", total, TOTAL_SESSIONS_RANGE)?;
        Ok(vec![self.durations_changed(now)])
    }

    fn durations_changed(&self, now: DateTime<Utc>) -> Event {
        Event::DurationsChanged {
            session_length_min: self.timer.session_length_min,
            break_length_min: self.timer.break_length_min,
            total_sessions: self.timer.total_planned_sessions,
            remaining_secs: self.timer.remaining_secs,
            at: now,
        }
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, name: &str, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        let task = self.tasks.add(name, now)?;
        Ok(vec![Event::TaskAdded {
            task_id: task.id,
            name: task.name.clone(),
            at: now,
        }])
    }

    /// Add a preset unless a task with that name already exists.
    pub fn add_preset_task(&mut self, name: &str, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        if self.tasks.contains_name(name) {
            return Ok(Vec::new());
        }
        self.add_task(name, now)
    }

    /// Flip completion; only the transition to completed scores.
    pub fn toggle_complete(&mut self, id: i64, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        if self.tasks.toggle_complete(id)? {
            let mut events = vec![Event::TaskCompleted { task_id: id, at: now }];
            events.extend(self.progress.award(TASK_POINTS, now));
            Ok(events)
        } else {
            Ok(vec![Event::TaskReopened { task_id: id, at: now }])
        }
    }

    /// Toggle which task is being timed. Refused during a break.
    pub fn set_active(&mut self, id: i64, now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
        if self.timer.phase == Phase::Break {
            return Err(ValidationError::TaskActivationDuringBreak);
        }
        let event = match self.tasks.toggle_active(id)? {
            Activation::Activated => Event::TaskActivated { task_id: id, at: now },
            Activation::Deactivated { elapsed_secs } => Event::TaskDeactivated {
                task_id: id,
                elapsed_secs,
                at: now,
            },
        };
        Ok(vec![event])
    }
}
