//! Task list with single-active-task tracking.
//!
//! `TaskList` is the only owner of the tasks, so the "at most one active
//! task" rule is enforced here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Quick-add suggestions.
pub const PRESET_TASKS: [&str; 8] = [
    "Read a book",
    "Write a blog post",
    "Exercise",
    "Meditate",
    "Study a new topic",
    "Practice coding",
    "Clean the house",
    "Plan the week ahead",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation time in epoch milliseconds, bumped on collision.
    pub id: i64,
    pub name: String,
    pub is_completed: bool,
    pub is_active: bool,
    /// Seconds of work-phase time while this task was active.
    #[serde(rename = "elapsedTime")]
    pub elapsed_secs: u32,
}

/// Outcome of toggling a task's active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated,
    Deactivated { elapsed_secs: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Build from loaded tasks, keeping only the first active flag if
    /// several were set.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        let mut seen_active = false;
        for task in &mut tasks {
            if task.is_active {
                if seen_active {
                    task.is_active = false;
                }
                seen_active = true;
            }
        }
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn active(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.is_active)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }

    /// Append a new task. The name is trimmed and must not be empty.
    pub fn add(&mut self, name: &str, now: DateTime<Utc>) -> Result<&Task, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }

        let mut id = now.timestamp_millis();
        while self.tasks.iter().any(|t| t.id == id) {
            id = id.wrapping_add(1);
        }

        self.tasks.push(Task {
            id,
            name: name.to_string(),
            is_completed: false,
            is_active: false,
            elapsed_secs: 0,
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flip completion. Returns the new completion state.
    pub fn toggle_complete(&mut self, id: i64) -> Result<bool, ValidationError> {
        let task = self.get_mut(id)?;
        task.is_completed = !task.is_completed;
        Ok(task.is_completed)
    }

    /// Toggle the active flag on `id`.
    ///
    /// Activating clears every other task's flag and restarts the task's
    /// elapsed time. Deactivating the active task keeps its elapsed time.
    pub fn toggle_active(&mut self, id: i64) -> Result<Activation, ValidationError> {
        let target = self.get_mut(id)?;
        if target.is_active {
            target.is_active = false;
            return Ok(Activation::Deactivated {
                elapsed_secs: target.elapsed_secs,
            });
        }

        for task in &mut self.tasks {
            if task.id == id {
                task.is_active = true;
                task.elapsed_secs = 0;
            } else {
                task.is_active = false;
            }
        }
        Ok(Activation::Activated)
    }

    /// Credit one second to the active task unless it is already completed.
    pub fn tick_active(&mut self) -> Option<i64> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.is_active && !t.is_completed)?;
        task.elapsed_secs = task.elapsed_secs.saturating_add(1);
        Some(task.id)
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    fn get_mut(&mut self, id: i64) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ValidationError::UnknownTask(id))
    }
}
