//! Task management commands for CLI.

use clap::Subcommand;
use serde::Serialize;

use pomoquest_core::{Action, PRESET_TASKS};

use super::{print_json, print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Add a preset task, or list the presets when no name is given
    Preset {
        /// Preset name, e.g. "Exercise"
        name: Option<String>,
    },
    /// List tasks
    List,
    /// Toggle a task's completed flag
    Complete {
        /// Task ID
        id: i64,
    },
    /// Toggle which task is being timed
    Activate {
        /// Task ID
        id: i64,
    },
}

#[derive(Serialize)]
struct PresetEntry {
    name: &'static str,
    added: bool,
}

pub fn run(action: TaskAction) -> CliResult {
    let mut ctx = Context::open()?;

    match action {
        TaskAction::Add { name } => {
            let events = ctx.apply(Action::AddTask(name.join(" ")))?;
            print_outcome(&ctx, &events)?;
        }
        TaskAction::Preset { name: Some(name) } => {
            if !PRESET_TASKS.contains(&name.as_str()) {
                return Err(format!(
                    "unknown preset: {name} (available: {})",
                    PRESET_TASKS.join(", ")
                )
                .into());
            }
            let events = ctx.apply(Action::AddPresetTask(name))?;
            print_outcome(&ctx, &events)?;
        }
        TaskAction::Preset { name: None } => {
            let tasks = ctx.session().tasks();
            let presets: Vec<PresetEntry> = PRESET_TASKS
                .iter()
                .map(|&name| PresetEntry {
                    name,
                    added: tasks.contains_name(name),
                })
                .collect();
            print_json(&presets)?;
        }
        TaskAction::List => {
            print_json(ctx.session().tasks())?;
        }
        TaskAction::Complete { id } => {
            let events = ctx.apply(Action::ToggleComplete(id))?;
            print_outcome(&ctx, &events)?;
        }
        TaskAction::Activate { id } => {
            let events = ctx.apply(Action::SetActive(id))?;
            print_outcome(&ctx, &events)?;
        }
    }
    Ok(())
}
