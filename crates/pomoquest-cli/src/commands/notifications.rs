use clap::Subcommand;

use pomoquest_core::{Config, Permission};

use super::CliResult;

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Show the current permission
    Status,
    /// Allow alerts for session and break ends, level ups and rank ups
    Grant,
    /// Silence all alerts
    Deny,
}

pub fn run(action: NotificationsAction) -> CliResult {
    let mut config = Config::load()?;
    let permission = match action {
        NotificationsAction::Status => config.notifications.permission,
        NotificationsAction::Grant => Permission::Granted,
        NotificationsAction::Deny => Permission::Denied,
    };
    if permission != config.notifications.permission {
        config.notifications.permission = permission;
        config.save()?;
    }
    println!("{permission}");
    Ok(())
}
