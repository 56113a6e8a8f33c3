//! Best-effort user alerts.
//!
//! Alerts go out only once the user has granted permission. A missing or
//! failing notifier never surfaces as an error to the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::events::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    #[default]
    NotAsked,
    Granted,
    Denied,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Permission::NotAsked => "not-asked",
            Permission::Granted => "granted",
            Permission::Denied => "denied",
        })
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-asked" => Ok(Permission::NotAsked),
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            other => Err(format!("unknown notification permission: {other}")),
        }
    }
}

/// A channel that can show an alert to the user.
pub trait Notifier {
    fn deliver(&mut self, alert: &Alert) -> Result<()>;
}

/// Gates a notifier behind the user's permission.
pub struct NotificationCenter<N> {
    permission: Permission,
    notifier: Option<N>,
}

impl<N: Notifier> NotificationCenter<N> {
    pub fn new(permission: Permission, notifier: Option<N>) -> Self {
        Self {
            permission,
            notifier,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Deliver the alerts carried by `events`. Returns how many went out.
    pub fn dispatch(&mut self, events: &[Event]) -> usize {
        if self.permission != Permission::Granted {
            return 0;
        }
        let Some(notifier) = self.notifier.as_mut() else {
            return 0;
        };

        let mut sent = 0;
        for alert in events.iter().filter_map(Event::alert) {
            match notifier.deliver(&alert) {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(title = %alert.title, "notification failed: {e}"),
            }
        }
        sent
    }
}

/// Collects alerts in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub delivered: Vec<Alert>,
}

impl Notifier for RecordingNotifier {
    fn deliver(&mut self, alert: &Alert) -> Result<()> {
        self.delivered.push(alert.clone());
        Ok(())
    }
}
