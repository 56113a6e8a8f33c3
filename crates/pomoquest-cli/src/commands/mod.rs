pub mod config;
pub mod history;
pub mod notifications;
pub mod task;
pub mod timer;

use serde::Serialize;

use pomoquest_core::storage::snapshot;
use pomoquest_core::{
    Action, Clock, Config, Database, Event, NotificationCenter, Session, SnapshotStore, Status,
    SystemClock,
};

use crate::notifier::TerminalNotifier;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Loaded session plus everything needed to persist it and raise alerts.
pub struct Context {
    db: Database,
    session: Session,
    clock: SystemClock,
    notifications: NotificationCenter<TerminalNotifier>,
}

impl Context {
    pub fn open() -> CliResult<Self> {
        let config = Config::load()?;
        let mut db = Database::open()?;
        let clock = SystemClock;
        let mut session = snapshot::load_session(&db, &config.timer_defaults());
        let loaded = session.clone();
        let events = session.finish_pending_phase(clock.now());
        // The store always holds every field after open.
        if db.keys()?.len() < snapshot::ALL_KEYS.len() {
            snapshot::save_session(&mut db, &session)?;
        } else {
            snapshot::save_changes(&mut db, &loaded, &session)?;
        }
        let notifier = config
            .notifications
            .enabled
            .then(|| TerminalNotifier::new(config.notifications.bell));
        let mut notifications = NotificationCenter::new(config.notifications.permission, notifier);
        notifications.dispatch(&events);
        Ok(Self {
            db,
            session,
            clock,
            notifications,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> Status {
        self.session.status(self.clock.now())
    }

    /// Apply one action, persist the changed fields and raise alerts.
    pub fn apply(&mut self, action: Action) -> CliResult<Vec<Event>> {
        let before = self.session.clone();
        let events = self.session.update(action, self.clock.now())?;
        snapshot::save_changes(&mut self.db, &before, &self.session)?;
        self.notifications.dispatch(&events);
        Ok(events)
    }

    /// Tick up to `max` times in memory, stopping when the timer stops,
    /// then persist once.
    pub fn advance(&mut self, max: u32) -> CliResult<Vec<Event>> {
        let before = self.session.clone();
        let mut events = Vec::new();
        for _ in 0..max {
            if !self.session.timer().is_running {
                break;
            }
            events.extend(self.session.update(Action::Tick, self.clock.now())?);
        }
        snapshot::save_changes(&mut self.db, &before, &self.session)?;
        self.notifications.dispatch(&events);
        Ok(events)
    }

    /// Full reset: everything but the history is dropped from the store.
    pub fn reset(&mut self) -> CliResult<Vec<Event>> {
        let events = self.session.update(Action::Reset, self.clock.now())?;
        pomoquest_core::storage::clear_except_history(&mut self.db)?;
        snapshot::save_session(&mut self.db, &self.session)?;
        Ok(events)
    }
}

/// Events produced by a command, followed by the resulting state.
#[derive(Serialize)]
pub struct Outcome<'a> {
    pub events: &'a [Event],
    pub status: Status,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_outcome(ctx: &Context, events: &[Event]) -> CliResult {
    print_json(&Outcome {
        events,
        status: ctx.status(),
    })
}
