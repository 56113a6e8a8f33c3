//! Integration tests for the session reducer against a real snapshot store.

use chrono::{Duration, TimeZone, Utc};
use pomoquest_core::storage::{self, snapshot};
use pomoquest_core::{
    Action, Clock, Database, Event, ManualClock, MemoryStore, NotificationCenter, Permission, Phase, Rank,
    SnapshotStore, TimerState,
};
use pomoquest_core::notify::RecordingNotifier;
use proptest::prelude::*;

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap())
}

/// Drive `n` ticks, one simulated second apart.
fn run_ticks(session: &mut pomoquest_core::Session, clock: &ManualClock, n: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..n {
        clock.advance(Duration::seconds(1));
        events.extend(session.update(Action::Tick, clock.now()).unwrap());
    }
    events
}

#[test]
fn twenty_five_minute_session_scenario() {
    let clock = clock();
    let mut session = pomoquest_core::Session::default();
    session.update(Action::SetSessionLength(25), clock.now()).unwrap();
    session.update(Action::ToggleRun, clock.now()).unwrap();

    let events = run_ticks(&mut session, &clock, 1500);

    let session_ends = events
        .iter()
        .filter(|e| matches!(e, Event::SessionEnded { .. }))
        .count();
    assert_eq!(session_ends, 1);
    assert_eq!(session.progress().points, 50);
    assert_eq!(session.timer().phase, Phase::Break);
    assert_eq!(session.timer().remaining_secs, 5 * 60);

    // Further ticks are ignored: the timer stopped itself.
    assert!(run_ticks(&mut session, &clock, 10).is_empty());
    assert_eq!(session.timer().remaining_secs, 5 * 60);
}

#[test]
fn full_cycle_persists_through_database() {
    let clock = clock();
    let mut db = Database::open_memory().unwrap();
    let defaults = TimerState::with_lengths(1, 1, 2);

    let mut session = snapshot::load_session(&db, &defaults);
    snapshot::save_session(&mut db, &session).unwrap();

    session.update(Action::AddTask("Write report".into()), clock.now()).unwrap();
    let id = session.tasks().tasks()[0].id;
    session.update(Action::SetActive(id), clock.now()).unwrap();

    let before = session.clone();
    session.update(Action::Start, clock.now()).unwrap();
    run_ticks(&mut session, &clock, 60);
    snapshot::save_changes(&mut db, &before, &session).unwrap();

    let reloaded = snapshot::load_session(&db, &defaults);
    assert_eq!(reloaded.timer().phase, Phase::Break);
    assert_eq!(reloaded.timer().completed_sessions, 1);
    assert_eq!(reloaded.tasks().get(id).unwrap().elapsed_secs, 60);
    assert_eq!(reloaded.progress().streak, 1);
    assert_eq!(reloaded.progress().history.len(), 1);
    assert!(!reloaded.timer().is_running);
}

#[test]
fn reset_then_reload_keeps_only_history() {
    let clock = clock();
    let mut store = MemoryStore::default();
    let mut session = pomoquest_core::Session::new(TimerState::with_lengths(1, 1, 4));
    session.update(Action::AddPresetTask("Exercise".into()), clock.now()).unwrap();
    session.update(Action::Start, clock.now()).unwrap();
    run_ticks(&mut session, &clock, 60);
    snapshot::save_session(&mut store, &session).unwrap();

    session.update(Action::Reset, clock.now()).unwrap();
    storage::clear_except_history(&mut store).unwrap();
    snapshot::save_session(&mut store, &session).unwrap();

    let reloaded = snapshot::load_session(&store, &TimerState::default());
    assert!(reloaded.tasks().is_empty());
    assert_eq!(reloaded.progress().points, 0);
    assert_eq!(reloaded.progress().rank, Rank::TimeNovice);
    assert_eq!(reloaded.progress().history.len(), 1);
    assert!(store.get("sessionHistory").unwrap().is_some());
}

#[test]
fn rank_up_alert_reaches_granted_notifier() {
    let clock = clock();
    let mut session = pomoquest_core::Session::new(TimerState::with_lengths(1, 1, 4));
    let mut center = NotificationCenter::new(Permission::Granted, Some(RecordingNotifier::default()));

    // Two sessions and one break: 50 + 10 + 50 = 110 points.
    let mut sent = 0;
    for _ in 0..3 {
        session.update(Action::Start, clock.now()).unwrap();
        let events = run_ticks(&mut session, &clock, 60);
        sent += center.dispatch(&events);
    }
    assert_eq!(session.progress().points, 110);
    assert_eq!(session.progress().level, 2);
    assert_eq!(session.progress().rank, Rank::FocusApprentice);
    // Session ended, break ended, session ended, level up, rank up.
    assert_eq!(sent, 5);
}

#[test]
fn at_most_one_active_task_after_any_activation() {
    let clock = clock();
    let mut session = pomoquest_core::Session::default();
    for name in ["a", "b", "c", "d"] {
        session.update(Action::AddTask(name.into()), clock.now()).unwrap();
    }
    let ids: Vec<i64> = session.tasks().tasks().iter().map(|t| t.id).collect();
    for id in [ids[0], ids[2], ids[2], ids[1], ids[3], ids[0]] {
        session.update(Action::SetActive(id), clock.now()).unwrap();
        let active = session.tasks().tasks().iter().filter(|t| t.is_active).count();
        assert!(active <= 1);
    }
}

proptest! {
    #[test]
    fn ticks_count_down_without_underflow(session_min in 1u32..=60, n in 0u32..4000) {
        let clock = clock();
        let mut session = pomoquest_core::Session::new(TimerState::with_lengths(session_min, 5, 4));
        session.update(Action::Start, clock.now()).unwrap();
        let before = session.timer().remaining_secs;
        let ticks = n.min(before);
        run_ticks(&mut session, &clock, ticks);

        if ticks < before {
            prop_assert_eq!(session.timer().remaining_secs, before - ticks);
            prop_assert_eq!(session.timer().phase, Phase::Work);
        } else {
            // Reached zero: the break has been loaded in its place.
            prop_assert_eq!(session.timer().phase, Phase::Break);
            prop_assert_eq!(session.timer().remaining_secs, 5 * 60);
            prop_assert_eq!(session.progress().points, 50);
            prop_assert_eq!(session.progress().streak, 1);
            prop_assert_eq!(session.progress().history.len(), 1);
        }
    }
}
