// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::testing::RecordingSubscriber;
use std::time::Duration;

fn session(id: &str) -> Arc<Session> {
    Arc::new(Session::new(
        id,
        "127.0.0.1",
        Arc::new(RecordingSubscriber::new()),
        Duration::from_secs(60),
    ))
}

fn ids(snapshot: &Snapshot) -> Vec<String> {
    let mut ids: Vec<String> = snapshot.iter().map(|s| s.id().0.clone()).collect();
    ids.sort();
    ids
}

#[test]
fn empty_table_has_empty_snapshot() {
    let table = SessionTable::new();
    assert!(table.is_empty());
    assert!(table.snapshot().is_empty());
}

#[test]
fn snapshot_reflects_insert_on_next_read() {
    let table = SessionTable::new();
    let before = table.snapshot();

    table.insert(session("a"));
    table.insert(session("b"));

    assert!(before.is_empty());
    assert_eq!(ids(&table.snapshot()), vec!["a", "b"]);
}

#[test]
fn clean_snapshot_is_reference_stable() {
    let table = SessionTable::new();
    table.insert(session("a"));

    let first = table.snapshot();
    let second = table.snapshot();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn remove_marks_snapshot_stale() {
    let table = SessionTable::new();
    table.insert(session("a"));
    table.insert(session("b"));
    let full = table.snapshot();

    let removed = table.remove(&SessionId("a".to_string()));

    assert!(removed.is_some());
    let fresh = table.snapshot();
    assert!(!Arc::ptr_eq(&full, &fresh));
    assert_eq!(ids(&fresh), vec!["b"]);
    // Readers holding the old snapshot still see it intact
    assert_eq!(ids(&full), vec!["a", "b"]);
}

#[test]
fn removing_absent_session_keeps_snapshot() {
    let table = SessionTable::new();
    table.insert(session("a"));
    let first = table.snapshot();

    assert!(table.remove(&SessionId("missing".to_string())).is_none());

    assert!(Arc::ptr_eq(&first, &table.snapshot()));
}

#[test]
fn insert_replaces_same_id() {
    let table = SessionTable::new();
    table.insert(session("a"));

    let previous = table.insert(session("a"));

    assert!(previous.is_some());
    assert_eq!(table.len(), 1);
    assert_eq!(table.snapshot().len(), 1);
}

#[test]
fn clear_empties_map_and_snapshot() {
    let table = SessionTable::new();
    table.insert(session("a"));
    let _ = table.snapshot();
    table.insert(session("b"));

    table.clear();

    assert!(table.is_empty());
    assert!(table.snapshot().is_empty());
}

#[test]
fn lookups_by_str() {
    let table = SessionTable::new();
    table.insert(session("a"));

    assert!(table.contains("a"));
    assert!(!table.contains("b"));
    assert_eq!(table.get("a").map(|s| s.id().0.clone()), Some("a".to_string()));
    assert_eq!(table.all().len(), 1);
}

#[test]
fn concurrent_writers_and_readers_converge() {
    let table = Arc::new(SessionTable::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let table = Arc::clone(&table);
            std::thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("t{}-{}", t, i);
                    table.insert(session(&id));
                    let _ = table.snapshot();
                    if i % 2 == 0 {
                        table.remove(&SessionId(id));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.len(), 100);
    assert_eq!(table.snapshot().len(), 100);
}
