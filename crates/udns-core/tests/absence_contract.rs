//! Architectural Contract Test: Absence Semantics
//!
//! This test verifies that "does not exist" is an observation, not a
//! failure.
//!
//! Constraints verified:
//! - A 70002 answer on read yields Absent
//! - An empty selection yields Absent
//! - Deleting an absent resource makes no remote call
//! - Deleting a resource the store already dropped succeeds
//! - After a delete, reads keep reporting Absent
//!
//! If this test fails, a vanished resource will surface as an error and
//! block reconciliation.

mod common;

use common::*;
use udns_core::resource::RRSet;
use udns_core::{Engine, RRSetKey, Record, ResourceState};

fn www() -> RRSetKey {
    RRSetKey::new("example.com", "A", "www")
}

#[tokio::test]
async fn not_found_read_is_absent() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine.read(&www()).await.expect("70002 is not an error");
    assert_eq!(state, ResourceState::Absent);
    assert_eq!(store.select_call_count(), 1);
}

#[tokio::test]
async fn empty_selection_is_absent() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    store.return_empty_selections();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine.read(&www()).await.unwrap();
    assert!(state.is_absent());
}

#[tokio::test]
async fn deleting_absent_makes_no_remote_call() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine.delete(&ResourceState::Absent).await.unwrap();
    assert!(state.is_absent());
    assert_eq!(store.total_call_count(), 0);
}

#[tokio::test]
async fn deleting_vanished_resource_succeeds() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine
        .create(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap();

    // Someone else removed it out of band
    store.fail_next(Op::Delete, not_found());

    let state = engine.delete(&state).await.expect("70002 on delete is success");
    // The scripted failure left the entry in place, and the read-back says so
    assert!(state.is_present());
    assert_eq!(store.delete_call_count(), 1);
}

#[tokio::test]
async fn reads_after_delete_stay_absent() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine
        .create(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap();
    let state = engine.delete(&state).await.unwrap();
    assert!(state.is_absent());

    for _ in 0..3 {
        assert!(engine.read(&www()).await.unwrap().is_absent());
    }
}
