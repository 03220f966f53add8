//! Architectural Contract Test: Failure Propagation
//!
//! This test verifies that the engine never hides, retries or reinterprets
//! failures.
//!
//! Constraints verified:
//! - Provider errors on writes are returned with their code and message
//! - A failed write is not followed by a read-back
//! - Transport failures surface as Transport
//! - Invalid transitions and key changes are rejected before any remote call
//! - Each write is attempted exactly once
//!
//! If this test fails, someone has added hidden retry behavior or the engine
//! is reporting state it did not read.

mod common;

use common::*;
use udns_core::resource::RRSet;
use udns_core::traits::StoreError;
use udns_core::{Engine, Error, RRSetKey, Record, ResourceState, TcPool};

async fn present_record(engine: &Engine<Record>) -> ResourceState<Record> {
    engine
        .create(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn remote_error_on_update_is_surfaced_once() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));
    let state = present_record(&engine).await;
    let selects_before = store.select_call_count();

    store.fail_next(Op::Update, provider_error(56001, "Invalid rdata"));
    let err = engine
        .update(
            &state,
            Record::from_config(&record_config("www", &["10.0.0.2"])).unwrap(),
        )
        .await
        .unwrap_err();

    match err {
        Error::Remote { code, message } => {
            assert_eq!(code, 56001);
            assert_eq!(message, "Invalid rdata");
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(store.update_call_count(), 1, "no retry");
    assert_eq!(store.select_call_count(), selects_before, "no read-back after failure");

    // Remote state is untouched
    let observed = engine.read(&state.resource().unwrap().key).await.unwrap();
    assert_eq!(observed, state);
}

#[tokio::test]
async fn transport_failure_on_create_is_surfaced() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    store.fail_next(Op::Create, StoreError::Transport("connection reset".into()));
    let err = engine
        .create(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(ref cause) if cause == "connection reset"));
    assert_eq!(store.create_call_count(), 1);
    assert_eq!(store.select_call_count(), 0);
}

#[tokio::test]
async fn remote_error_on_read_is_fatal() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    store.fail_next(Op::Select, provider_error(60001, "Invalid token"));
    let err = engine
        .read(&RRSetKey::new("example.com", "A", "www"))
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, Error::Remote { code: 60001, .. }));
}

#[tokio::test]
async fn first_envelope_entry_decides() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    store.fail_next(
        Op::Select,
        StoreError::Responses(vec![
            udns_core::ErrorResponse::new(70002, "Data not found."),
            udns_core::ErrorResponse::new(60001, "Invalid token"),
        ]),
    );
    let state = engine
        .read(&RRSetKey::new("example.com", "A", "www"))
        .await
        .unwrap();
    assert!(state.is_absent());
}

#[tokio::test]
async fn invalid_transitions_make_no_remote_call() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));
    let state = present_record(&engine).await;
    let calls = store.total_call_count();

    let err = engine
        .create(
            &state,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));

    let err = engine
        .update(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));

    assert_eq!(store.total_call_count(), calls);
}

#[tokio::test]
async fn key_change_requires_replacement() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<TcPool> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine
        .create(
            &ResourceState::Absent,
            TcPool::from_config(&tcpool_config("tc", &["10.6.0.1"])).unwrap(),
        )
        .await
        .unwrap();
    let calls = store.total_call_count();

    let renamed = TcPool::from_config(&tcpool_config("tc2", &["10.6.0.1"])).unwrap();
    let err = engine.update(&state, renamed).await.unwrap_err();
    assert!(matches!(err, Error::ReplacementRequired(_)));
    assert_eq!(store.total_call_count(), calls);
}

#[tokio::test]
async fn duplicate_create_reports_provider_code() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let first: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));
    let second: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));
    present_record(&first).await;

    // A second writer that has not observed the record yet
    let err = second
        .create(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.9"])).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote { code: 2111, .. }));
}
