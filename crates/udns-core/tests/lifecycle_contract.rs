//! Architectural Contract Test: Create/Read/Update/Delete Lifecycle
//!
//! This test verifies that every write is followed by a read-back and that
//! the reported state is the one the remote store holds.
//!
//! Constraints verified:
//! - Create and update report the read-back state, not the submitted one
//! - Pool members travel as paired rdata/rdataInfo and come back intact
//! - Server-assigned ids reach the observed state
//! - A profile declared as raw JSON is reported as raw JSON after a write
//!
//! If this test fails, the engine is reporting state it did not read.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use udns_core::config::{
    DirPoolConfig, DirPoolMemberConfig, NotificationConfig, ProbeConfig, TcPoolMemberConfig,
};
use udns_core::identity::Identity;
use udns_core::resource::notification::{NotificationFlags, NotificationInfo, PoolRecordNotification};
use udns_core::resource::{ProbeInfo, RRSet};
use udns_core::{
    DirPool, Engine, Notification, NotificationKey, Probe, ProbeKey, ProfileForm, RRSetKey,
    Record, ResourceState, TcPool,
};

#[tokio::test]
async fn tcpool_create_then_read_reports_defaults() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<TcPool> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let desired = TcPool::from_config(&tcpool_config("tc", &["10.1.0.1"])).unwrap();
    let created = engine.create(&ResourceState::Absent, desired).await.unwrap();

    let observed = engine.read(&RRSetKey::new("example.com", "A", "tc")).await.unwrap();
    assert_eq!(observed, created);

    let pool = observed.resource().unwrap();
    assert_eq!(pool.rdata(), vec!["10.1.0.1"]);
    assert_eq!(pool.ttl, 3600);
    assert!(pool.act_on_probes);
    assert_eq!(observed.id(), Some("tc.example.com"));

    let identities: Vec<u32> = pool.to_config().members.identities().collect();
    assert_eq!(identities, vec![TcPoolMemberConfig::new("10.1.0.1").identity()]);

    // One create, one read-back, one explicit read
    assert_eq!(store.create_call_count(), 1);
    assert_eq!(store.select_call_count(), 2);
}

#[tokio::test]
async fn record_update_reports_read_back() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let state = engine
        .create(
            &ResourceState::Absent,
            Record::from_config(&record_config("www", &["10.0.0.1"])).unwrap(),
        )
        .await
        .unwrap();

    let mut cfg = record_config("www", &["10.0.0.2", "10.0.0.3"]);
    cfg.ttl = 60.into();
    let state = engine
        .update(&state, Record::from_config(&cfg).unwrap())
        .await
        .unwrap();

    let record = state.resource().unwrap();
    assert_eq!(record.rdata, vec!["10.0.0.2", "10.0.0.3"]);
    assert_eq!(record.ttl, 60);
    assert_eq!(store.update_call_count(), 1);
}

#[tokio::test]
async fn string_profile_keeps_declared_form_across_writes() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<Record> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let rd = |order: &str| {
        format!(
            r#"{{"@context":"http://schemas.ultradns.com/RDPool.jsonschema","order":"{}","description":"rd"}}"#,
            order
        )
    };
    let mut cfg = record_config("rd", &["10.0.0.1", "10.0.0.2"]);
    cfg.string_profile = Some(rd("FIXED"));
    let state = engine
        .create(&ResourceState::Absent, Record::from_config(&cfg).unwrap())
        .await
        .unwrap();
    let observed = state.resource().unwrap().to_config();
    assert_eq!(observed.string_profile, Some(rd("FIXED")));
    assert!(observed.rdpool_profile.is_none());

    cfg.string_profile = Some(rd("RANDOM"));
    let state = engine
        .update(&state, Record::from_config(&cfg).unwrap())
        .await
        .unwrap();
    assert_eq!(state.resource().unwrap().to_config().string_profile, Some(rd("RANDOM")));

    // A bare read has no declaration to follow and reports the typed block
    let read = engine.read(&RRSetKey::new("example.com", "A", "rd")).await.unwrap();
    let record = read.resource().unwrap();
    assert_eq!(record.profile_form(), ProfileForm::Typed);
    assert_eq!(record.to_config().rdpool_profile.map(|p| p.order), Some("RANDOM".to_string()));
    assert_eq!(
        record.clone().with_profile_form(ProfileForm::Text).to_config().string_profile,
        Some(rd("RANDOM"))
    );
}

#[tokio::test]
async fn dirpool_lifecycle_keeps_member_identities() {
    let store: ScriptedStore<RRSetKey, RRSet> = ScriptedStore::new();
    let engine: Engine<DirPool> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let cfg = DirPoolConfig::new(
        "example.com",
        "dp",
        [
            DirPoolMemberConfig::all_non_configured("10.1.0.1"),
            DirPoolMemberConfig::all_non_configured("10.1.1.1"),
        ],
    );
    let state = engine
        .create(&ResourceState::Absent, DirPool::from_config(&cfg).unwrap())
        .await
        .unwrap();

    let observed = state.resource().unwrap().to_config();
    let mut ids: Vec<u32> = observed.members.identities().collect();
    ids.sort();
    assert_eq!(ids, vec![200328636, 478925311]);

    let state = engine.delete(&state).await.unwrap();
    assert!(state.is_absent());
}

#[tokio::test]
async fn probe_create_adopts_server_id() {
    let store: ScriptedStore<ProbeKey, ProbeInfo> = ScriptedStore::new();
    let engine: Engine<Probe> = Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let cfg: ProbeConfig = serde_json::from_value(serde_json::json!({
        "zoneName": "example.com",
        "ownerName": "tc",
        "type": "TCP",
        "agents": ["DALLAS", "AMSTERDAM"],
        "threshold": 2,
        "tcp_probe": {
            "port": 443,
            "limits": [{"name": "connect", "warning": 20, "critical": 50, "fail": 100}]
        }
    }))
    .unwrap();

    let state = engine
        .create(&ResourceState::Absent, Probe::from_config(&cfg).unwrap())
        .await
        .unwrap();
    let id = state.id().unwrap().to_string();
    assert!(!id.is_empty());

    // Updating from declared config (no id) targets the present probe
    let mut changed = cfg.clone();
    changed.threshold = 3;
    let state = engine
        .update(&state, Probe::from_config(&changed).unwrap())
        .await
        .unwrap();
    assert_eq!(state.id(), Some(id.as_str()));
    assert_eq!(state.resource().unwrap().threshold, 3);
    assert_eq!(store.memory().len().await, 1);
}

#[tokio::test]
async fn notification_lifecycle() {
    let store: ScriptedStore<NotificationKey, NotificationInfo> = ScriptedStore::new();
    let engine: Engine<Notification> =
        Engine::new(Box::new(ScriptedStore::sharing_counters_with(&store)));

    let cfg = NotificationConfig {
        zone_name: "example.com".into(),
        owner_name: "tc".into(),
        record_type: "A".into(),
        email: "ops@example.com".into(),
        pool_records: vec![PoolRecordNotification {
            pool_record: "10.1.0.1".into(),
            notification: NotificationFlags {
                probe: true,
                record: true,
                scheduled: false,
            },
        }],
    };

    let state = engine
        .create(&ResourceState::Absent, Notification::from_config(&cfg).unwrap())
        .await
        .unwrap();
    assert_eq!(state.id(), Some("tc.example.com/ops@example.com"));
    assert_eq!(state.resource().unwrap().to_config(), cfg);

    let state = engine.delete(&state).await.unwrap();
    assert!(state.is_absent());
    assert_eq!(store.delete_call_count(), 1);
}
