//! Minimal embedding example for udns-core
//!
//! This example reconciles a traffic-controller pool against the in-memory
//! store: declare, create, update, read back and delete. The same engine
//! runs unchanged over `udns_client::UltraDnsClient`.

use anyhow::{Context, Result};
use std::env;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use udns_core::config::TcPoolConfig;
use udns_core::resource::RRSet;
use udns_core::{Engine, MemoryStore, RRSetKey, ResourceState, TcPool};

fn log_level() -> Level {
    match env::var("UDNS_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Declared pool, in the shape a configuration file would carry it
fn declared(weight: u32) -> Result<TcPoolConfig> {
    let cfg: TcPoolConfig = serde_json::from_value(serde_json::json!({
        "zone": "example.com",
        "name": "tc",
        "ttl": 300,
        "description": "traffic controller pool with all settings",
        "run_probes": false,
        "act_on_probes": false,
        "max_to_lb": 2,
        "members": [
            {"host": "10.6.0.1", "priority": 1, "weight": weight},
            {"host": "10.6.0.2", "priority": 2, "run_probes": false, "failover_delay": 30},
        ],
        "backup_record_rdata": "10.6.0.3",
        "backup_record_failover_delay": 30,
    }))
    .context("pool configuration does not parse")?;
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(log_level()).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    info!("=== Embedded udns-core Example ===");

    let store: MemoryStore<RRSetKey, RRSet> = MemoryStore::new();
    let engine: Engine<TcPool> = Engine::new(Box::new(store.clone()));

    // 1. Create
    let state = engine
        .create(&ResourceState::Absent, TcPool::from_config(&declared(2)?)?)
        .await?;
    info!("1. Created {:?} with id {:?}", state.name(), state.id());

    // 2. Update one member
    let state = engine
        .update(&state, TcPool::from_config(&declared(10)?)?)
        .await?;
    if let Some(pool) = state.resource() {
        for (identity, member) in pool.to_config().members.entries() {
            info!("2. Member {} -> {} (weight {})", identity, member.host, member.weight);
        }
    }

    // 3. Observe what the store holds
    let key = RRSetKey::new("example.com", "A", "tc");
    if let Some(rrset) = store.get(&key).await {
        if let Some(profile) = &rrset.profile {
            info!("3. Stored profile: {}", profile);
        }
    }

    // 4. Delete, twice: the second one is a no-op
    let state = engine.delete(&state).await?;
    let state = engine.delete(&state).await?;
    info!("4. After delete: {}", state.name());

    info!("=== Embedding Successful ===");
    Ok(())
}
