// # UltraDNS Client Real Environment Validation Tool
//
// Exercises the REST client against a real UltraDNS account through the
// reconciliation engine.
//
// ## Usage
//
// ```bash
// # Read-only mode (default - safe)
// UDNS_USERNAME=jdoe \
// UDNS_PASSWORD=secret \
// UDNS_ZONE=example.com \
// UDNS_RECORD_NAME=udns-test \
// cargo run --bin udns_validation
//
// # Live mode (creates, updates and deletes the test record!)
// UDNS_MODE=live \
// UDNS_BASE_URL=https://test-restapi.ultradns.com/v1 \
// UDNS_USERNAME=jdoe \
// UDNS_PASSWORD=secret \
// UDNS_ZONE=example.com \
// UDNS_RECORD_NAME=udns-test \
// UDNS_TEST_IP=192.0.2.10 \
// cargo run --bin udns_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `UDNS_USERNAME`, `UDNS_PASSWORD`: account credentials
// - `UDNS_ZONE`: zone holding the test record
// - `UDNS_RECORD_NAME`: owner name of the test record
//
// Optional:
// - `UDNS_BASE_URL`: REST endpoint (default: production)
// - `UDNS_TEST_IP`: rdata for the test record (default: 192.0.2.10)
// - `UDNS_MODE`: "read-only" or "live" (default: read-only)
// - `UDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)

use anyhow::{Context, Result, bail};
use std::env;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use udns_client::UltraDnsClient;
use udns_core::config::RecordConfig;
use udns_core::{Engine, RRSetKey, Record, ResourceState};

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} environment variable is required", name))
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = match env::var("UDNS_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    info!("=== UltraDNS Client Real Environment Validation ===");

    let zone = required("UDNS_ZONE")?;
    let name = required("UDNS_RECORD_NAME")?;
    let test_ip = env::var("UDNS_TEST_IP").unwrap_or_else(|_| "192.0.2.10".to_string());
    let live = env::var("UDNS_MODE").unwrap_or_default().to_lowercase() == "live";

    if live {
        warn!("Running in LIVE mode - will make actual DNS changes!");
    } else {
        warn!("Running in READ-ONLY mode - no changes will be made");
    }

    // Step 1: client from UDNS_* variables
    let client = UltraDnsClient::from_env()?;
    info!("Client created for {}", client.config().base_url);
    info!("Credentials validated (not shown for security)");

    let engine: Engine<Record> = Engine::new(Box::new(client));
    let key = RRSetKey::new(zone.as_str(), "A", name.as_str());

    // Step 2: observe
    let state = engine.read(&key).await?;
    info!("Current state of {}: {}", key, state.name());
    if let Some(record) = state.resource() {
        info!("  rdata: {:?}, ttl: {}", record.rdata, record.ttl);
    }

    if !live {
        info!("=== READ-ONLY COMPLETE ===");
        info!("To exercise create/update/delete, set UDNS_MODE=live");
        return Ok(());
    }

    if state.is_present() {
        error!("{} already exists, refusing to touch it", key);
        bail!("test record must not exist before a live run");
    }

    // Step 3: create
    let mut cfg = RecordConfig::new(zone.as_str(), name.as_str(), "A", vec![test_ip.clone()]);
    cfg.ttl = 300.into();
    let state = engine
        .create(&ResourceState::Absent, Record::from_config(&cfg)?)
        .await?;
    info!("✓ Created {} ({:?})", key, state.id());

    // Step 4: update
    cfg.ttl = 600.into();
    let state = engine.update(&state, Record::from_config(&cfg)?).await?;
    match state.resource() {
        Some(record) if record.ttl == 600 => info!("✓ Update read back ttl 600"),
        other => warn!("⚠ Unexpected state after update: {:?}", other),
    }

    // Step 5: delete, then confirm absence
    let state = engine.delete(&state).await?;
    if state.is_absent() {
        info!("✓ Deleted {}", key);
    } else {
        bail!("{} still present after delete", key);
    }

    info!("=== LIVE MODE COMPLETE ===");
    Ok(())
}
