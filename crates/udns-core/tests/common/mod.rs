//! Test doubles and common utilities for architecture contract tests
//!
//! This module provides a scripted remote store that behaves like the
//! in-memory store but counts calls and can be told to fail.

#![allow(dead_code)]

use udns_core::config::{RecordConfig, TcPoolConfig, TcPoolMemberConfig};
use udns_core::store::{MemoryKey, MemoryStore};
use udns_core::traits::{Ack, ErrorResponse, RemoteStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Remote operations a failure can be scripted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Select,
    Create,
    Update,
    Delete,
}

/// A RemoteStore that tracks calls and fails on demand
pub struct ScriptedStore<K: MemoryKey, V> {
    inner: MemoryStore<K, V>,
    select_call_count: Arc<AtomicUsize>,
    create_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    delete_call_count: Arc<AtomicUsize>,
    /// One-shot failures, consumed by the next call of that operation
    failures: Arc<Mutex<HashMap<Op, StoreError>>>,
    /// When set, select answers with an empty list instead of 70002
    empty_selects: Arc<AtomicBool>,
}

impl<K: MemoryKey, V: Clone + Send + Sync + 'static> ScriptedStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            select_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            delete_call_count: Arc::new(AtomicUsize::new(0)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            empty_selects: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a new ScriptedStore that shares entries and counters with an
    /// existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            inner: other.inner.clone(),
            select_call_count: Arc::clone(&other.select_call_count),
            create_call_count: Arc::clone(&other.create_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
            delete_call_count: Arc::clone(&other.delete_call_count),
            failures: Arc::clone(&other.failures),
            empty_selects: Arc::clone(&other.empty_selects),
        }
    }

    /// Entries held by the store
    pub fn memory(&self) -> &MemoryStore<K, V> {
        &self.inner
    }

    /// Make the next call of `op` fail with `err`
    pub fn fail_next(&self, op: Op, err: StoreError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    /// Answer selects of missing keys with an empty list
    pub fn return_empty_selections(&self) {
        self.empty_selects.store(true, Ordering::SeqCst);
    }

    pub fn select_call_count(&self) -> usize {
        self.select_call_count.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    /// Total number of remote calls of any kind
    pub fn total_call_count(&self) -> usize {
        self.select_call_count()
            + self.create_call_count()
            + self.update_call_count()
            + self.delete_call_count()
    }

    fn scripted(&self, op: Op) -> Option<StoreError> {
        self.failures.lock().unwrap().remove(&op)
    }
}

#[async_trait::async_trait]
impl<K: MemoryKey, V: Clone + Send + Sync + 'static> RemoteStore<K, V> for ScriptedStore<K, V> {
    async fn select(&self, key: &K) -> Result<Vec<V>, StoreError> {
        self.select_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.scripted(Op::Select) {
            return Err(err);
        }
        match self.inner.select(key).await {
            Err(_) if self.empty_selects.load(Ordering::SeqCst) => Ok(Vec::new()),
            other => other,
        }
    }

    async fn create(&self, key: &K, value: &V) -> Result<Ack, StoreError> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.scripted(Op::Create) {
            return Err(err);
        }
        self.inner.create(key, value).await
    }

    async fn update(&self, key: &K, value: &V) -> Result<Ack, StoreError> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.scripted(Op::Update) {
            return Err(err);
        }
        self.inner.update(key, value).await
    }

    async fn delete(&self, key: &K) -> Result<Ack, StoreError> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.scripted(Op::Delete) {
            return Err(err);
        }
        self.inner.delete(key).await
    }
}

/// Provider error envelope with one entry
pub fn provider_error(code: i64, message: &str) -> StoreError {
    StoreError::Responses(vec![ErrorResponse::new(code, message)])
}

/// Provider "not found" envelope
pub fn not_found() -> StoreError {
    provider_error(70002, "Data not found.")
}

/// Plain A record in example.com
pub fn record_config(name: &str, ips: &[&str]) -> RecordConfig {
    RecordConfig::new(
        "example.com",
        name,
        "A",
        ips.iter().map(|ip| ip.to_string()).collect(),
    )
}

/// Traffic-controller pool in example.com with default members
pub fn tcpool_config(name: &str, hosts: &[&str]) -> TcPoolConfig {
    TcPoolConfig::new(
        "example.com",
        name,
        hosts.iter().map(|h| TcPoolMemberConfig::new(*h)),
    )
}
