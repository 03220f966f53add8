// # Memory Remote Store
//
// In-memory implementation of RemoteStore.
//
// ## Purpose
//
// Stands in for the UltraDNS API when embedding the engine or testing it:
// documents are kept in a HashMap, and failures are reported with the same
// error envelope the API uses, so the classifier sees realistic input.
//
// ## Behavior
//
// - select/update/delete of a missing key answer error 70002
// - create of an existing key answers error 2111
// - create assigns an id, reported in the acknowledgement

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::classify::NOT_FOUND_CODE;
use crate::resource::{NotificationKey, ProbeKey, RRSetKey};
use crate::traits::{Ack, ErrorResponse, RemoteStore, StoreError};

/// Provider error code for "resource already exists"
pub const ALREADY_EXISTS_CODE: i64 = 2111;

/// Keys usable with [`MemoryStore`]
pub trait MemoryKey: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {
    /// Key a newly created entry is stored under, given its assigned id
    fn assign(&self, _id: &str) -> Self {
        self.clone()
    }
}

impl MemoryKey for RRSetKey {}

impl MemoryKey for NotificationKey {}

impl MemoryKey for ProbeKey {
    fn assign(&self, id: &str) -> Self {
        ProbeKey {
            id: id.to_string(),
            ..self.clone()
        }
    }
}

/// In-memory remote store
///
/// Clones share the same entries.
///
/// # Example
///
/// ```rust,no_run
/// use udns_core::store::MemoryStore;
/// use udns_core::traits::RemoteStore;
/// use udns_core::{RRSet, RRSetKey};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store: MemoryStore<RRSetKey, RRSet> = MemoryStore::new();
///     let key = RRSetKey::new("example.com", "A", "www");
///
///     assert!(store.select(&key).await.is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    next_id: Arc<AtomicU64>,
}

impl<K: MemoryKey, V: Clone + Send + Sync> MemoryStore<K, V> {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get the number of entries in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Fetch an entry without going through the trait
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.read().await.get(key).cloned()
    }

    /// Store an entry directly, bypassing create semantics
    pub async fn insert(&self, key: K, value: V) {
        self.inner.write().await.insert(key, value);
    }

    fn not_found(key: &K) -> StoreError {
        StoreError::Responses(vec![ErrorResponse::new(
            NOT_FOUND_CODE,
            format!("Data not found: {}", key),
        )])
    }
}

impl<K: MemoryKey, V: Clone + Send + Sync> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K: MemoryKey, V: Clone + Send + Sync + 'static> RemoteStore<K, V> for MemoryStore<K, V> {
    async fn select(&self, key: &K) -> Result<Vec<V>, StoreError> {
        let guard = self.inner.read().await;
        guard
            .get(key)
            .map(|value| vec![value.clone()])
            .ok_or_else(|| Self::not_found(key))
    }

    async fn create(&self, key: &K, value: &V) -> Result<Ack, StoreError> {
        let id = format!("{:016X}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let stored = key.assign(&id);

        let mut guard = self.inner.write().await;
        if guard.contains_key(&stored) {
            return Err(StoreError::Responses(vec![ErrorResponse::new(
                ALREADY_EXISTS_CODE,
                format!("Resource already exists: {}", stored),
            )]));
        }
        guard.insert(stored, value.clone());
        Ok(Ack {
            location: None,
            id: Some(id),
        })
    }

    async fn update(&self, key: &K, value: &V) -> Result<Ack, StoreError> {
        let mut guard = self.inner.write().await;
        match guard.get_mut(key) {
            Some(existing) => {
                *existing = value.clone();
                Ok(Ack::default())
            }
            None => Err(Self::not_found(key)),
        }
    }

    async fn delete(&self, key: &K) -> Result<Ack, StoreError> {
        let mut guard = self.inner.write().await;
        guard
            .remove(key)
            .map(|_| Ack::default())
            .ok_or_else(|| Self::not_found(key))
    }
}
