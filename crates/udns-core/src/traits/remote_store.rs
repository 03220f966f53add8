// # Remote Store Trait
//
// Defines the interface to the service that owns the authoritative copy of
// each resource.
//
// ## Purpose
//
// The engine never talks HTTP. It hands keys and documents to a
// `RemoteStore` and gets back documents, acknowledgements or the store's
// error envelope, which the classifier then maps onto the error taxonomy.
//
// ## Implementations
//
// - `MemoryStore` in this crate (tests, embedding)
// - `udns-client` over the UltraDNS REST API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of a provider error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_code: i64,
    #[serde(default)]
    pub error_message: String,
}

impl ErrorResponse {
    pub fn new(error_code: i64, error_message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
        }
    }
}

/// Failure reported by a remote store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The provider answered with an error envelope
    #[error("provider returned {} error(s)", .0.len())]
    Responses(Vec<ErrorResponse>),

    /// No usable answer: connection failure, timeout, unreadable body
    #[error("transport failure: {0}")]
    Transport(String),
}

/// What the store reported when accepting a write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    /// `Location` response header
    pub location: Option<String>,
    /// `ID` response header
    pub id: Option<String>,
}

/// Trait for remote store implementations
///
/// `K` addresses a resource, `V` is the document the store speaks.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Implementation Guidelines
///
/// - **No retries**: report the first failure as it happened
/// - **No interpretation**: return the provider's error envelope unchanged
#[async_trait]
pub trait RemoteStore<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    /// Fetch the documents stored under a key
    ///
    /// # Returns
    ///
    /// - `Ok(docs)`: Zero or more documents; only the first is used
    /// - `Err(StoreError)`: Provider error envelope or transport failure
    async fn select(&self, key: &K) -> Result<Vec<V>, StoreError>;

    /// Create a document under a key
    async fn create(&self, key: &K, value: &V) -> Result<Ack, StoreError>;

    /// Replace the document under a key
    async fn update(&self, key: &K, value: &V) -> Result<Ack, StoreError>;

    /// Remove the document under a key
    async fn delete(&self, key: &K) -> Result<Ack, StoreError>;
}
