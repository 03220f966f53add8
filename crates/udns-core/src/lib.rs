// # udns-core
//
// Core library for reconciling declared UltraDNS record-sets against the
// remote store.
//
// ## Architecture Overview
//
// - **Identity**: Stable CRC-32 fingerprints for unordered pool members
// - **Profile**: `@context`-tagged profile documents and their codec
// - **Resource**: Typed record, pool, probe and notification models built
//   from declared configuration and from remote documents
// - **Engine**: Create/Read/Update/Delete against a `RemoteStore`
// - **Classify**: Maps remote error envelopes onto the error taxonomy
//
// ## Design Principles
//
// 1. **Validate first**: configuration errors surface before any remote call
// 2. **Fresh values**: every model is rebuilt per call, never patched in place
// 3. **Paired construction**: pool rdata and member metadata come from one pass
// 4. **No hidden retries**: failures are returned to the caller as they are

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod profile;
pub mod resource;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use classify::{Classification, NOT_FOUND_CODE, classify};
pub use engine::{Engine, ResourceState};
pub use error::{Error, Result};
pub use identity::{Identity, IdentitySet};
pub use profile::{Profile, ProfileDocument, ProfileKind, ProfileSchema};
pub use resource::{
    DirPool, Notification, NotificationKey, Probe, ProbeKey, ProfileForm, RRSet, RRSetKey, Record,
    Resource, TcPool,
};
pub use store::MemoryStore;
pub use traits::{Ack, ErrorResponse, RemoteStore, StoreError};
