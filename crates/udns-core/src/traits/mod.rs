//! Core traits for the reconciliation system
//!
//! - [`RemoteStore`]: Select/create/update/delete documents in the remote store

pub mod remote_store;

pub use remote_store::{Ack, ErrorResponse, RemoteStore, StoreError};
