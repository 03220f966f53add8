//! Typed resource models
//!
//! Each resource kind converts between three shapes:
//!
//! - its declared configuration (`config.rs`), via `from_config` / `to_config`;
//! - the validated model defined here;
//! - the document the remote store speaks, via [`Resource::to_remote`] /
//!   [`Resource::from_remote`].
//!
//! Models are plain values rebuilt on every call.

pub mod dirpool;
pub mod notification;
pub mod probe;
pub mod record;
pub mod rrset;
pub mod tcpool;

pub use dirpool::DirPool;
pub use notification::{Notification, NotificationInfo, NotificationKey};
pub use probe::{Probe, ProbeDetails, ProbeInfo, ProbeKey, ProbeType};
pub use record::{ProfileForm, Record};
pub use rrset::{RRSet, RRSetKey};
pub use tcpool::TcPool;

use crate::error::Result;
use crate::traits::Ack;
use std::fmt;

/// A resource the engine can reconcile
pub trait Resource: Sized + Send + Sync + 'static {
    /// Immutable address of the resource in the remote store
    type Key: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync;

    /// Document exchanged with the remote store
    type Remote: Send + Sync;

    /// Human-readable resource kind for logs
    const KIND: &'static str;

    /// Key of this resource
    fn key(&self) -> Self::Key;

    /// Identifier reported for a present resource
    fn id(&self) -> String;

    /// Build the document to submit
    fn to_remote(&self) -> Result<Self::Remote>;

    /// Rebuild a model from a fetched document
    fn from_remote(key: &Self::Key, remote: Self::Remote) -> Result<Self>;

    /// Apply what the store reported when accepting a create
    fn acknowledge(self, _ack: &Ack) -> Self {
        self
    }

    /// Carry server-assigned identity over from the present resource
    fn inherit(self, _present: &Self) -> Self {
        self
    }

    /// Carry declaration-only details onto a resource read back after a write
    fn declared_as(self, _declared: &Self) -> Self {
        self
    }
}

/// Fully-qualified name of an owner within a zone
///
/// An empty owner is the zone apex, an owner ending in `.` is already
/// fully qualified, anything else is relative to the zone.
pub fn hostname(owner_name: &str, zone: &str) -> String {
    if owner_name.is_empty() {
        zone.to_string()
    } else if owner_name.ends_with('.') {
        owner_name.to_string()
    } else {
        format!("{}.{}", owner_name, zone)
    }
}
