//! Reconciliation engine
//!
//! The Engine is responsible for:
//! - Checking that an operation is allowed from the current state
//! - Submitting the desired document to the remote store
//! - Classifying the store's answer
//! - Reading the resource back so the reported state is what the store holds
//!
//! ## Architecture
//!
//! ```text
//!   declared config ──from_config──▶ resource ──to_remote──▶ ┌─────────────┐
//!                                                            │ RemoteStore │
//!   observed state ◀──from_remote── resource ◀──select────── └─────────────┘
//! ```
//!
//! ## State Transitions
//!
//! | Operation | From      | Remote call       | Result            |
//! |-----------|-----------|-------------------|-------------------|
//! | create    | Absent    | create, select    | read-back state   |
//! | read      | any       | select            | Absent or Present |
//! | update    | Present   | update, select    | read-back state   |
//! | delete    | Present   | delete, select    | read-back state   |
//! | delete    | Absent    | none              | Absent            |
//!
//! Write failures are returned unchanged; the caller's state stays as it was.

use crate::classify::{Classification, classify};
use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::traits::RemoteStore;
use tracing::{debug, info};

/// Observed state of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState<R> {
    /// The remote store holds nothing under the key
    Absent,
    /// The remote store holds the resource
    Present { id: String, resource: R },
}

impl<R> ResourceState<R> {
    /// State name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            ResourceState::Absent => "absent",
            ResourceState::Present { .. } => "present",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ResourceState::Present { .. })
    }

    pub fn is_absent(&self) -> bool {
        !self.is_present()
    }

    /// Id of a present resource
    pub fn id(&self) -> Option<&str> {
        match self {
            ResourceState::Present { id, .. } => Some(id),
            ResourceState::Absent => None,
        }
    }

    /// The present resource
    pub fn resource(&self) -> Option<&R> {
        match self {
            ResourceState::Present { resource, .. } => Some(resource),
            ResourceState::Absent => None,
        }
    }

    pub fn into_resource(self) -> Option<R> {
        match self {
            ResourceState::Present { resource, .. } => Some(resource),
            ResourceState::Absent => None,
        }
    }
}

impl<R: Resource> ResourceState<R> {
    fn declared_as(self, declared: &R) -> Self {
        match self {
            ResourceState::Present { id, resource } => ResourceState::Present {
                id,
                resource: resource.declared_as(declared),
            },
            ResourceState::Absent => ResourceState::Absent,
        }
    }
}

/// Reconciliation engine for one resource kind
pub struct Engine<R: Resource> {
    store: Box<dyn RemoteStore<R::Key, R::Remote>>,
}

impl<R: Resource> Engine<R> {
    /// Create an engine over a remote store
    pub fn new(store: Box<dyn RemoteStore<R::Key, R::Remote>>) -> Self {
        Self { store }
    }

    /// Create `desired`, which must not exist yet
    pub async fn create(
        &self,
        current: &ResourceState<R>,
        desired: R,
    ) -> Result<ResourceState<R>> {
        if current.is_present() {
            return Err(Error::InvalidTransition {
                operation: "create",
                state: current.name(),
            });
        }

        let key = desired.key();
        let remote = desired.to_remote()?;
        info!("Creating {} {}", R::KIND, key);

        let ack = classify(self.store.create(&key, &remote).await).into_result(&key)?;
        let created = desired.acknowledge(&ack);
        debug!("Created {} {} ({:?})", R::KIND, created.key(), ack);

        Ok(self.read(&created.key()).await?.declared_as(&created))
    }

    /// Observe the resource stored under `key`
    pub async fn read(&self, key: &R::Key) -> Result<ResourceState<R>> {
        debug!("Reading {} {}", R::KIND, key);

        match classify(self.store.select(key).await) {
            Classification::Success(docs) => match docs.into_iter().next() {
                Some(doc) => {
                    let resource = R::from_remote(key, doc)?;
                    Ok(ResourceState::Present {
                        id: resource.id(),
                        resource,
                    })
                }
                None => {
                    debug!("{} {} returned no documents, treating as absent", R::KIND, key);
                    Ok(ResourceState::Absent)
                }
            },
            Classification::NotFound => {
                debug!("{} {} not found, treating as absent", R::KIND, key);
                Ok(ResourceState::Absent)
            }
            Classification::Remote { code, message } => Err(Error::remote(code, message)),
            Classification::Transport(cause) => Err(Error::transport(cause)),
        }
    }

    /// Replace the present resource with `desired`
    pub async fn update(
        &self,
        current: &ResourceState<R>,
        desired: R,
    ) -> Result<ResourceState<R>> {
        let present = match current {
            ResourceState::Present { resource, .. } => resource,
            ResourceState::Absent => {
                return Err(Error::InvalidTransition {
                    operation: "update",
                    state: current.name(),
                });
            }
        };

        let desired = desired.inherit(present);
        let key = present.key();
        if desired.key() != key {
            return Err(Error::ReplacementRequired(format!(
                "{} key changed from {} to {}",
                R::KIND,
                key,
                desired.key()
            )));
        }

        let remote = desired.to_remote()?;
        info!("Updating {} {}", R::KIND, key);
        classify(self.store.update(&key, &remote).await).into_result(&key)?;

        Ok(self.read(&key).await?.declared_as(&desired))
    }

    /// Remove the present resource
    ///
    /// Deleting an absent resource, or one the store no longer has, succeeds.
    pub async fn delete(&self, current: &ResourceState<R>) -> Result<ResourceState<R>> {
        let key = match current {
            ResourceState::Present { resource, .. } => resource.key(),
            ResourceState::Absent => {
                debug!("{} already absent, nothing to delete", R::KIND);
                return Ok(ResourceState::Absent);
            }
        };

        info!("Deleting {} {}", R::KIND, key);
        match classify(self.store.delete(&key).await) {
            Classification::Success(_) => {}
            Classification::NotFound => {
                debug!("{} {} was already gone", R::KIND, key);
            }
            other => {
                other.into_result(&key)?;
            }
        }

        self.read(&key).await
    }
}
