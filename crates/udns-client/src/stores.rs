// RemoteStore implementations for the UltraDNS endpoints
//
// Each impl maps a key onto the segments of its resource path and exchanges
// the documents of `udns_core::resource` as JSON. Segments are encoded by
// the client, so zone, owner and email values are passed through as-is.

use crate::{UltraDnsClient, ack_from, json_body};
use async_trait::async_trait;
use serde::Deserialize;
use udns_core::resource::{NotificationInfo, ProbeInfo, ProbeKey, RRSet};
use udns_core::traits::{Ack, RemoteStore, StoreError};
use udns_core::{NotificationKey, RRSetKey};

fn rrset_path<'a>(zone: &'a str, rr_type: &'a str, name: &'a str) -> Vec<&'a str> {
    vec!["zones", zone, "rrsets", rr_type, name]
}

fn probes_path(key: &ProbeKey) -> Vec<&str> {
    let mut path = rrset_path(&key.zone, "ANY", &key.name);
    path.push("probes");
    path
}

fn probe_path(key: &ProbeKey) -> Result<Vec<&str>, StoreError> {
    if key.id.is_empty() {
        return Err(StoreError::Transport(format!(
            "{} has no server-assigned id",
            key
        )));
    }
    let mut path = probes_path(key);
    path.push(&key.id);
    Ok(path)
}

fn notification_path(key: &NotificationKey) -> Vec<&str> {
    let mut path = rrset_path(&key.zone, &key.rr_type, &key.name);
    path.extend(["notifications", key.email.as_str()]);
    path
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RRSetList {
    #[serde(default)]
    rr_sets: Vec<RRSet>,
}

/// ```http
/// GET|POST|PUT|DELETE /zones/:zone/rrsets/:type/:name
/// ```
#[async_trait]
impl RemoteStore<RRSetKey, RRSet> for UltraDnsClient {
    async fn select(&self, key: &RRSetKey) -> Result<Vec<RRSet>, StoreError> {
        tracing::debug!("GET rrset {}", key);
        let path = rrset_path(&key.zone, &key.rr_type, &key.name);
        let response = self.execute(self.get_request(&path)?).await?;
        let list: RRSetList = json_body(response).await?;
        Ok(list.rr_sets)
    }

    async fn create(&self, key: &RRSetKey, value: &RRSet) -> Result<Ack, StoreError> {
        tracing::debug!("POST rrset {}", key);
        let path = rrset_path(&key.zone, &key.rr_type, &key.name);
        let response = self.execute(self.post_request(&path)?.json(value)).await?;
        Ok(ack_from(response.headers()))
    }

    async fn update(&self, key: &RRSetKey, value: &RRSet) -> Result<Ack, StoreError> {
        tracing::debug!("PUT rrset {}", key);
        let path = rrset_path(&key.zone, &key.rr_type, &key.name);
        let response = self.execute(self.put_request(&path)?.json(value)).await?;
        Ok(ack_from(response.headers()))
    }

    async fn delete(&self, key: &RRSetKey) -> Result<Ack, StoreError> {
        tracing::debug!("DELETE rrset {}", key);
        let path = rrset_path(&key.zone, &key.rr_type, &key.name);
        let response = self.execute(self.delete_request(&path)?).await?;
        Ok(ack_from(response.headers()))
    }
}

/// ```http
/// GET|POST /zones/:zone/rrsets/ANY/:name/probes
/// GET|PUT|DELETE /zones/:zone/rrsets/ANY/:name/probes/:id
/// ```
///
/// A key without an id names no probe: selecting it finds nothing and makes
/// no request.
#[async_trait]
impl RemoteStore<ProbeKey, ProbeInfo> for UltraDnsClient {
    async fn select(&self, key: &ProbeKey) -> Result<Vec<ProbeInfo>, StoreError> {
        tracing::debug!("GET {}", key);
        if key.id.is_empty() {
            tracing::debug!("{} has no id yet, nothing to select", key);
            return Ok(Vec::new());
        }
        let response = self.execute(self.get_request(&probe_path(key)?)?).await?;
        let probe: ProbeInfo = json_body(response).await?;
        Ok(vec![probe])
    }

    async fn create(&self, key: &ProbeKey, value: &ProbeInfo) -> Result<Ack, StoreError> {
        tracing::debug!("POST {}", key);
        let response = self.execute(self.post_request(&probes_path(key))?.json(value)).await?;
        Ok(ack_from(response.headers()))
    }

    async fn update(&self, key: &ProbeKey, value: &ProbeInfo) -> Result<Ack, StoreError> {
        tracing::debug!("PUT {}", key);
        let response = self.execute(self.put_request(&probe_path(key)?)?.json(value)).await?;
        Ok(ack_from(response.headers()))
    }

    async fn delete(&self, key: &ProbeKey) -> Result<Ack, StoreError> {
        tracing::debug!("DELETE {}", key);
        let response = self.execute(self.delete_request(&probe_path(key)?)?).await?;
        Ok(ack_from(response.headers()))
    }
}

/// ```http
/// GET|POST|PUT|DELETE /zones/:zone/rrsets/:type/:name/notifications/:email
/// ```
#[async_trait]
impl RemoteStore<NotificationKey, NotificationInfo> for UltraDnsClient {
    async fn select(&self, key: &NotificationKey) -> Result<Vec<NotificationInfo>, StoreError> {
        tracing::debug!("GET {}", key);
        let response = self.execute(self.get_request(&notification_path(key))?).await?;
        let notification: NotificationInfo = json_body(response).await?;
        Ok(vec![notification])
    }

    async fn create(&self, key: &NotificationKey, value: &NotificationInfo) -> Result<Ack, StoreError> {
        tracing::debug!("POST {}", key);
        let response = self
            .execute(self.post_request(&notification_path(key))?.json(value))
            .await?;
        Ok(ack_from(response.headers()))
    }

    async fn update(&self, key: &NotificationKey, value: &NotificationInfo) -> Result<Ack, StoreError> {
        tracing::debug!("PUT {}", key);
        let response = self
            .execute(self.put_request(&notification_path(key))?.json(value))
            .await?;
        Ok(ack_from(response.headers()))
    }

    async fn delete(&self, key: &NotificationKey) -> Result<Ack, StoreError> {
        tracing::debug!("DELETE {}", key);
        let response = self.execute(self.delete_request(&notification_path(key))?).await?;
        Ok(ack_from(response.headers()))
    }
}
