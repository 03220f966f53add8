use super::Resource;
use crate::config::NotificationConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which events are mailed for one pool record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFlags {
    #[serde(default)]
    pub probe: bool,
    #[serde(default)]
    pub record: bool,
    #[serde(default)]
    pub scheduled: bool,
}

/// Notification settings for one pool record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecordNotification {
    pub pool_record: String,
    #[serde(default)]
    pub notification: NotificationFlags,
}

/// Address of a notification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub zone: String,
    pub name: String,
    pub rr_type: String,
    pub email: String,
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "notification {} for {} {} in {}",
            self.email, self.rr_type, self.name, self.zone
        )
    }
}

/// Notification as exchanged with the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub pool_records: Vec<PoolRecordNotification>,
}

/// Probe-event notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub key: NotificationKey,
    pub pool_records: Vec<PoolRecordNotification>,
}

impl Notification {
    /// Build a notification from its declared configuration
    pub fn from_config(cfg: &NotificationConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            key: NotificationKey {
                zone: cfg.zone_name.clone(),
                name: cfg.owner_name.clone(),
                rr_type: cfg.record_type.clone(),
                email: cfg.email.clone(),
            },
            pool_records: cfg.pool_records.clone(),
        })
    }

    /// Flatten back into configuration
    pub fn to_config(&self) -> NotificationConfig {
        NotificationConfig {
            zone_name: self.key.zone.clone(),
            owner_name: self.key.name.clone(),
            record_type: self.key.rr_type.clone(),
            email: self.key.email.clone(),
            pool_records: self.pool_records.clone(),
        }
    }
}

impl Resource for Notification {
    type Key = NotificationKey;
    type Remote = NotificationInfo;

    const KIND: &'static str = "notification";

    fn key(&self) -> NotificationKey {
        self.key.clone()
    }

    fn id(&self) -> String {
        format!("{}.{}/{}", self.key.name, self.key.zone, self.key.email)
    }

    fn to_remote(&self) -> Result<NotificationInfo> {
        Ok(NotificationInfo {
            email: self.key.email.clone(),
            pool_records: self.pool_records.clone(),
        })
    }

    fn from_remote(key: &NotificationKey, remote: NotificationInfo) -> Result<Self> {
        Ok(Self {
            key: key.clone(),
            pool_records: remote.pool_records,
        })
    }
}
