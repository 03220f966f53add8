use crate::profile::ProfileDocument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of an RRSet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RRSetKey {
    pub zone: String,
    #[serde(rename = "type")]
    pub rr_type: String,
    pub name: String,
}

impl RRSetKey {
    pub fn new(
        zone: impl Into<String>,
        rr_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            rr_type: rr_type.into(),
            name: name.into(),
        }
    }

    /// Resource id, `name.zone`
    pub fn id(&self) -> String {
        format!("{}.{}", self.name, self.zone)
    }
}

impl fmt::Display for RRSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} in {}", self.rr_type, self.name, self.zone)
    }
}

/// RRSet as exchanged with the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RRSet {
    pub owner_name: String,
    #[serde(rename = "rrtype")]
    pub rr_type: String,
    #[serde(default)]
    pub rdata: Vec<String>,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDocument>,
}
