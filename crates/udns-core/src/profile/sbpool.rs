use super::{default_true, is_zero};
use serde::{Deserialize, Serialize};

/// Per-member attributes shared by SB and TC pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbRdataInfo {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_true")]
    pub run_probes: bool,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub failover_delay: u32,
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

pub(crate) fn default_state() -> String {
    "NORMAL".to_string()
}

pub(crate) fn default_priority() -> u32 {
    1
}

pub(crate) fn default_threshold() -> u32 {
    1
}

pub(crate) fn default_weight() -> u32 {
    2
}

impl Default for SbRdataInfo {
    fn default() -> Self {
        Self {
            state: default_state(),
            run_probes: true,
            priority: default_priority(),
            failover_delay: 0,
            threshold: default_threshold(),
            weight: default_weight(),
        }
    }
}

/// Record served when every pool member is down
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    pub rdata: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub failover_delay: u32,
}

/// Simple load-balancing pool profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbPoolProfile {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub run_probes: bool,
    #[serde(default = "default_true")]
    pub act_on_probes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_active: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_served: Option<u32>,
    #[serde(default)]
    pub rdata_info: Vec<SbRdataInfo>,
    #[serde(default)]
    pub backup_records: Vec<BackupRecord>,
}

impl Default for SbPoolProfile {
    fn default() -> Self {
        Self {
            description: String::new(),
            run_probes: true,
            act_on_probes: true,
            order: None,
            max_active: None,
            max_served: None,
            rdata_info: Vec::new(),
            backup_records: Vec::new(),
        }
    }
}
