use super::default_true;
use super::sbpool::{BackupRecord, SbRdataInfo};
use serde::{Deserialize, Serialize};

/// Traffic-controller pool profile
///
/// `rdata_info[i]` describes the RRSet's `rdata[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcPoolProfile {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub run_probes: bool,
    #[serde(default = "default_true")]
    pub act_on_probes: bool,
    #[serde(rename = "maxToLB", default, skip_serializing_if = "Option::is_none")]
    pub max_to_lb: Option<u32>,
    #[serde(default)]
    pub rdata_info: Vec<SbRdataInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_record: Option<BackupRecord>,
}

impl Default for TcPoolProfile {
    fn default() -> Self {
        Self {
            description: String::new(),
            run_probes: true,
            act_on_probes: true,
            max_to_lb: None,
            rdata_info: Vec::new(),
            backup_record: None,
        }
    }
}
