use serde::{Deserialize, Serialize};

/// Resource-distribution pool profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdPoolProfile {
    /// `ROUND_ROBIN`, `FIXED` or `RANDOM`
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_order() -> String {
    "ROUND_ROBIN".to_string()
}

fn default_description() -> String {
    "RD Pool Profile".to_string()
}

impl Default for RdPoolProfile {
    fn default() -> Self {
        Self {
            order: default_order(),
            description: default_description(),
        }
    }
}
