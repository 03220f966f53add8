use super::is_false;
use crate::error::{Error, Result};
use crate::identity::{Canonical, Identity, identity_key};
use serde::{Deserialize, Serialize};

/// Directional pool profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirPoolProfile {
    #[serde(default)]
    pub description: String,
    /// `GEO` or `IP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_resolve: Option<String>,
    #[serde(default)]
    pub rdata_info: Vec<DpRdataInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_response: Option<DpRdataInfo>,
}

/// Targeting of one directional member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpRdataInfo {
    #[serde(default, skip_serializing_if = "is_false")]
    pub all_non_configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_info: Option<GeoInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_info: Option<IpInfo>,
}

/// Named group of geographic codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_account_level: bool,
    #[serde(default)]
    pub codes: Vec<String>,
}

/// Named group of source addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_account_level: bool,
    #[serde(default)]
    pub ips: Vec<IpAddress>,
}

/// A source address as a range, a CIDR block or a single address
///
/// Shared by the declared configuration and the wire format, which use the
/// same field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl IpAddress {
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            ..Default::default()
        }
    }

    pub fn cidr(cidr: impl Into<String>) -> Self {
        Self {
            cidr: Some(cidr.into()),
            ..Default::default()
        }
    }

    pub fn address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Default::default()
        }
    }

    /// Check that exactly one of `start`+`end`, `cidr` or `address` is set
    pub fn validate(&self) -> Result<()> {
        let range = filled(&self.start) || filled(&self.end);
        if range && !(filled(&self.start) && filled(&self.end)) {
            return Err(Error::validation(
                "IP range requires both start and end",
            ));
        }
        let forms = [range, filled(&self.cidr), filled(&self.address)]
            .into_iter()
            .filter(|set| *set)
            .count();
        if forms != 1 {
            return Err(Error::validation(
                "IP entry must set exactly one of start/end, cidr or address",
            ));
        }
        Ok(())
    }
}

impl Identity for IpAddress {
    fn write_canonical(&self, out: &mut Canonical) {
        out.present(self.start.as_deref())
            .present(self.end.as_deref())
            .present(self.cidr.as_deref())
            .present(self.address.as_deref());
    }

    /// Entries order among themselves by all four slots, empty ones included
    fn identity(&self) -> u32 {
        let slot = |v: &Option<String>| v.clone().unwrap_or_default();
        identity_key(&format!(
            "{}-{}-{}-{}",
            slot(&self.start),
            slot(&self.end),
            slot(&self.cidr),
            slot(&self.address)
        ))
    }
}
