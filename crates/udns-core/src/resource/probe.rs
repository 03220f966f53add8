//! Health probes attached to pools
//!
//! A probe is addressed by zone, owner name and the id the server assigns
//! on create. Its detail block depends on the probe type; the detail types
//! are shared by the declared configuration and the wire format.

use super::Resource;
use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::traits::Ack;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeType {
    Ping,
    Http,
    Ftp,
    Smtp,
    SmtpSend,
    Dns,
    Tcp,
}

impl ProbeType {
    pub const ALL: [ProbeType; 7] = [
        Self::Ping,
        Self::Http,
        Self::Ftp,
        Self::Smtp,
        Self::SmtpSend,
        Self::Dns,
        Self::Tcp,
    ];

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "PING",
            Self::Http => "HTTP",
            Self::Ftp => "FTP",
            Self::Smtp => "SMTP",
            Self::SmtpSend => "SMTP_SEND",
            Self::Dns => "DNS",
            Self::Tcp => "TCP",
        }
    }

    /// Configuration attribute holding this type's detail block
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Ping => "ping_probe",
            Self::Http => "http_probe",
            Self::Ftp => "ftp_probe",
            Self::Smtp => "smtp_probe",
            Self::SmtpSend => "smtpsend_probe",
            Self::Dns => "dns_probe",
            Self::Tcp => "tcp_probe",
        }
    }
}

impl FromStr for ProbeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Unknown probe type '{}'", s)))
    }
}

impl fmt::Display for ProbeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds for one measured quantity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitValues {
    #[serde(default)]
    pub warning: u32,
    #[serde(default)]
    pub critical: u32,
    #[serde(default)]
    pub fail: u32,
}

/// A limit in its declared, named form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLimit {
    pub name: String,
    #[serde(flatten)]
    pub values: LimitValues,
}

/// Limits keyed by quantity name
///
/// Serialized as an object `name -> {warning, critical, fail}`. Also
/// accepts the declared list form `[{name, warning, critical, fail}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limits(BTreeMap<String, LimitValues>);

impl Limits {
    pub fn from_list(list: impl IntoIterator<Item = NamedLimit>) -> Self {
        Self(list.into_iter().map(|l| (l.name, l.values)).collect())
    }

    pub fn to_list(&self) -> Vec<NamedLimit> {
        self.0
            .iter()
            .map(|(name, values)| NamedLimit {
                name: name.clone(),
                values: values.clone(),
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&LimitValues> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Limits {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LimitsRepr {
    List(Vec<NamedLimit>),
    Map(BTreeMap<String, LimitValues>),
}

impl<'de> Deserialize<'de> for Limits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match LimitsRepr::deserialize(deserializer)? {
            LimitsRepr::List(list) => Self::from_list(list),
            LimitsRepr::Map(map) => Self(map),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingProbe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets: Option<u32>,
    #[serde(alias = "packet_size", default, skip_serializing_if = "Option::is_none")]
    pub packet_size: Option<u32>,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpTransaction {
    pub method: String,
    pub url: String,
    #[serde(alias = "transmitted_data", default, skip_serializing_if = "Option::is_none")]
    pub transmitted_data: Option<String>,
    #[serde(alias = "follow_redirects", default)]
    pub follow_redirects: bool,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpProbe {
    #[serde(default)]
    pub transactions: Vec<HttpTransaction>,
    #[serde(alias = "total_limits", default, skip_serializing_if = "Option::is_none")]
    pub total_limits: Option<LimitValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpProbe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(alias = "passive_mode", default)]
    pub passive_mode: bool,
    #[serde(rename = "userName", alias = "username", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpProbe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSendProbe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsProbe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(alias = "tcp_only", default)]
    pub tcp_only: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(alias = "owner_name", default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpProbe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "controlIP", alias = "control_ip", default, skip_serializing_if = "Option::is_none")]
    pub control_ip: Option<String>,
    #[serde(default)]
    pub limits: Limits,
}

/// Type-specific probe settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeDetails {
    Ping(PingProbe),
    Http(HttpProbe),
    Ftp(FtpProbe),
    Smtp(SmtpProbe),
    SmtpSend(SmtpSendProbe),
    Dns(DnsProbe),
    Tcp(TcpProbe),
}

impl ProbeDetails {
    pub fn probe_type(&self) -> ProbeType {
        match self {
            Self::Ping(_) => ProbeType::Ping,
            Self::Http(_) => ProbeType::Http,
            Self::Ftp(_) => ProbeType::Ftp,
            Self::Smtp(_) => ProbeType::Smtp,
            Self::SmtpSend(_) => ProbeType::SmtpSend,
            Self::Dns(_) => ProbeType::Dns,
            Self::Tcp(_) => ProbeType::Tcp,
        }
    }

    /// Wire form of the detail block
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Self::Ping(d) => serde_json::to_value(d)?,
            Self::Http(d) => serde_json::to_value(d)?,
            Self::Ftp(d) => serde_json::to_value(d)?,
            Self::Smtp(d) => serde_json::to_value(d)?,
            Self::SmtpSend(d) => serde_json::to_value(d)?,
            Self::Dns(d) => serde_json::to_value(d)?,
            Self::Tcp(d) => serde_json::to_value(d)?,
        })
    }

    /// Parse a wire detail block for the given probe type
    pub fn from_value(probe_type: ProbeType, value: serde_json::Value) -> Result<Self> {
        Ok(match probe_type {
            ProbeType::Ping => Self::Ping(serde_json::from_value(value)?),
            ProbeType::Http => Self::Http(serde_json::from_value(value)?),
            ProbeType::Ftp => Self::Ftp(serde_json::from_value(value)?),
            ProbeType::Smtp => Self::Smtp(serde_json::from_value(value)?),
            ProbeType::SmtpSend => Self::SmtpSend(serde_json::from_value(value)?),
            ProbeType::Dns => Self::Dns(serde_json::from_value(value)?),
            ProbeType::Tcp => Self::Tcp(serde_json::from_value(value)?),
        })
    }
}

/// Address of a probe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeKey {
    pub zone: String,
    pub name: String,
    /// Server-assigned id, empty before create
    pub id: String,
}

impl fmt::Display for ProbeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "new probe on {} in {}", self.name, self.zone)
        } else {
            write!(f, "probe {} on {} in {}", self.id, self.name, self.zone)
        }
    }
}

/// Probe as exchanged with the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_record: Option<String>,
    #[serde(rename = "type")]
    pub probe_type: String,
    pub interval: String,
    pub agents: Vec<String>,
    pub threshold: u32,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Health probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub zone: String,
    pub owner_name: String,
    pub id: Option<String>,
    pub pool_record: Option<String>,
    pub interval: String,
    pub agents: Vec<String>,
    pub threshold: u32,
    pub details: ProbeDetails,
}

impl Probe {
    /// Build a probe from its declared configuration
    pub fn from_config(cfg: &ProbeConfig) -> Result<Self> {
        cfg.validate()?;
        let missing = || Error::validation(format!("{} probe has no detail block", cfg.probe_type));

        let details = match cfg.parsed_type()? {
            ProbeType::Ping => cfg.ping_probe.clone().map(ProbeDetails::Ping),
            ProbeType::Http => cfg.http_probe.clone().map(ProbeDetails::Http),
            ProbeType::Ftp => cfg.ftp_probe.clone().map(ProbeDetails::Ftp),
            ProbeType::Smtp => cfg.smtp_probe.clone().map(ProbeDetails::Smtp),
            ProbeType::SmtpSend => cfg.smtpsend_probe.clone().map(ProbeDetails::SmtpSend),
            ProbeType::Dns => cfg.dns_probe.clone().map(ProbeDetails::Dns),
            ProbeType::Tcp => cfg.tcp_probe.clone().map(ProbeDetails::Tcp),
        }
        .ok_or_else(missing)?;

        Ok(Self {
            zone: cfg.zone_name.clone(),
            owner_name: cfg.owner_name.clone(),
            id: cfg.id.clone().filter(|id| !id.is_empty()),
            pool_record: cfg.pool_record.clone(),
            interval: cfg.interval.clone(),
            agents: cfg.agents.clone(),
            threshold: cfg.threshold,
            details,
        })
    }

    /// Flatten back into configuration
    pub fn to_config(&self) -> ProbeConfig {
        let mut cfg = ProbeConfig {
            zone_name: self.zone.clone(),
            owner_name: self.owner_name.clone(),
            pool_record: self.pool_record.clone(),
            probe_type: self.details.probe_type().to_string(),
            interval: self.interval.clone(),
            agents: self.agents.clone(),
            threshold: self.threshold,
            ping_probe: None,
            http_probe: None,
            ftp_probe: None,
            smtp_probe: None,
            smtpsend_probe: None,
            dns_probe: None,
            tcp_probe: None,
            id: self.id.clone(),
        };
        match &self.details {
            ProbeDetails::Ping(d) => cfg.ping_probe = Some(d.clone()),
            ProbeDetails::Http(d) => cfg.http_probe = Some(d.clone()),
            ProbeDetails::Ftp(d) => cfg.ftp_probe = Some(d.clone()),
            ProbeDetails::Smtp(d) => cfg.smtp_probe = Some(d.clone()),
            ProbeDetails::SmtpSend(d) => cfg.smtpsend_probe = Some(d.clone()),
            ProbeDetails::Dns(d) => cfg.dns_probe = Some(d.clone()),
            ProbeDetails::Tcp(d) => cfg.tcp_probe = Some(d.clone()),
        }
        cfg
    }

    pub fn probe_type(&self) -> ProbeType {
        self.details.probe_type()
    }
}

/// Id carried by a create acknowledgement, from the `ID` header or the
/// last segment of `Location`
fn assigned_id(ack: &Ack) -> Option<String> {
    ack.id.clone().filter(|id| !id.is_empty()).or_else(|| {
        ack.location
            .as_deref()
            .and_then(|loc| loc.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    })
}

impl Resource for Probe {
    type Key = ProbeKey;
    type Remote = ProbeInfo;

    const KIND: &'static str = "probe";

    fn key(&self) -> ProbeKey {
        ProbeKey {
            zone: self.zone.clone(),
            name: self.owner_name.clone(),
            id: self.id.clone().unwrap_or_default(),
        }
    }

    fn id(&self) -> String {
        self.id.clone().unwrap_or_default()
    }

    fn to_remote(&self) -> Result<ProbeInfo> {
        Ok(ProbeInfo {
            id: self.id.clone().unwrap_or_default(),
            pool_record: self.pool_record.clone(),
            probe_type: self.probe_type().to_string(),
            interval: self.interval.clone(),
            agents: self.agents.clone(),
            threshold: self.threshold,
            details: self.details.to_value()?,
        })
    }

    fn from_remote(key: &ProbeKey, remote: ProbeInfo) -> Result<Self> {
        let probe_type: ProbeType = remote.probe_type.parse()?;
        if remote.details.is_null() {
            return Err(Error::validation(format!("{} has no details", key)));
        }
        let id = Some(remote.id)
            .filter(|id| !id.is_empty())
            .or_else(|| Some(key.id.clone()).filter(|id| !id.is_empty()));

        Ok(Self {
            zone: key.zone.clone(),
            owner_name: key.name.clone(),
            id,
            pool_record: remote.pool_record,
            interval: remote.interval,
            agents: remote.agents,
            threshold: remote.threshold,
            details: ProbeDetails::from_value(probe_type, remote.details)?,
        })
    }

    fn acknowledge(mut self, ack: &Ack) -> Self {
        if let Some(id) = assigned_id(ack) {
            self.id = Some(id);
        }
        self
    }

    fn inherit(mut self, present: &Self) -> Self {
        if self.id.is_none() {
            self.id = present.id.clone();
        }
        self
    }
}
