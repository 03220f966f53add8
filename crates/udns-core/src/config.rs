//! Declared configuration types
//!
//! This module defines the flat configuration each resource kind is declared
//! with. Every type deserializes from JSON with defaults filled in, and
//! validates itself before any remote call is made.

use crate::error::{Error, Result};
use crate::identity::{Canonical, Identity, IdentitySet};
use crate::profile::{
    DirPoolProfile, IpAddress, PROFILE_ATTRIBUTES, RdPoolProfile, SbPoolProfile, TcPoolProfile,
    default_true,
};
use crate::resource::notification::PoolRecordNotification;
use crate::resource::probe::{
    DnsProbe, FtpProbe, HttpProbe, PingProbe, ProbeType, SmtpProbe, SmtpSendProbe, TcpProbe,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Record type every pool resource is stored as
pub const POOL_RECORD_TYPE: &str = "A";

/// Time-to-live, declared as a number or as numeric text
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ttl {
    Seconds(i64),
    Text(String),
}

impl Ttl {
    /// TTL in seconds, rejecting negative and non-numeric values
    pub fn seconds(&self) -> Result<u32> {
        let value = match self {
            Ttl::Seconds(n) => *n,
            Ttl::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::validation(format!("TTL '{}' is not a number", text)))?,
        };
        u32::try_from(value)
            .map_err(|_| Error::validation(format!("TTL {} is out of range", value)))
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::Text("3600".to_string())
    }
}

impl From<u32> for Ttl {
    fn from(seconds: u32) -> Self {
        Ttl::Text(seconds.to_string())
    }
}

impl PartialEq for Ttl {
    fn eq(&self, other: &Self) -> bool {
        match (self.seconds(), other.seconds()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Seconds(n) => write!(f, "{}", n),
            Ttl::Text(text) => f.write_str(text),
        }
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", what)));
    }
    Ok(())
}

/// Resolve the record type of a pool resource, warning when a different
/// type was declared
pub(crate) fn pool_record_type(declared: Option<&str>, name: &str) -> String {
    let declared = declared.unwrap_or_default();
    if !declared.is_empty() && !declared.eq_ignore_ascii_case(POOL_RECORD_TYPE) {
        warn!(
            "Ignoring record type {} on pool {}, pools are stored as {}",
            declared, name, POOL_RECORD_TYPE
        );
    }
    POOL_RECORD_TYPE.to_string()
}

/// Generic record with at most one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    pub zone: String,
    pub name: String,

    #[serde(rename = "type")]
    pub rr_type: String,

    pub rdata: Vec<String>,

    #[serde(default)]
    pub ttl: Ttl,

    /// Profile given as raw JSON text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirpool_profile: Option<DirPoolProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdpool_profile: Option<RdPoolProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbpool_profile: Option<SbPoolProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcpool_profile: Option<TcPoolProfile>,

    /// Computed fully-qualified name, ignored on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl RecordConfig {
    /// Create a record without a profile
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        rr_type: impl Into<String>,
        rdata: Vec<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            rr_type: rr_type.into(),
            rdata,
            ttl: Ttl::default(),
            string_profile: None,
            dirpool_profile: None,
            rdpool_profile: None,
            sbpool_profile: None,
            tcpool_profile: None,
            hostname: None,
        }
    }

    /// Names of the profile attributes that are set
    pub fn profile_attributes(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.string_profile.as_deref().is_some_and(|s| !s.trim().is_empty()) {
            set.push("string_profile");
        }
        for (attribute, _) in PROFILE_ATTRIBUTES {
            let present = match attribute {
                "dirpool_profile" => self.dirpool_profile.is_some(),
                "rdpool_profile" => self.rdpool_profile.is_some(),
                "sbpool_profile" => self.sbpool_profile.is_some(),
                "tcpool_profile" => self.tcpool_profile.is_some(),
                _ => false,
            };
            if present {
                set.push(attribute);
            }
        }
        set
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<()> {
        require(&self.zone, "Record zone")?;
        require(&self.name, "Record name")?;
        require(&self.rr_type, "Record type")?;
        if self.rdata.is_empty() {
            return Err(Error::validation("Record rdata cannot be empty"));
        }
        self.ttl.seconds()?;

        let profiles = self.profile_attributes();
        if profiles.len() > 1 {
            return Err(Error::validation(format!(
                "mutually exclusive profile configuration: {}",
                profiles.join(", ")
            )));
        }
        Ok(())
    }
}

/// Traffic-controller pool member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcPoolMemberConfig {
    pub host: String,

    /// Seconds before failing over, 0 to 30
    #[serde(default)]
    pub failover_delay: u32,

    #[serde(default = "default_priority")]
    pub priority: u32,

    #[serde(default = "default_true")]
    pub run_probes: bool,

    /// `NORMAL`, `ACTIVE` or `INACTIVE`
    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// Even number from 2 to 100
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_priority() -> u32 {
    1
}

fn default_state() -> String {
    "NORMAL".to_string()
}

fn default_threshold() -> u32 {
    1
}

fn default_weight() -> u32 {
    2
}

impl TcPoolMemberConfig {
    /// Member with every attribute at its default
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            failover_delay: 0,
            priority: default_priority(),
            run_probes: true,
            state: default_state(),
            threshold: default_threshold(),
            weight: default_weight(),
        }
    }

    /// Validate the member
    pub fn validate(&self) -> Result<()> {
        require(&self.host, "Pool member host")?;
        if self.weight % 2 != 0 || !(2..=100).contains(&self.weight) {
            return Err(Error::validation(format!(
                "Member {} weight {} must be an even number from 2 to 100",
                self.host, self.weight
            )));
        }
        if self.failover_delay > 30 {
            return Err(Error::validation(format!(
                "Member {} failover_delay {} must be at most 30",
                self.host, self.failover_delay
            )));
        }
        Ok(())
    }
}

impl Identity for TcPoolMemberConfig {
    fn write_canonical(&self, out: &mut Canonical) {
        out.field(&self.host)
            .field(self.failover_delay)
            .field(self.priority)
            .field(self.run_probes)
            .field(&self.state)
            .field(self.threshold)
            .field(self.weight);
    }
}

/// Traffic-controller pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcPoolConfig {
    pub zone: String,
    pub name: String,

    /// Ignored, pools are always stored as `A`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rr_type: Option<String>,

    #[serde(alias = "rdata")]
    pub members: IdentitySet<TcPoolMemberConfig>,

    #[serde(default)]
    pub ttl: Ttl,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_true")]
    pub run_probes: bool,

    #[serde(default = "default_true")]
    pub act_on_probes: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_to_lb: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_record_rdata: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_record_failover_delay: Option<u32>,

    /// Computed fully-qualified name, ignored on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl TcPoolConfig {
    /// Create a pool with default attributes
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        members: impl IntoIterator<Item = TcPoolMemberConfig>,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            rr_type: None,
            members: members.into_iter().collect(),
            ttl: Ttl::default(),
            description: None,
            run_probes: true,
            act_on_probes: true,
            max_to_lb: None,
            backup_record_rdata: None,
            backup_record_failover_delay: None,
            hostname: None,
        }
    }

    /// Validate the pool configuration
    pub fn validate(&self) -> Result<()> {
        require(&self.zone, "Pool zone")?;
        require(&self.name, "Pool name")?;
        self.ttl.seconds()?;

        if self.members.is_empty() {
            return Err(Error::validation("Pool must have at least one member"));
        }
        for member in &self.members {
            member.validate()?;
        }

        if let Some(max) = self.max_to_lb.filter(|max| *max as usize > self.members.len()) {
            return Err(Error::validation(format!(
                "max_to_lb {} exceeds the {} pool member(s)",
                max,
                self.members.len()
            )));
        }
        if self.backup_record_failover_delay.is_some() && self.backup_record_rdata.is_none() {
            return Err(Error::validation(
                "backup_record_failover_delay requires backup_record_rdata",
            ));
        }
        Ok(())
    }
}

/// Geographic targeting of a directional member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfoConfig {
    pub name: String,

    #[serde(default)]
    pub is_account_level: bool,

    #[serde(default)]
    pub codes: BTreeSet<String>,
}

/// Source-address targeting of a directional member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInfoConfig {
    pub name: String,

    #[serde(default)]
    pub is_account_level: bool,

    #[serde(default)]
    pub ips: IdentitySet<IpAddress>,
}

fn validate_targeting(geo: Option<&GeoInfoConfig>, ip: Option<&IpInfoConfig>) -> Result<()> {
    if let Some(geo) = geo {
        require(&geo.name, "geo_info name")?;
    }
    if let Some(ip) = ip {
        require(&ip.name, "ip_info name")?;
        for entry in &ip.ips {
            entry.validate()?;
        }
    }
    Ok(())
}

/// Directional pool member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirPoolMemberConfig {
    pub host: String,

    #[serde(default)]
    pub all_non_configured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_info: Option<GeoInfoConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_info: Option<IpInfoConfig>,
}

impl DirPoolMemberConfig {
    /// Member that answers for every unconfigured source
    pub fn all_non_configured(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            all_non_configured: true,
            geo_info: None,
            ip_info: None,
        }
    }

    /// Validate the member
    pub fn validate(&self) -> Result<()> {
        require(&self.host, "Pool member host")?;
        validate_targeting(self.geo_info.as_ref(), self.ip_info.as_ref())
    }
}

impl Identity for DirPoolMemberConfig {
    fn write_canonical(&self, out: &mut Canonical) {
        out.field(&self.host).field(self.all_non_configured);
        if let Some(geo) = &self.geo_info {
            out.field(&geo.name)
                .field(geo.is_account_level)
                .codes(&geo.codes);
        }
        if let Some(ip) = &self.ip_info {
            out.field(&ip.name).field(ip.is_account_level).nested(&ip.ips);
        }
    }
}

/// Answer given when no directional member matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoResponseConfig {
    #[serde(default)]
    pub all_non_configured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_info: Option<GeoInfoConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_info: Option<IpInfoConfig>,
}

/// Directional pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirPoolConfig {
    pub zone: String,
    pub name: String,

    /// Declared record type; the pool is stored as `A`
    #[serde(rename = "type")]
    pub rr_type: String,

    pub ttl: Ttl,

    #[serde(alias = "rdata")]
    pub members: IdentitySet<DirPoolMemberConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `GEO` or `IP`
    #[serde(default = "default_conflict_resolve")]
    pub conflict_resolve: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_response: Option<NoResponseConfig>,

    /// Computed fully-qualified name, ignored on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

fn default_conflict_resolve() -> String {
    "GEO".to_string()
}

impl DirPoolConfig {
    /// Create a pool with default attributes
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        members: impl IntoIterator<Item = DirPoolMemberConfig>,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            rr_type: POOL_RECORD_TYPE.to_string(),
            ttl: Ttl::default(),
            members: members.into_iter().collect(),
            description: None,
            conflict_resolve: default_conflict_resolve(),
            no_response: None,
            hostname: None,
        }
    }

    /// Validate the pool configuration
    pub fn validate(&self) -> Result<()> {
        require(&self.zone, "Pool zone")?;
        require(&self.name, "Pool name")?;
        require(&self.rr_type, "Pool type")?;
        self.ttl.seconds()?;

        if self.members.is_empty() {
            return Err(Error::validation("Pool must have at least one member"));
        }
        for member in &self.members {
            member.validate()?;
        }
        if !matches!(self.conflict_resolve.as_str(), "GEO" | "IP") {
            return Err(Error::validation(format!(
                "conflict_resolve must be GEO or IP, got '{}'",
                self.conflict_resolve
            )));
        }
        if let Some(nr) = &self.no_response {
            validate_targeting(nr.geo_info.as_ref(), nr.ip_info.as_ref())?;
        }
        Ok(())
    }
}

/// Health probe attached to a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    pub zone_name: String,
    pub owner_name: String,

    /// Pool record the probe targets; the whole pool when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_record: Option<String>,

    /// One of `PING, HTTP, FTP, SMTP, SMTP_SEND, DNS, TCP`
    #[serde(rename = "type")]
    pub probe_type: String,

    #[serde(default = "default_interval")]
    pub interval: String,

    pub agents: Vec<String>,

    #[serde(default = "default_probe_threshold")]
    pub threshold: u32,

    #[serde(rename = "ping_probe", default, skip_serializing_if = "Option::is_none")]
    pub ping_probe: Option<PingProbe>,

    #[serde(rename = "http_probe", default, skip_serializing_if = "Option::is_none")]
    pub http_probe: Option<HttpProbe>,

    #[serde(rename = "ftp_probe", default, skip_serializing_if = "Option::is_none")]
    pub ftp_probe: Option<FtpProbe>,

    #[serde(rename = "smtp_probe", default, skip_serializing_if = "Option::is_none")]
    pub smtp_probe: Option<SmtpProbe>,

    #[serde(rename = "smtpsend_probe", default, skip_serializing_if = "Option::is_none")]
    pub smtpsend_probe: Option<SmtpSendProbe>,

    #[serde(rename = "dns_probe", default, skip_serializing_if = "Option::is_none")]
    pub dns_probe: Option<DnsProbe>,

    #[serde(rename = "tcp_probe", default, skip_serializing_if = "Option::is_none")]
    pub tcp_probe: Option<TcpProbe>,

    /// Server-assigned id, ignored on input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn default_interval() -> String {
    "FIVE_MINUTES".to_string()
}

fn default_probe_threshold() -> u32 {
    1
}

impl ProbeConfig {
    /// Parsed probe type
    pub fn parsed_type(&self) -> Result<ProbeType> {
        self.probe_type.parse()
    }

    /// Validate the probe configuration
    pub fn validate(&self) -> Result<()> {
        require(&self.zone_name, "Probe zoneName")?;
        require(&self.owner_name, "Probe ownerName")?;
        let probe_type = self.parsed_type()?;

        if self.agents.is_empty() {
            return Err(Error::validation("Probe must run from at least one agent"));
        }
        if self.threshold == 0 {
            return Err(Error::validation("Probe threshold must be at least 1"));
        }

        let present = match probe_type {
            ProbeType::Ping => self.ping_probe.is_some(),
            ProbeType::Http => self.http_probe.is_some(),
            ProbeType::Ftp => self.ftp_probe.is_some(),
            ProbeType::Smtp => self.smtp_probe.is_some(),
            ProbeType::SmtpSend => self.smtpsend_probe.is_some(),
            ProbeType::Dns => self.dns_probe.is_some(),
            ProbeType::Tcp => self.tcp_probe.is_some(),
        };
        if !present {
            return Err(Error::validation(format!(
                "{} probe requires a {} block",
                probe_type,
                probe_type.attribute()
            )));
        }
        Ok(())
    }
}

/// Probe-event notification for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub zone_name: String,
    pub owner_name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub email: String,

    #[serde(default)]
    pub pool_records: Vec<PoolRecordNotification>,
}

impl NotificationConfig {
    /// Validate the notification configuration
    pub fn validate(&self) -> Result<()> {
        require(&self.zone_name, "Notification zoneName")?;
        require(&self.owner_name, "Notification ownerName")?;
        require(&self.record_type, "Notification type")?;
        require(&self.email, "Notification email")?;
        for pool_record in &self.pool_records {
            require(&pool_record.pool_record, "Notification poolRecord")?;
        }
        Ok(())
    }
}
