use super::{RRSet, RRSetKey, Resource, hostname};
use crate::config::{TcPoolConfig, TcPoolMemberConfig, Ttl, pool_record_type};
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::profile::{
    self, BackupRecord, Profile, ProfileKind, ProfileSchema, SbRdataInfo, TcPoolProfile,
};

/// One traffic-controller pool member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcPoolMember {
    pub host: String,
    pub info: SbRdataInfo,
}

impl From<&TcPoolMemberConfig> for TcPoolMember {
    fn from(cfg: &TcPoolMemberConfig) -> Self {
        Self {
            host: cfg.host.clone(),
            info: SbRdataInfo {
                state: cfg.state.clone(),
                run_probes: cfg.run_probes,
                priority: cfg.priority,
                failover_delay: cfg.failover_delay,
                threshold: cfg.threshold,
                weight: cfg.weight,
            },
        }
    }
}

impl TcPoolMember {
    pub fn to_config(&self) -> TcPoolMemberConfig {
        TcPoolMemberConfig {
            host: self.host.clone(),
            failover_delay: self.info.failover_delay,
            priority: self.info.priority,
            run_probes: self.info.run_probes,
            state: self.info.state.clone(),
            threshold: self.info.threshold,
            weight: self.info.weight,
        }
    }

    /// Identity key of this member
    pub fn identity(&self) -> u32 {
        self.to_config().identity()
    }
}

/// Traffic-controller pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcPool {
    pub key: RRSetKey,
    pub hostname: String,
    pub ttl: u32,
    pub members: Vec<TcPoolMember>,
    pub description: Option<String>,
    pub run_probes: bool,
    pub act_on_probes: bool,
    pub max_to_lb: Option<u32>,
    pub backup_record: Option<BackupRecord>,
}

impl TcPool {
    /// Build a pool from its declared configuration
    pub fn from_config(cfg: &TcPoolConfig) -> Result<Self> {
        cfg.validate()?;
        let rr_type = pool_record_type(cfg.rr_type.as_deref(), &cfg.name);

        Ok(Self {
            key: RRSetKey::new(&cfg.zone, rr_type, &cfg.name),
            hostname: hostname(&cfg.name, &cfg.zone),
            ttl: cfg.ttl.seconds()?,
            members: cfg.members.iter().map(TcPoolMember::from).collect(),
            description: cfg.description.clone().filter(|d| !d.is_empty()),
            run_probes: cfg.run_probes,
            act_on_probes: cfg.act_on_probes,
            max_to_lb: cfg.max_to_lb,
            backup_record: cfg.backup_record_rdata.as_ref().map(|rdata| BackupRecord {
                rdata: rdata.clone(),
                failover_delay: cfg.backup_record_failover_delay.unwrap_or_default(),
            }),
        })
    }

    /// Flatten back into configuration
    pub fn to_config(&self) -> TcPoolConfig {
        let mut cfg = TcPoolConfig::new(
            &self.key.zone,
            &self.key.name,
            self.members.iter().map(TcPoolMember::to_config),
        );
        cfg.rr_type = Some(self.key.rr_type.clone());
        cfg.ttl = Ttl::from(self.ttl);
        cfg.description = self.description.clone();
        cfg.run_probes = self.run_probes;
        cfg.act_on_probes = self.act_on_probes;
        cfg.max_to_lb = self.max_to_lb;
        if let Some(backup) = &self.backup_record {
            cfg.backup_record_rdata = Some(backup.rdata.clone());
            cfg.backup_record_failover_delay =
                Some(backup.failover_delay).filter(|delay| *delay != 0);
        }
        cfg.hostname = Some(self.hostname.clone());
        cfg
    }

    /// Rdata values in member order
    pub fn rdata(&self) -> Vec<String> {
        self.members.iter().map(|m| m.host.clone()).collect()
    }
}

impl Resource for TcPool {
    type Key = RRSetKey;
    type Remote = RRSet;

    const KIND: &'static str = "traffic-controller pool";

    fn key(&self) -> RRSetKey {
        self.key.clone()
    }

    fn id(&self) -> String {
        self.key.id()
    }

    fn to_remote(&self) -> Result<RRSet> {
        let (rdata, rdata_info): (Vec<String>, Vec<SbRdataInfo>) = self
            .members
            .iter()
            .map(|m| (m.host.clone(), m.info.clone()))
            .unzip();

        let document = profile::encode(&Profile::TcPool(TcPoolProfile {
            description: self.description.clone().unwrap_or_default(),
            run_probes: self.run_probes,
            act_on_probes: self.act_on_probes,
            max_to_lb: self.max_to_lb,
            rdata_info,
            backup_record: self.backup_record.clone(),
        }))?;

        Ok(RRSet {
            owner_name: self.key.name.clone(),
            rr_type: self.key.rr_type.clone(),
            rdata,
            ttl: self.ttl,
            profile: Some(document),
        })
    }

    fn from_remote(key: &RRSetKey, remote: RRSet) -> Result<Self> {
        let tc = match &remote.profile {
            Some(doc) => match profile::decode_as(
                ProfileKind::Structured(ProfileSchema::TcPool),
                doc,
            )? {
                Profile::TcPool(tc) => tc,
                other => return Err(Error::unknown_schema(format!("{:?}", other.kind()))),
            },
            None => TcPoolProfile {
                rdata_info: vec![SbRdataInfo::default(); remote.rdata.len()],
                ..Default::default()
            },
        };

        if tc.rdata_info.len() != remote.rdata.len() {
            return Err(Error::PairingMismatch {
                rdata: remote.rdata.len(),
                members: tc.rdata_info.len(),
            });
        }
        let members = remote
            .rdata
            .into_iter()
            .zip(tc.rdata_info)
            .map(|(host, info)| TcPoolMember { host, info })
            .collect();

        Ok(Self {
            key: key.clone(),
            hostname: hostname(&remote.owner_name, &key.zone),
            ttl: remote.ttl,
            members,
            description: Some(tc.description).filter(|d| !d.is_empty()),
            run_probes: tc.run_probes,
            act_on_probes: tc.act_on_probes,
            max_to_lb: tc.max_to_lb.filter(|max| *max != 0),
            backup_record: tc.backup_record,
        })
    }
}
