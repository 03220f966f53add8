use super::{RRSet, RRSetKey, Resource, hostname};
use crate::config::{
    DirPoolConfig, DirPoolMemberConfig, GeoInfoConfig, IpInfoConfig, NoResponseConfig, Ttl,
    pool_record_type,
};
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::profile::{
    self, DirPoolProfile, DpRdataInfo, GeoInfo, IpInfo, Profile, ProfileKind, ProfileSchema,
};

fn geo_to_wire(cfg: &GeoInfoConfig) -> GeoInfo {
    GeoInfo {
        name: cfg.name.clone(),
        is_account_level: cfg.is_account_level,
        codes: cfg.codes.iter().cloned().collect(),
    }
}

fn geo_from_wire(geo: &GeoInfo) -> GeoInfoConfig {
    GeoInfoConfig {
        name: geo.name.clone(),
        is_account_level: geo.is_account_level,
        codes: geo.codes.iter().cloned().collect(),
    }
}

fn ip_to_wire(cfg: &IpInfoConfig) -> IpInfo {
    IpInfo {
        name: cfg.name.clone(),
        is_account_level: cfg.is_account_level,
        ips: cfg.ips.iter().cloned().collect(),
    }
}

fn ip_from_wire(ip: &IpInfo) -> IpInfoConfig {
    IpInfoConfig {
        name: ip.name.clone(),
        is_account_level: ip.is_account_level,
        ips: ip.ips.iter().cloned().collect(),
    }
}

/// One directional pool member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirPoolMember {
    pub host: String,
    pub info: DpRdataInfo,
}

impl From<&DirPoolMemberConfig> for DirPoolMember {
    fn from(cfg: &DirPoolMemberConfig) -> Self {
        Self {
            host: cfg.host.clone(),
            info: DpRdataInfo {
                all_non_configured: cfg.all_non_configured,
                geo_info: cfg.geo_info.as_ref().map(geo_to_wire),
                ip_info: cfg.ip_info.as_ref().map(ip_to_wire),
            },
        }
    }
}

impl DirPoolMember {
    pub fn to_config(&self) -> DirPoolMemberConfig {
        DirPoolMemberConfig {
            host: self.host.clone(),
            all_non_configured: self.info.all_non_configured,
            geo_info: self.info.geo_info.as_ref().map(geo_from_wire),
            ip_info: self.info.ip_info.as_ref().map(ip_from_wire),
        }
    }

    /// Identity key of this member
    pub fn identity(&self) -> u32 {
        self.to_config().identity()
    }
}

/// Directional pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirPool {
    pub key: RRSetKey,
    pub hostname: String,
    pub ttl: u32,
    pub members: Vec<DirPoolMember>,
    pub description: Option<String>,
    pub conflict_resolve: String,
    pub no_response: Option<DpRdataInfo>,
}

impl DirPool {
    /// Build a pool from its declared configuration
    pub fn from_config(cfg: &DirPoolConfig) -> Result<Self> {
        cfg.validate()?;
        let rr_type = pool_record_type(Some(&cfg.rr_type), &cfg.name);

        Ok(Self {
            key: RRSetKey::new(&cfg.zone, rr_type, &cfg.name),
            hostname: hostname(&cfg.name, &cfg.zone),
            ttl: cfg.ttl.seconds()?,
            members: cfg.members.iter().map(DirPoolMember::from).collect(),
            description: cfg.description.clone().filter(|d| !d.is_empty()),
            conflict_resolve: cfg.conflict_resolve.clone(),
            no_response: cfg.no_response.as_ref().map(|nr| DpRdataInfo {
                all_non_configured: nr.all_non_configured,
                geo_info: nr.geo_info.as_ref().map(geo_to_wire),
                ip_info: nr.ip_info.as_ref().map(ip_to_wire),
            }),
        })
    }

    /// Flatten back into configuration
    pub fn to_config(&self) -> DirPoolConfig {
        let mut cfg = DirPoolConfig::new(
            &self.key.zone,
            &self.key.name,
            self.members.iter().map(DirPoolMember::to_config),
        );
        cfg.rr_type = self.key.rr_type.clone();
        cfg.ttl = Ttl::from(self.ttl);
        cfg.description = self.description.clone();
        cfg.conflict_resolve = self.conflict_resolve.clone();
        cfg.no_response = self.no_response.as_ref().map(|nr| NoResponseConfig {
            all_non_configured: nr.all_non_configured,
            geo_info: nr.geo_info.as_ref().map(geo_from_wire),
            ip_info: nr.ip_info.as_ref().map(ip_from_wire),
        });
        cfg.hostname = Some(self.hostname.clone());
        cfg
    }
}

impl Resource for DirPool {
    type Key = RRSetKey;
    type Remote = RRSet;

    const KIND: &'static str = "directional pool";

    fn key(&self) -> RRSetKey {
        self.key.clone()
    }

    fn id(&self) -> String {
        self.key.id()
    }

    fn to_remote(&self) -> Result<RRSet> {
        let (rdata, rdata_info): (Vec<String>, Vec<DpRdataInfo>) = self
            .members
            .iter()
            .map(|m| (m.host.clone(), m.info.clone()))
            .unzip();

        let document = profile::encode(&Profile::DirPool(DirPoolProfile {
            description: self.description.clone().unwrap_or_default(),
            conflict_resolve: Some(self.conflict_resolve.clone()),
            rdata_info,
            no_response: self.no_response.clone(),
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
        let dp = match &remote.profile {
            Some(doc) => match profile::decode_as(
                ProfileKind::Structured(ProfileSchema::DirPool),
                doc,
            )? {
                Profile::DirPool(dp) => dp,
                other => return Err(Error::unknown_schema(format!("{:?}", other.kind()))),
            },
            None => DirPoolProfile {
                rdata_info: vec![DpRdataInfo::default(); remote.rdata.len()],
                ..Default::default()
            },
        };

        if dp.rdata_info.len() != remote.rdata.len() {
            return Err(Error::PairingMismatch {
                rdata: remote.rdata.len(),
                members: dp.rdata_info.len(),
            });
        }
        let members = remote
            .rdata
            .into_iter()
            .zip(dp.rdata_info)
            .map(|(host, info)| DirPoolMember { host, info })
            .collect();

        Ok(Self {
            key: key.clone(),
            hostname: hostname(&remote.owner_name, &key.zone),
            ttl: remote.ttl,
            members,
            description: Some(dp.description).filter(|d| !d.is_empty()),
            conflict_resolve: dp.conflict_resolve.unwrap_or_else(|| "GEO".to_string()),
            no_response: dp.no_response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::IpAddress;
    use pretty_assertions::assert_eq;

    fn config() -> DirPoolConfig {
        let mut cfg = DirPoolConfig::new(
            "example.com",
            "dp",
            [
                DirPoolMemberConfig::all_non_configured("10.1.0.1"),
                DirPoolMemberConfig {
                    host: "10.1.1.2".into(),
                    all_non_configured: false,
                    geo_info: Some(GeoInfoConfig {
                        name: "North America".into(),
                        is_account_level: false,
                        codes: ["US-OK", "US-DC", "US-MA"].iter().map(|c| c.to_string()).collect(),
                    }),
                    ip_info: None,
                },
                DirPoolMemberConfig {
                    host: "10.1.1.3".into(),
                    all_non_configured: false,
                    geo_info: None,
                    ip_info: Some(IpInfoConfig {
                        name: "some Ips".into(),
                        is_account_level: false,
                        ips: [
                            IpAddress::address("50.60.70.80"),
                            IpAddress::cidr("20.20.20.0/24"),
                            IpAddress::range("200.20.0.1", "200.20.0.10"),
                        ]
                        .into_iter()
                        .collect(),
                    }),
                },
            ],
        );
        cfg.ttl = Ttl::Seconds(300);
        cfg.description = Some("Minimal directional pool".into());
        cfg
    }

    #[test]
    fn test_remote_round_trip_preserves_members() {
        let dp = DirPool::from_config(&config()).unwrap();
        let rrset = dp.to_remote().unwrap();
        assert_eq!(rrset.rdata.len(), 3);

        let back = DirPool::from_remote(&dp.key(), rrset).unwrap();
        assert_eq!(back, dp);

        let observed = back.to_config();
        assert_eq!(observed.members, config().members);
        let ids: Vec<u32> = observed.members.identities().collect();
        assert!(ids.contains(&478925311));
        assert!(ids.contains(&740247500));
        assert!(ids.contains(&1918680333));
    }

    #[test]
    fn test_observed_hostname_follows_owner_name() {
        let dp = DirPool::from_config(&config()).unwrap();
        let mut rrset = dp.to_remote().unwrap();
        rrset.owner_name = "dp.example.com.".into();
        let observed = DirPool::from_remote(&dp.key(), rrset).unwrap();
        assert_eq!(observed.hostname, "dp.example.com.");
    }

    #[test]
    fn test_wire_codes_are_sorted() {
        let dp = DirPool::from_config(&config()).unwrap();
        let geo = dp
            .members
            .iter()
            .find_map(|m| m.info.geo_info.as_ref())
            .unwrap();
        assert_eq!(geo.codes, vec!["US-DC", "US-MA", "US-OK"]);
    }

    #[test]
    fn test_conflict_resolve_defaults_to_geo_on_read() {
        let dp = DirPool::from_config(&config()).unwrap();
        let mut rrset = dp.to_remote().unwrap();
        let text = rrset.profile.as_ref().unwrap().as_str().replace(r#""conflictResolve":"GEO","#, "");
        rrset.profile = Some(profile::ProfileDocument::from_json(text).unwrap());
        let back = DirPool::from_remote(&dp.key(), rrset).unwrap();
        assert_eq!(back.conflict_resolve, "GEO");
    }

    #[test]
    fn test_other_schema_is_rejected() {
        let dp = DirPool::from_config(&config()).unwrap();
        let mut rrset = dp.to_remote().unwrap();
        rrset.profile = Some(
            profile::encode(&Profile::RdPool(crate::profile::RdPoolProfile::default())).unwrap(),
        );
        assert!(matches!(
            DirPool::from_remote(&dp.key(), rrset),
            Err(Error::UnknownProfileSchema(_))
        ));
    }
}
