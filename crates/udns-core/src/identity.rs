//! Identity keys for unordered collection elements
//!
//! Pool members are declared as sets, so their position carries no meaning.
//! To let configuration diffs say "the member that hashed to X changed",
//! each member gets a deterministic identity: the CRC-32 (IEEE) of a
//! canonical string built from its attributes in a fixed field order,
//! reinterpreted as a signed 32-bit value and folded to its magnitude.
//!
//! Canonical form rules:
//! - every scalar is written in its textual form followed by `-`;
//! - booleans are written as `true` / `false`;
//! - optional attributes are written with their defaults filled in, so a
//!   member relying on a default hashes like one stating it;
//! - nested code lists are sorted and each code is followed by `,`;
//! - nested structured sets are written in the order of their own
//!   identities, compared as decimal text.
//!
//! Identities are never sent to the remote store.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Separator written after each scalar field
pub const FIELD_SEPARATOR: char = '-';

/// Separator written after each nested code
pub const CODE_SEPARATOR: char = ',';

/// CRC-32 (IEEE polynomial) of a canonical string
pub fn checksum(canonical: &str) -> u32 {
    crc32fast::hash(canonical.as_bytes())
}

/// Identity key of a canonical string
///
/// The checksum is read as an `i32` and folded to its magnitude, so keys
/// always fit in 31 bits. `i32::MIN` has no positive counterpart and maps
/// to zero.
pub fn identity_key(canonical: &str) -> u32 {
    let signed = checksum(canonical) as i32;
    signed.checked_abs().map_or(0, |v| v as u32)
}

/// Builder for canonical strings
#[derive(Debug, Default)]
pub struct Canonical {
    buf: String,
}

impl Canonical {
    /// Create an empty canonical string
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar field
    pub fn field(&mut self, value: impl fmt::Display) -> &mut Self {
        self.buf.push_str(&value.to_string());
        self.buf.push(FIELD_SEPARATOR);
        self
    }

    /// Append an optional field, writing nothing when it is unset or empty
    pub fn present(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.field(v),
            _ => self,
        }
    }

    /// Append an unordered list of codes in sorted order
    pub fn codes<I, S>(&mut self, codes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<S> = codes.into_iter().collect();
        sorted.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        for code in sorted {
            self.buf.push_str(code.as_ref());
            self.buf.push(CODE_SEPARATOR);
        }
        self
    }

    /// Append a nested set, ordered by the elements' identities as text
    pub fn nested<T: Identity>(&mut self, set: &IdentitySet<T>) -> &mut Self {
        let mut members: Vec<(String, &T)> = set
            .entries()
            .map(|(id, member)| (id.to_string(), member))
            .collect();
        members.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, member) in members {
            member.write_canonical(self);
        }
        self
    }

    /// The canonical string built so far
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the builder
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Types that have a stable identity key
pub trait Identity {
    /// Write this value's canonical form
    fn write_canonical(&self, out: &mut Canonical);

    /// Canonical string of this value
    fn canonical(&self) -> String {
        let mut out = Canonical::new();
        self.write_canonical(&mut out);
        out.into_string()
    }

    /// Identity key of this value
    fn identity(&self) -> u32 {
        identity_key(&self.canonical())
    }
}

/// Unordered collection addressed by identity
///
/// Deserializes from a sequence, collapses members with equal identities,
/// iterates and serializes in identity order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySet<T> {
    members: BTreeMap<u32, T>,
}

impl<T> IdentitySet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }

    /// Number of distinct members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by identity
    pub fn get(&self, identity: u32) -> Option<&T> {
        self.members.get(&identity)
    }

    /// Identities in ascending order
    pub fn identities(&self) -> impl Iterator<Item = u32> + '_ {
        self.members.keys().copied()
    }

    /// `(identity, member)` pairs in identity order
    pub fn entries(&self) -> impl Iterator<Item = (u32, &T)> {
        self.members.iter().map(|(id, m)| (*id, m))
    }

    /// Members in identity order
    pub fn iter(&self) -> std::collections::btree_map::Values<'_, u32, T> {
        self.members.values()
    }
}

impl<T: Identity> IdentitySet<T> {
    /// Insert a member, returning its identity
    ///
    /// A member with the same identity is replaced.
    pub fn insert(&mut self, member: T) -> u32 {
        let id = member.identity();
        self.members.insert(id, member);
        id
    }
}

impl<T> Default for IdentitySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identity> FromIterator<T> for IdentitySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for member in iter {
            set.insert(member);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a IdentitySet<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_map::Values<'a, u32, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.values()
    }
}

impl<T: Serialize> Serialize for IdentitySet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.members.values())
    }
}

impl<'de, T: Deserialize<'de> + Identity> Deserialize<'de> for IdentitySet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let members = Vec::<T>::deserialize(deserializer)?;
        Ok(members.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DirPoolMemberConfig, GeoInfoConfig, IpInfoConfig, TcPoolMemberConfig};
    use crate::profile::IpAddress;

    fn dirpool_member(host: &str, all_non_configured: bool) -> DirPoolMemberConfig {
        DirPoolMemberConfig {
            host: host.to_string(),
            all_non_configured,
            geo_info: None,
            ip_info: None,
        }
    }

    #[test]
    fn test_checksum_is_crc32_ieee() {
        assert_eq!(checksum("123456789"), 0xCBF4_3926);
        assert_eq!(checksum(""), 0);
    }

    #[test]
    fn test_identity_key_folds_sign() {
        // 3197355849 as i32 is -1097611447
        assert_eq!(checksum("200.20.0.1-200.20.0.10--"), 3197355849);
        assert_eq!(identity_key("200.20.0.1-200.20.0.10--"), 1097611447);
        assert_eq!(identity_key("10.1.0.1-true-"), 478925311);
    }

    #[test]
    fn test_dirpool_member_fixtures() {
        let m = dirpool_member("10.1.0.1", true);
        assert_eq!(m.canonical(), "10.1.0.1-true-");
        assert_eq!(m.identity(), 478925311);

        assert_eq!(dirpool_member("10.1.1.1", true).identity(), 200328636);
    }

    #[test]
    fn test_dirpool_geo_member_fixture() {
        let m = DirPoolMemberConfig {
            geo_info: Some(GeoInfoConfig {
                name: "North America".to_string(),
                is_account_level: false,
                codes: ["US-OK", "US-DC", "US-MA"].iter().map(|c| c.to_string()).collect(),
            }),
            ..dirpool_member("10.1.1.2", false)
        };
        assert_eq!(m.canonical(), "10.1.1.2-false-North America-false-US-DC,US-MA,US-OK,");
        assert_eq!(m.identity(), 740247500);
    }

    #[test]
    fn test_dirpool_ip_member_fixture() {
        let ips = vec![
            IpAddress::address("50.60.70.80"),
            IpAddress::cidr("20.20.20.0/24"),
            IpAddress::range("200.20.0.1", "200.20.0.10"),
        ];
        let m = DirPoolMemberConfig {
            ip_info: Some(IpInfoConfig {
                name: "some Ips".to_string(),
                is_account_level: false,
                ips: ips.into_iter().collect(),
            }),
            ..dirpool_member("10.1.1.3", false)
        };
        assert_eq!(
            m.canonical(),
            "10.1.1.3-false-some Ips-false-200.20.0.1-200.20.0.10-20.20.20.0/24-50.60.70.80-"
        );
        assert_eq!(m.identity(), 1918680333);
    }

    #[test]
    fn test_tcpool_member_fixture() {
        let m = TcPoolMemberConfig::new("10.6.0.1");
        assert_eq!(m.canonical(), "10.6.0.1-0-1-true-NORMAL-1-2-");
        assert_eq!(m.identity(), 1055516612);
    }

    #[test]
    fn test_explicit_default_hashes_like_implicit_default() {
        let implicit: TcPoolMemberConfig =
            serde_json::from_str(r#"{"host": "10.6.0.1"}"#).unwrap();
        let explicit: TcPoolMemberConfig = serde_json::from_str(
            r#"{"host": "10.6.0.1", "priority": 1, "weight": 2, "state": "NORMAL"}"#,
        )
        .unwrap();
        assert_eq!(implicit.identity(), explicit.identity());
    }

    #[test]
    fn test_scalar_change_changes_identity() {
        let base = TcPoolMemberConfig::new("10.6.0.1");
        let variants = [
            TcPoolMemberConfig { host: "10.6.0.2".into(), ..base.clone() },
            TcPoolMemberConfig { failover_delay: 5, ..base.clone() },
            TcPoolMemberConfig { priority: 2, ..base.clone() },
            TcPoolMemberConfig { run_probes: false, ..base.clone() },
            TcPoolMemberConfig { state: "INACTIVE".into(), ..base.clone() },
            TcPoolMemberConfig { threshold: 2, ..base.clone() },
            TcPoolMemberConfig { weight: 4, ..base.clone() },
        ];
        let mut seen: IdentitySet<TcPoolMemberConfig> = variants.iter().cloned().collect();
        seen.insert(base);
        assert_eq!(seen.len(), variants.len() + 1);
    }

    #[test]
    fn test_identity_set_collapses_duplicates_and_serializes_in_order() {
        let set: IdentitySet<DirPoolMemberConfig> = vec![
            dirpool_member("10.1.1.1", true),
            dirpool_member("10.1.0.1", true),
            dirpool_member("10.1.1.1", true),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.identities().collect::<Vec<_>>(), vec![200328636, 478925311]);
        assert_eq!(set.get(478925311).map(|m| m.host.as_str()), Some("10.1.0.1"));

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["host"], "10.1.1.1");
        assert_eq!(json[1]["host"], "10.1.0.1");
    }
}
