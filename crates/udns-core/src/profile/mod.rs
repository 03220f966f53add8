//! Pool profiles attached to RRSets
//!
//! A profile is one JSON object whose `@context` field names the schema of
//! the rest of the object. Four structured schemas are known; anything else
//! can only travel as an opaque string.

pub mod codec;
mod dirpool;
mod rdpool;
mod sbpool;
mod tcpool;

pub use codec::{ProfileDocument, decode, decode_as, encode};
pub use dirpool::{DirPoolProfile, DpRdataInfo, GeoInfo, IpAddress, IpInfo};
pub use rdpool::RdPoolProfile;
pub use sbpool::{BackupRecord, SbPoolProfile, SbRdataInfo};
pub use tcpool::TcPoolProfile;

use std::fmt;

/// Known structured profile schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileSchema {
    /// Directional pool
    DirPool,
    /// Resource-distribution pool
    RdPool,
    /// Simple load-balancing pool
    SbPool,
    /// Traffic-controller pool
    TcPool,
}

/// Configuration attribute name for each structured schema
pub const PROFILE_ATTRIBUTES: [(&str, ProfileSchema); 4] = [
    ("dirpool_profile", ProfileSchema::DirPool),
    ("rdpool_profile", ProfileSchema::RdPool),
    ("sbpool_profile", ProfileSchema::SbPool),
    ("tcpool_profile", ProfileSchema::TcPool),
];

impl ProfileSchema {
    /// All structured schemas
    pub const ALL: [ProfileSchema; 4] = [Self::DirPool, Self::RdPool, Self::SbPool, Self::TcPool];

    /// Schema URI carried in `@context`
    pub fn uri(self) -> &'static str {
        match self {
            Self::DirPool => "http://schemas.ultradns.com/DirPool.jsonschema",
            Self::RdPool => "http://schemas.ultradns.com/RDPool.jsonschema",
            Self::SbPool => "http://schemas.ultradns.com/SBPool.jsonschema",
            Self::TcPool => "http://schemas.ultradns.com/TCPool.jsonschema",
        }
    }

    /// Look up a schema by its `@context` URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|schema| schema.uri() == uri)
    }

    /// Configuration attribute holding this schema's block
    pub fn attribute(self) -> &'static str {
        PROFILE_ATTRIBUTES
            .iter()
            .find(|(_, schema)| *schema == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }

    /// Look up a schema by configuration attribute name
    pub fn from_attribute(name: &str) -> Option<Self> {
        PROFILE_ATTRIBUTES
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, schema)| *schema)
    }
}

impl fmt::Display for ProfileSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Shape a profile is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Opaque JSON text
    String,
    /// One of the known schemas
    Structured(ProfileSchema),
}

/// Decoded profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// Opaque JSON document, passed through verbatim
    String(String),
    DirPool(DirPoolProfile),
    RdPool(RdPoolProfile),
    SbPool(SbPoolProfile),
    TcPool(TcPoolProfile),
}

impl Profile {
    /// Kind of this profile
    pub fn kind(&self) -> ProfileKind {
        match self.schema() {
            Some(schema) => ProfileKind::Structured(schema),
            None => ProfileKind::String,
        }
    }

    /// Schema of a structured profile
    pub fn schema(&self) -> Option<ProfileSchema> {
        match self {
            Self::String(_) => None,
            Self::DirPool(_) => Some(ProfileSchema::DirPool),
            Self::RdPool(_) => Some(ProfileSchema::RdPool),
            Self::SbPool(_) => Some(ProfileSchema::SbPool),
            Self::TcPool(_) => Some(ProfileSchema::TcPool),
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_uri_table() {
        for schema in ProfileSchema::ALL {
            assert_eq!(ProfileSchema::from_uri(schema.uri()), Some(schema));
            assert_eq!(ProfileSchema::from_attribute(schema.attribute()), Some(schema));
        }
        assert_eq!(
            ProfileSchema::TcPool.uri(),
            "http://schemas.ultradns.com/TCPool.jsonschema"
        );
        assert_eq!(ProfileSchema::from_uri("http://schemas.ultradns.com/Nope.jsonschema"), None);
    }

    #[test]
    fn test_profile_kind() {
        assert_eq!(Profile::String("{}".into()).kind(), ProfileKind::String);
        assert_eq!(
            Profile::RdPool(RdPoolProfile::default()).kind(),
            ProfileKind::Structured(ProfileSchema::RdPool)
        );
    }
}
