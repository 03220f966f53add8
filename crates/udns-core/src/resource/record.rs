use super::{RRSet, RRSetKey, Resource, hostname};
use crate::config::{RecordConfig, Ttl};
use crate::error::Result;
use crate::profile::{self, Profile, ProfileDocument};

/// How a record's profile is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileForm {
    /// One of the typed `*_profile` blocks
    #[default]
    Typed,
    /// Raw JSON in `string_profile`
    Text,
}

/// Generic record, optionally carrying one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: RRSetKey,
    pub hostname: String,
    pub rdata: Vec<String>,
    pub ttl: u32,
    pub profile: Option<Profile>,
    document: Option<ProfileDocument>,
    form: ProfileForm,
}

impl Record {
    /// Build a record from its declared configuration
    ///
    /// The profile is encoded here, so a malformed `string_profile` fails
    /// before anything is sent.
    pub fn from_config(cfg: &RecordConfig) -> Result<Self> {
        cfg.validate()?;

        let profile = if let Some(p) = &cfg.dirpool_profile {
            Some(Profile::DirPool(p.clone()))
        } else if let Some(p) = &cfg.rdpool_profile {
            Some(Profile::RdPool(p.clone()))
        } else if let Some(p) = &cfg.sbpool_profile {
            Some(Profile::SbPool(p.clone()))
        } else if let Some(p) = &cfg.tcpool_profile {
            Some(Profile::TcPool(p.clone()))
        } else {
            cfg.string_profile
                .as_ref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| Profile::String(s.clone()))
        };
        let document = profile.as_ref().map(profile::encode).transpose()?;
        let form = match &profile {
            Some(Profile::String(_)) => ProfileForm::Text,
            _ => ProfileForm::Typed,
        };

        Ok(Self {
            key: RRSetKey::new(&cfg.zone, &cfg.rr_type, &cfg.name),
            hostname: hostname(&cfg.name, &cfg.zone),
            rdata: cfg.rdata.clone(),
            ttl: cfg.ttl.seconds()?,
            profile,
            document,
            form,
        })
    }

    /// Flatten back into configuration
    ///
    /// The profile comes back in the form it was declared in. Records read
    /// without a declaration use the typed block.
    pub fn to_config(&self) -> RecordConfig {
        let mut cfg = RecordConfig::new(
            &self.key.zone,
            &self.key.name,
            &self.key.rr_type,
            self.rdata.clone(),
        );
        cfg.ttl = Ttl::from(self.ttl);
        cfg.hostname = Some(self.hostname.clone());
        if let (ProfileForm::Text, Some(doc)) = (self.form, &self.document) {
            cfg.string_profile = Some(doc.as_str().to_string());
            return cfg;
        }
        match &self.profile {
            Some(Profile::String(text)) => cfg.string_profile = Some(text.clone()),
            Some(Profile::DirPool(p)) => cfg.dirpool_profile = Some(p.clone()),
            Some(Profile::RdPool(p)) => cfg.rdpool_profile = Some(p.clone()),
            Some(Profile::SbPool(p)) => cfg.sbpool_profile = Some(p.clone()),
            Some(Profile::TcPool(p)) => cfg.tcpool_profile = Some(p.clone()),
            None => {}
        }
        cfg
    }

    /// Profile document as submitted or as fetched
    pub fn profile_document(&self) -> Option<&ProfileDocument> {
        self.document.as_ref()
    }

    pub fn profile_form(&self) -> ProfileForm {
        self.form
    }

    /// Report the profile in `form` from now on
    pub fn with_profile_form(self, form: ProfileForm) -> Self {
        Self { form, ..self }
    }
}

impl Resource for Record {
    type Key = RRSetKey;
    type Remote = RRSet;

    const KIND: &'static str = "record";

    fn key(&self) -> RRSetKey {
        self.key.clone()
    }

    fn id(&self) -> String {
        self.key.id()
    }

    fn to_remote(&self) -> Result<RRSet> {
        Ok(RRSet {
            owner_name: self.key.name.clone(),
            rr_type: self.key.rr_type.clone(),
            rdata: self.rdata.clone(),
            ttl: self.ttl,
            profile: self.document.clone(),
        })
    }

    fn from_remote(key: &RRSetKey, remote: RRSet) -> Result<Self> {
        let profile = remote.profile.as_ref().map(profile::decode).transpose()?;
        Ok(Self {
            key: key.clone(),
            hostname: hostname(&remote.owner_name, &key.zone),
            rdata: remote.rdata,
            ttl: remote.ttl,
            profile,
            document: remote.profile,
            form: ProfileForm::Typed,
        })
    }

    fn declared_as(self, declared: &Self) -> Self {
        self.with_profile_form(declared.form)
    }
}
