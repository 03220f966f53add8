//! Profile codec
//!
//! Converts between [`Profile`] values and the JSON documents stored on an
//! RRSet. Structured profiles get their `@context` injected on encode and
//! are dispatched on it during decode.

use super::{Profile, ProfileKind, ProfileSchema};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Encoded profile document, kept byte-for-byte as received or produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileDocument(Box<RawValue>);

impl ProfileDocument {
    /// Wrap JSON text, failing if it is not valid JSON
    pub fn from_json(text: impl Into<String>) -> Result<Self> {
        Ok(Self(RawValue::from_string(text.into())?))
    }

    /// Document text
    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for ProfileDocument {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ProfileDocument {}

impl fmt::Display for ProfileDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Deserialize)]
struct Context {
    #[serde(rename = "@context", default)]
    context: Option<String>,
}

fn tagged<T: Serialize>(schema: ProfileSchema, body: &T) -> Result<ProfileDocument> {
    let raw = serde_json::value::to_raw_value(&Tagged {
        context: schema.uri(),
        body,
    })?;
    Ok(ProfileDocument(raw))
}

/// Encode a profile into its wire document
pub fn encode(profile: &Profile) -> Result<ProfileDocument> {
    match profile {
        Profile::String(text) => ProfileDocument::from_json(text.clone()),
        Profile::DirPool(p) => tagged(ProfileSchema::DirPool, p),
        Profile::RdPool(p) => tagged(ProfileSchema::RdPool, p),
        Profile::SbPool(p) => tagged(ProfileSchema::SbPool, p),
        Profile::TcPool(p) => tagged(ProfileSchema::TcPool, p),
    }
}

/// Schema named by a document's `@context`
pub fn schema_of(doc: &ProfileDocument) -> Result<ProfileSchema> {
    let Context { context } = serde_json::from_str(doc.as_str())?;
    match context {
        Some(uri) => ProfileSchema::from_uri(&uri).ok_or(Error::UnknownProfileSchema(uri)),
        None => Err(Error::unknown_schema("missing @context")),
    }
}

/// Decode a document, dispatching on its `@context`
pub fn decode(doc: &ProfileDocument) -> Result<Profile> {
    let schema = schema_of(doc)?;
    decode_schema(schema, doc)
}

/// Decode a document whose expected kind is known
///
/// `ProfileKind::String` returns the document text unchanged. A structured
/// kind fails when the document names a different schema.
pub fn decode_as(kind: ProfileKind, doc: &ProfileDocument) -> Result<Profile> {
    match kind {
        ProfileKind::String => Ok(Profile::String(doc.as_str().to_string())),
        ProfileKind::Structured(expected) => {
            let found = schema_of(doc)?;
            if found != expected {
                return Err(Error::unknown_schema(format!(
                    "expected {} but document is {}",
                    expected, found
                )));
            }
            decode_schema(expected, doc)
        }
    }
}

fn decode_schema(schema: ProfileSchema, doc: &ProfileDocument) -> Result<Profile> {
    let text = doc.as_str();
    Ok(match schema {
        ProfileSchema::DirPool => Profile::DirPool(serde_json::from_str(text)?),
        ProfileSchema::RdPool => Profile::RdPool(serde_json::from_str(text)?),
        ProfileSchema::SbPool => Profile::SbPool(serde_json::from_str(text)?),
        ProfileSchema::TcPool => Profile::TcPool(serde_json::from_str(text)?),
    })
}
