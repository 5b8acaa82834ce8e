//! Sub-form records

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field values captured from a sub-form, in document order.
pub type FieldMap = IndexMap<String, String>;

/// Identifier correlating a record with its hidden node and table row.
///
/// Client-created records get a random UUID v4; server-supplied records reuse
/// their server hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Added during this page session.
    ClientCreated,
    /// Rendered by the server before the session started.
    ServerSupplied { hash: String },
}

impl Origin {
    /// Value of the `origin` data attribute.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Self::ClientCreated => "client",
            Self::ServerSupplied { .. } => "server",
        }
    }

    /// The durable server hash, if any.
    pub fn server_hash(&self) -> Option<&str> {
        match self {
            Self::ClientCreated => None,
            Self::ServerSupplied { hash } => Some(hash),
        }
    }
}

/// One logical sub-form entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) id: RecordId,
    pub(crate) fields: FieldMap,
    pub(crate) origin: Origin,
}

impl Record {
    pub fn new(id: RecordId, fields: FieldMap, origin: Origin) -> Self {
        Self { id, fields, origin }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Returns the value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Serializes the fields into the JSON blob stored on the hidden node.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }

    /// Parses a JSON field blob. Field order is preserved.
    pub fn parse_blob(blob: &str) -> Result<FieldMap, serde_json::Error> {
        serde_json::from_str(blob)
    }
}
