//! Error types

use formdom::DomError;

use crate::record::RecordId;

/// Integration mistakes detected when the registry is set up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The serialized field-name prefix is empty.
    #[error("field name prefix must not be empty")]
    EmptyPrefix,

    /// A required element is absent from the document.
    #[error("required {role} element '{id}' not found")]
    MissingElement { role: &'static str, id: String },

    /// An element that must hold children holds text.
    #[error("{role} element '{id}' cannot hold children")]
    NotAContainer { role: &'static str, id: String },

    /// The prefix could not be turned into a name pattern.
    #[error("invalid field name prefix: {0}")]
    Prefix(#[from] regex::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl ConfigError {
    pub fn missing(role: &'static str, id: impl Into<String>) -> Self {
        Self::MissingElement {
            role,
            id: id.into(),
        }
    }
}

/// Errors raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No live record carries the given id.
    #[error("no record with id '{0}'")]
    UnknownRecord(RecordId),

    /// Update was requested while no record is being edited.
    #[error("update requested without a record in edit mode")]
    NotEditing,

    /// A server-rendered node carries no field blob.
    #[error("record node '{node}' has no field blob")]
    MissingBlob { node: String },

    /// A server-rendered node carries neither a hash nor a record id.
    #[error("record node '{node}' has no server hash")]
    MissingHash { node: String },

    /// Two server-rendered nodes share one hash.
    #[error("record '{0}' is rendered more than once")]
    DuplicateRecord(RecordId),

    /// A node's field blob is not a JSON object of strings.
    #[error("record node '{node}' has a malformed field blob: {source}")]
    MalformedRecord {
        node: String,
        #[source]
        source: serde_json::Error,
    },

    /// The captured fields could not be serialized.
    #[error("failed to serialize record fields: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}
