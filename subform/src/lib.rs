//! Repeatable sub-form registry.
//!
//! Keeps a set of sub-form records serialized into hidden inputs of a host
//! form and mirrored as rows of a table, so the server can rebuild the final
//! record set on submit.

pub mod config;
pub mod error;
pub mod hooks;
pub mod listview;
pub mod naming;
pub mod record;
pub mod registry;
pub mod row;
pub mod validation;

pub use config::{Confirmation, RegistryConfig};
pub use error::{ConfigError, RegistryError};
pub use hooks::Hooks;
pub use record::{FieldMap, Origin, Record, RecordId};
pub use registry::{Action, SubformRegistry, Targets};

pub mod prelude {
    pub use crate::config::{Confirmation, RegistryConfig};
    pub use crate::error::{ConfigError, RegistryError};
    pub use crate::hooks::Hooks;
    pub use crate::naming::SubmittedRecords;
    pub use crate::record::{FieldMap, Origin, Record, RecordId};
    pub use crate::registry::{Action, SubformRegistry, Targets};
    pub use crate::row::{RowAction, RowDescriptor, TableColumn};
    pub use crate::validation::{FieldError, ValidationResult, ValidationSettings, Validator};

    pub use formdom::{Document, Element, Event};
}
