//! Registry configuration

use formdom::{normalize_id, Document};

use crate::error::ConfigError;
use crate::hooks::Hooks;
use crate::row::TableColumn;
use crate::validation::Validator;

/// A confirmation dialog: the modal to show and the button that confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub modal: String,
    pub confirm: String,
}

impl Confirmation {
    pub fn new(modal: impl Into<String>, confirm: impl Into<String>) -> Self {
        Self {
            modal: normalized(modal),
            confirm: normalized(confirm),
        }
    }
}

fn normalized(id: impl Into<String>) -> String {
    let id = id.into();
    normalize_id(&id).to_string()
}

/// Configuration of a [`SubformRegistry`](crate::SubformRegistry).
///
/// Element ids may be given with or without a leading `#`. Everything is
/// checked once, when the registry is set up.
///
/// # Example
///
/// ```
/// use subform::{Confirmation, RegistryConfig};
/// use subform::row::TableColumn;
///
/// let config = RegistryConfig::new("items")
///     .with_form("#orderForm")
///     .with_modal("itemModal")
///     .with_update_button("updateItem")
///     .with_delete_confirmation(Confirmation::new("confirmDeletion", "confirmDelete"))
///     .with_column(TableColumn::field("Name", "name"));
/// ```
#[derive(Debug)]
pub struct RegistryConfig {
    /// Host form.
    ///
    /// Default: `form`
    pub form: String,

    /// Sub-form whose fields are captured on add/update.
    ///
    /// Default: `subForm`
    pub subform: String,

    /// Modal wrapping the sub-form, if any.
    pub modal: Option<String>,

    /// Default: `addButton`
    pub add_button: String,

    /// Update button. Rows offer an edit action only when this is set.
    pub update_button: Option<String>,

    /// Element receiving the table rows (usually a table body).
    ///
    /// Default: `subFormTable`
    pub table: String,

    /// Hidden container holding one node per record.
    ///
    /// Default: `subFormContainer`
    pub container: String,

    /// Input mirroring the id of the record being edited.
    pub holder: Option<String>,

    pub delete_confirmation: Option<Confirmation>,
    pub update_confirmation: Option<Confirmation>,

    /// Prefix of the serialized field names.
    pub prefix: String,

    /// Default: `deletedHashes`
    pub deleted_field_name: String,

    /// Default: `updatedHashes`
    pub updated_field_name: String,

    /// Table data generators. Empty means one cell per field value.
    pub columns: Vec<TableColumn>,

    /// Validator backing the default guards.
    pub validator: Option<Validator>,

    pub hooks: Hooks,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            form: "form".to_string(),
            subform: "subForm".to_string(),
            modal: None,
            add_button: "addButton".to_string(),
            update_button: None,
            table: "subFormTable".to_string(),
            container: "subFormContainer".to_string(),
            holder: None,
            delete_confirmation: None,
            update_confirmation: None,
            prefix: String::new(),
            deleted_field_name: "deletedHashes".to_string(),
            updated_field_name: "updatedHashes".to_string(),
            columns: Vec::new(),
            validator: None,
            hooks: Hooks::default(),
        }
    }
}

impl RegistryConfig {
    /// Creates a config with default element ids and the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_form(mut self, id: impl Into<String>) -> Self {
        self.form = normalized(id);
        self
    }

    pub fn with_subform(mut self, id: impl Into<String>) -> Self {
        self.subform = normalized(id);
        self
    }

    pub fn with_modal(mut self, id: impl Into<String>) -> Self {
        self.modal = Some(normalized(id));
        self
    }

    pub fn with_add_button(mut self, id: impl Into<String>) -> Self {
        self.add_button = normalized(id);
        self
    }

    pub fn with_update_button(mut self, id: impl Into<String>) -> Self {
        self.update_button = Some(normalized(id));
        self
    }

    pub fn with_table(mut self, id: impl Into<String>) -> Self {
        self.table = normalized(id);
        self
    }

    pub fn with_container(mut self, id: impl Into<String>) -> Self {
        self.container = normalized(id);
        self
    }

    pub fn with_holder(mut self, id: impl Into<String>) -> Self {
        self.holder = Some(normalized(id));
        self
    }

    pub fn with_delete_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.delete_confirmation = Some(confirmation);
        self
    }

    pub fn with_update_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.update_confirmation = Some(confirmation);
        self
    }

    pub fn with_deleted_field_name(mut self, name: impl Into<String>) -> Self {
        self.deleted_field_name = name.into();
        self
    }

    pub fn with_updated_field_name(mut self, name: impl Into<String>) -> Self {
        self.updated_field_name = name.into();
        self
    }

    pub fn with_column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Checks the prefix and every configured element against `doc`.
    pub fn check(&self, doc: &Document) -> Result<(), ConfigError> {
        if self.prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        let required = [
            ("form", &self.form),
            ("sub-form", &self.subform),
            ("add button", &self.add_button),
        ];
        for (role, id) in required {
            require(doc, role, id)?;
        }

        for (role, id) in [("table", &self.table), ("hidden container", &self.container)] {
            let element = require(doc, role, id)?;
            if !element.content.is_container() {
                return Err(ConfigError::NotAContainer {
                    role,
                    id: id.clone(),
                });
            }
        }

        let optional = [
            ("modal", self.modal.as_ref()),
            ("update button", self.update_button.as_ref()),
            ("update holder", self.holder.as_ref()),
        ];
        for (role, id) in optional {
            if let Some(id) = id {
                require(doc, role, id)?;
            }
        }

        if let Some(c) = &self.delete_confirmation {
            require(doc, "delete confirmation modal", &c.modal)?;
            require(doc, "delete confirmation button", &c.confirm)?;
        }
        if let Some(c) = &self.update_confirmation {
            if self.update_button.is_none() {
                return Err(ConfigError::missing("update button", "<unset>"));
            }
            require(doc, "update confirmation modal", &c.modal)?;
            require(doc, "update confirmation button", &c.confirm)?;
        }

        Ok(())
    }
}

fn require<'a>(
    doc: &'a Document,
    role: &'static str,
    id: &str,
) -> Result<&'a formdom::Element, ConfigError> {
    doc.get(id).ok_or_else(|| ConfigError::missing(role, id))
}
