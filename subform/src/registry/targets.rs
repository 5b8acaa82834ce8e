//! Resolved element ids of one registry, plus the page-state helpers hooks use.

use formdom::{Document, DomError};

use super::fields;
use crate::validation::{clear_marks, ValidationSettings};

/// Element ids the registry works against, checked at setup.
#[derive(Debug, Clone)]
pub struct Targets {
    pub form: String,
    pub subform: String,
    pub modal: Option<String>,
    pub add_button: String,
    pub update_button: Option<String>,
    pub table: String,
    pub container: String,
    pub holder: Option<String>,
    /// Container for pending-delete and pending-update inputs.
    pub pending: String,
    pub(crate) settings: ValidationSettings,
}

impl Targets {
    pub fn open_modal(&self, doc: &mut Document) -> Result<(), DomError> {
        match &self.modal {
            Some(modal) => doc.set_hidden(modal, false),
            None => Ok(()),
        }
    }

    pub fn close_modal(&self, doc: &mut Document) -> Result<(), DomError> {
        match &self.modal {
            Some(modal) => doc.set_hidden(modal, true),
            None => Ok(()),
        }
    }

    /// Show the add button and hide the update button.
    pub fn show_add_mode(&self, doc: &mut Document) -> Result<(), DomError> {
        doc.set_hidden(&self.add_button, false)?;
        if let Some(update) = &self.update_button {
            doc.set_hidden(update, true)?;
        }
        Ok(())
    }

    /// Hide the add button and show the update button.
    pub fn show_update_mode(&self, doc: &mut Document) -> Result<(), DomError> {
        if let Some(update) = &self.update_button {
            doc.set_hidden(&self.add_button, true)?;
            doc.set_hidden(update, false)?;
        }
        Ok(())
    }

    pub(crate) fn set_holder(&self, doc: &mut Document, value: &str) -> Result<(), DomError> {
        match &self.holder {
            Some(holder) => doc.set_value(holder, value),
            None => Ok(()),
        }
    }

    /// Empty every sub-form field and drop its validation marks.
    pub fn reset_subform(&self, doc: &mut Document) -> Result<(), DomError> {
        fields::reset(doc, &self.subform)?;
        clear_marks(doc, &self.subform, &self.settings);
        Ok(())
    }

    /// Default after-add and after-update behavior.
    pub fn close_and_reset(&self, doc: &mut Document) -> Result<(), DomError> {
        self.close_modal(doc)?;
        self.reset_subform(doc)
    }
}
