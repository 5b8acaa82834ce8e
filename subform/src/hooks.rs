//! Registry hooks.
//!
//! Each hook is optional. When a hook is not set the registry falls back to
//! its documented default:
//!
//! | hook | default |
//! |---|---|
//! | `on_before_add` | run the configured validator on the sub-form (true when none) |
//! | `on_after_add` | close the modal, reset the sub-form, clear validation marks |
//! | `on_before_update` | same as `on_before_add` |
//! | `on_after_update` | same as `on_after_add` |
//!
//! A guard returning `false` cancels the operation before anything changes,
//! and the matching after-hook does not run.

use std::fmt;

use formdom::{Document, DomError};

use crate::record::RecordId;
use crate::registry::Targets;

/// Synchronous guard run before add or update.
pub type Guard = Box<dyn FnMut(&mut Document) -> bool>;

/// Hook run after a successful add or update, with the new record's id.
pub type AfterHook = Box<dyn FnMut(&mut Document, &Targets, &RecordId) -> Result<(), DomError>>;

#[derive(Default)]
pub struct Hooks {
    pub(crate) on_before_add: Option<Guard>,
    pub(crate) on_after_add: Option<AfterHook>,
    pub(crate) on_before_update: Option<Guard>,
    pub(crate) on_after_update: Option<AfterHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_add<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Document) -> bool + 'static,
    {
        self.on_before_add = Some(Box::new(f));
        self
    }

    pub fn on_after_add<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Document, &Targets, &RecordId) -> Result<(), DomError> + 'static,
    {
        self.on_after_add = Some(Box::new(f));
        self
    }

    pub fn on_before_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Document) -> bool + 'static,
    {
        self.on_before_update = Some(Box::new(f));
        self
    }

    pub fn on_after_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Document, &Targets, &RecordId) -> Result<(), DomError> + 'static,
    {
        self.on_after_update = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_before_add", &self.on_before_add.is_some())
            .field("on_after_add", &self.on_after_add.is_some())
            .field("on_before_update", &self.on_before_update.is_some())
            .field("on_after_update", &self.on_after_update.is_some())
            .finish()
    }
}
