//! Sub-form registry.
//!
//! The registry is the only writer of the hidden container, the table body and
//! the pending container. It keeps an explicit map from record id to the
//! handles of the record's hidden node and table row, in table order.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = SubformRegistry::setup(&mut doc, RegistryConfig::new("items"))?;
//! registry.rehydrate(&mut doc)?;
//!
//! // Wire user events
//! registry.dispatch(&mut doc, &Event::click("addButton"))?;
//! ```

mod fields;
mod targets;

pub use targets::Targets;

use std::collections::HashSet;

use formdom::element::descendants;
use formdom::{Bindings, Document, Element, Event, EventKind};
use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::config::{Confirmation, RegistryConfig};
use crate::error::{ConfigError, RegistryError};
use crate::hooks::Hooks;
use crate::naming::{self, GroupPattern, IndexCounter};
use crate::record::{FieldMap, Origin, Record, RecordId};
use crate::row::{RowAction, RowDescriptor, TableColumn};
use crate::validation::{FieldError, Validator};

/// What a bound control does when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Edit(RecordId),
    Delete(RecordId),
    ConfirmDelete,
    ConfirmUpdate,
}

/// Handles of one live record.
#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    node: String,
    row: String,
    buttons: Vec<String>,
    /// Group index of the record's `{prefix}[N].*` inputs, if it has any.
    index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Add,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retirement {
    Delete,
    Update,
}

pub struct SubformRegistry {
    targets: Targets,
    pattern: GroupPattern,
    deleted_field_name: String,
    updated_field_name: String,
    columns: Vec<TableColumn>,
    validator: Option<Validator>,
    hooks: Hooks,
    delete_confirmation: Option<Confirmation>,
    update_confirmation: Option<Confirmation>,

    entries: IndexMap<RecordId, Entry>,
    bindings: Bindings<Action>,
    groups: IndexCounter,
    deleted: IndexCounter,
    updated: IndexCounter,
    pending_deletes: Vec<String>,
    pending_updates: Vec<String>,

    /// Record currently loaded into the sub-form for update.
    editing: Option<RecordId>,
    /// Record waiting for the delete confirmation.
    awaiting_delete: Option<RecordId>,
    /// Fields that made the default guard reject the last add or update.
    rejected: Vec<FieldError>,
}

impl SubformRegistry {
    /// Checks `config` against `doc` and binds the registry's controls.
    ///
    /// Fails when the prefix is empty or a required element is absent.
    pub fn setup(doc: &mut Document, config: RegistryConfig) -> Result<Self, ConfigError> {
        config.check(doc)?;

        let pattern = GroupPattern::new(config.prefix.as_str())?;
        let settings = config
            .validator
            .as_ref()
            .map(|v| v.settings().clone())
            .unwrap_or_default();

        let pending = format!("{}-pending", config.form);
        if !doc.contains(&pending) {
            doc.append_child(&config.form, Element::div().id(pending.clone()).hidden(true))?;
        }

        let targets = Targets {
            form: config.form,
            subform: config.subform,
            modal: config.modal,
            add_button: config.add_button,
            update_button: config.update_button,
            table: config.table,
            container: config.container,
            holder: config.holder,
            pending,
            settings,
        };

        let mut bindings = Bindings::new();
        bindings.bind(targets.add_button.as_str(), EventKind::Click, Action::Add);
        if let Some(update) = &targets.update_button {
            bindings.bind(update.as_str(), EventKind::Click, Action::Update);
        }
        if let Some(c) = &config.delete_confirmation {
            bindings.bind(c.confirm.as_str(), EventKind::Click, Action::ConfirmDelete);
        }
        if let Some(c) = &config.update_confirmation {
            bindings.bind(c.confirm.as_str(), EventKind::Click, Action::ConfirmUpdate);
        }

        targets.show_add_mode(doc)?;

        debug!(
            "sub-form registry ready: prefix '{}', container '{}', table '{}'",
            pattern.prefix(),
            targets.container,
            targets.table
        );

        Ok(Self {
            targets,
            pattern,
            deleted_field_name: config.deleted_field_name,
            updated_field_name: config.updated_field_name,
            columns: config.columns,
            validator: config.validator,
            hooks: config.hooks,
            delete_confirmation: config.delete_confirmation,
            update_confirmation: config.update_confirmation,
            entries: IndexMap::new(),
            bindings,
            groups: IndexCounter::new(),
            deleted: IndexCounter::new(),
            updated: IndexCounter::new(),
            pending_deletes: Vec::new(),
            pending_updates: Vec::new(),
            editing: None,
            awaiting_delete: None,
            rejected: Vec::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.entries.get(id).map(|e| &e.record)
    }

    /// Live records in table order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.values().map(|e| &e.record)
    }

    /// Live record ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.entries.keys()
    }

    /// Position of a record in the table.
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.entries.get_index_of(id)
    }

    /// Id of the hidden node backing a record.
    pub fn node_id(&self, id: &RecordId) -> Option<&str> {
        self.entries.get(id).map(|e| e.node.as_str())
    }

    /// Id of the table row mirroring a record.
    pub fn row_id(&self, id: &RecordId) -> Option<&str> {
        self.entries.get(id).map(|e| e.row.as_str())
    }

    /// Group index of a record's serialized inputs.
    pub fn group_index(&self, id: &RecordId) -> Option<usize> {
        self.entries.get(id).and_then(|e| e.index)
    }

    /// Server hashes deleted this session.
    pub fn pending_deletes(&self) -> &[String] {
        &self.pending_deletes
    }

    /// Server hashes replaced this session.
    pub fn pending_updates(&self) -> &[String] {
        &self.pending_updates
    }

    pub fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    /// Fields the validator rejected on the last add or update attempt.
    pub fn rejected_fields(&self) -> &[FieldError] {
        &self.rejected
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Adds the sub-form's current values as a new record.
    ///
    /// Returns `Ok(None)` when the before-add guard cancels.
    pub fn add(&mut self, doc: &mut Document) -> Result<Option<RecordId>, RegistryError> {
        if !self.before(doc, Stage::Add) {
            debug!("add cancelled by guard");
            return Ok(None);
        }

        let id = self.insert_record(doc, None)?;

        match self.hooks.on_after_add.as_mut() {
            Some(hook) => hook(doc, &self.targets, &id)?,
            None => self.targets.close_and_reset(doc)?,
        }

        Ok(Some(id))
    }

    /// Loads a record into the sub-form and switches to update mode.
    ///
    /// The registry itself is left untouched.
    pub fn edit(&mut self, doc: &mut Document, id: &RecordId) -> Result<(), RegistryError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| RegistryError::UnknownRecord(id.clone()))?;

        let values = stored_fields(doc, entry)?;
        fields::populate(doc, &self.targets.subform, &values)?;

        self.targets.show_update_mode(doc)?;
        self.targets.set_holder(doc, id.as_str())?;
        self.targets.open_modal(doc)?;
        self.editing = Some(id.clone());

        debug!("editing record {}", id);
        Ok(())
    }

    /// Replaces the record being edited with the sub-form's current values.
    ///
    /// The replacement takes the original's table position. Returns
    /// `Ok(None)` when the before-update guard cancels.
    pub fn update(&mut self, doc: &mut Document) -> Result<Option<RecordId>, RegistryError> {
        let original = self.editing.clone().ok_or(RegistryError::NotEditing)?;
        if !self.entries.contains_key(&original) {
            self.editing = None;
            return Err(RegistryError::UnknownRecord(original));
        }

        if !self.before(doc, Stage::Update) {
            debug!("update of {} cancelled by guard", original);
            return Ok(None);
        }

        let id = self.insert_record(doc, Some(&original))?;
        self.retire(doc, &original, Retirement::Update)?;

        self.editing = None;
        self.targets.close_modal(doc)?;
        self.targets.show_add_mode(doc)?;
        self.targets.set_holder(doc, "")?;

        match self.hooks.on_after_update.as_mut() {
            Some(hook) => hook(doc, &self.targets, &id)?,
            None => self.targets.close_and_reset(doc)?,
        }

        debug!("record {} replaced by {}", original, id);
        Ok(Some(id))
    }

    /// Deletes a record. Deleting an unknown id is a no-op returning `false`.
    pub fn delete(&mut self, doc: &mut Document, id: &RecordId) -> Result<bool, RegistryError> {
        self.retire(doc, id, Retirement::Delete)
    }

    /// Turns server-rendered nodes of the hidden container into tracked
    /// records with table rows.
    ///
    /// Nodes already tracked are skipped, so running this twice is harmless.
    /// Every node is checked before anything changes. Returns the number of
    /// records added.
    pub fn rehydrate(&mut self, doc: &mut Document) -> Result<usize, RegistryError> {
        let tracked: HashSet<&str> = self.entries.values().map(|e| e.node.as_str()).collect();
        let container = doc.require(&self.targets.container)?;

        let mut found = Vec::new();
        let mut seen = HashSet::new();
        for node in container.child_elements() {
            if tracked.contains(node.id.as_str()) {
                continue;
            }

            let blob = node
                .data_attr("fields")
                .ok_or_else(|| RegistryError::MissingBlob {
                    node: node.id.clone(),
                })?;
            let values = Record::parse_blob(blob).map_err(|source| RegistryError::MalformedRecord {
                node: node.id.clone(),
                source,
            })?;
            let hash = node
                .data_attr("hash")
                .or_else(|| node.data_attr("record-id"))
                .ok_or_else(|| RegistryError::MissingHash {
                    node: node.id.clone(),
                })?;

            let id = RecordId::new(hash);
            if self.entries.contains_key(&id) || !seen.insert(id.clone()) {
                return Err(RegistryError::DuplicateRecord(id));
            }

            let index = descendants(node)
                .into_iter()
                .filter_map(|el| el.name.as_deref())
                .filter_map(|name| self.pattern.parse(name))
                .map(|(index, _)| index)
                .max();

            let origin = Origin::ServerSupplied {
                hash: hash.to_string(),
            };
            found.push((node.id.clone(), Record::new(id, values, origin), index));
        }

        let count = found.len();
        for (node, record, index) in found {
            if let Some(index) = index {
                self.groups.observe(index);
            }
            if let Some(element) = doc.get_mut(&node) {
                element.set_data("record-id", record.id().as_str());
                element.set_data("origin", record.origin().as_attr());
            }

            let (row, buttons) = self.render_row(doc, &record, None)?;
            self.entries.insert(
                record.id().clone(),
                Entry {
                    record,
                    node,
                    row,
                    buttons,
                    index,
                },
            );
        }

        info!("rehydrated {} server-supplied record(s)", count);
        Ok(count)
    }

    /// Routes a user event to the bound operation.
    ///
    /// Returns whether the event targeted one of the registry's controls.
    pub fn dispatch(&mut self, doc: &mut Document, event: &Event) -> Result<bool, RegistryError> {
        let Some(action) = self.bindings.get(event).cloned() else {
            return Ok(false);
        };
        debug!("dispatching {:?} from '{}'", action, event.target);

        match action {
            Action::Add => {
                self.add(doc)?;
            }
            Action::Update => match self.update_confirmation.as_ref().map(|c| c.modal.clone()) {
                Some(modal) => doc.set_hidden(&modal, false)?,
                None => {
                    self.update(doc)?;
                }
            },
            Action::Edit(id) => self.edit(doc, &id)?,
            Action::Delete(id) => match self.delete_confirmation.as_ref().map(|c| c.modal.clone()) {
                Some(modal) => {
                    self.awaiting_delete = Some(id);
                    doc.set_hidden(&modal, false)?;
                }
                None => {
                    self.delete(doc, &id)?;
                }
            },
            Action::ConfirmDelete => {
                if let Some(c) = &self.delete_confirmation {
                    doc.set_hidden(&c.modal, true)?;
                }
                match self.awaiting_delete.take() {
                    Some(id) => {
                        self.delete(doc, &id)?;
                    }
                    None => warn!("delete confirmed with no record selected"),
                }
            }
            Action::ConfirmUpdate => {
                if let Some(c) = &self.update_confirmation {
                    doc.set_hidden(&c.modal, true)?;
                }
                match self.editing {
                    Some(_) => {
                        self.update(doc)?;
                    }
                    None => warn!("update confirmed with no record in edit mode"),
                }
            }
        }

        Ok(true)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn before(&mut self, doc: &mut Document, stage: Stage) -> bool {
        self.rejected.clear();
        let guard = match stage {
            Stage::Add => self.hooks.on_before_add.as_mut(),
            Stage::Update => self.hooks.on_before_update.as_mut(),
        };
        if let Some(guard) = guard {
            return guard(doc);
        }

        let Some(validator) = &self.validator else {
            return true;
        };
        let errors = validator.validate(doc, &self.targets.subform).into_errors();
        if let Some(first) = errors.first() {
            warn!(
                "{:?} rejected: {} invalid field(s), first '{}' ({})",
                stage,
                errors.len(),
                first.field_name,
                first.message
            );
        }
        let valid = errors.is_empty();
        self.rejected = errors;
        valid
    }

    fn fresh_id(&self, doc: &Document) -> RecordId {
        loop {
            let id = RecordId::generate();
            if !self.entries.contains_key(&id) && !doc.contains(&node_id(&id)) {
                return id;
            }
            warn!("generated record id {} collides, retrying", id);
        }
    }

    /// Captures the sub-form into a new record, placed after `after` when given.
    fn insert_record(
        &mut self,
        doc: &mut Document,
        after: Option<&RecordId>,
    ) -> Result<RecordId, RegistryError> {
        let values = fields::capture(doc, &self.targets.subform)?;
        let id = self.fresh_id(doc);
        let record = Record::new(id.clone(), values, Origin::ClientCreated);

        let index = self.groups.next_index();
        let node = self.hidden_node(&record, index)?;
        let node_id = node.id.clone();

        let anchor = after.and_then(|a| self.entries.get(a));
        match anchor {
            Some(anchor) => doc.insert_after(&anchor.node, node)?,
            None => doc.append_child(&self.targets.container, node)?,
        }
        let after_row = anchor.map(|a| a.row.clone());

        let (row, buttons) = self.render_row(doc, &record, after_row.as_deref())?;

        let entry = Entry {
            record,
            node: node_id,
            row,
            buttons,
            index: Some(index),
        };
        match after.and_then(|a| self.entries.get_index_of(a)) {
            Some(pos) => {
                self.entries.shift_insert(pos + 1, id.clone(), entry);
            }
            None => {
                self.entries.insert(id.clone(), entry);
            }
        }

        debug!("added record {} as group {}", id, index);
        Ok(id)
    }

    fn hidden_node(&self, record: &Record, index: usize) -> Result<Element, RegistryError> {
        let blob = record.to_blob().map_err(RegistryError::Serialize)?;
        let inputs = record
            .fields()
            .iter()
            .map(|(name, value)| {
                Element::hidden_input(self.pattern.field_name(index, name), value.as_str())
            })
            .collect();

        Ok(Element::div()
            .id(node_id(record.id()))
            .hidden(true)
            .data("record-id", record.id().as_str())
            .data("origin", record.origin().as_attr())
            .data("fields", blob)
            .children(inputs))
    }

    /// Renders a row for `record`, appended or placed after `after_row`, and
    /// binds its action buttons.
    fn render_row(
        &mut self,
        doc: &mut Document,
        record: &Record,
        after_row: Option<&str>,
    ) -> Result<(String, Vec<String>), RegistryError> {
        let editable = self.targets.update_button.is_some();
        let rendered = RowDescriptor::describe(record, &self.columns, editable).render();
        let row = rendered.element.id.clone();

        match after_row {
            Some(after) => doc.insert_after(after, rendered.element)?,
            None => doc.append_child(&self.targets.table, rendered.element)?,
        }

        let mut buttons = Vec::with_capacity(rendered.actions.len());
        for (button, action) in rendered.actions {
            let action = match action {
                RowAction::Edit => Action::Edit(record.id().clone()),
                RowAction::Delete => Action::Delete(record.id().clone()),
            };
            self.bindings.bind(button.as_str(), EventKind::Click, action);
            buttons.push(button);
        }

        Ok((row, buttons))
    }

    fn retire(
        &mut self,
        doc: &mut Document,
        id: &RecordId,
        retirement: Retirement,
    ) -> Result<bool, RegistryError> {
        let Some(entry) = self.entries.get(id) else {
            debug!("delete of unknown record {} ignored", id);
            return Ok(false);
        };

        if let Some(hash) = entry.record.origin().server_hash() {
            let (name, counter, set) = match retirement {
                Retirement::Delete => (
                    &self.deleted_field_name,
                    &mut self.deleted,
                    &mut self.pending_deletes,
                ),
                Retirement::Update => (
                    &self.updated_field_name,
                    &mut self.updated,
                    &mut self.pending_updates,
                ),
            };
            let input = Element::hidden_input(naming::pending_name(name, counter.next_index()), hash)
                .data("record-id", id.as_str());
            doc.append_child(&self.targets.pending, input)?;
            set.push(hash.to_string());
        }

        let Some(entry) = self.entries.shift_remove(id) else {
            return Ok(false);
        };
        doc.remove(&entry.node);
        doc.remove(&entry.row);
        for button in &entry.buttons {
            self.bindings.unbind(button);
        }

        if retirement == Retirement::Delete {
            if self.editing.as_ref() == Some(id) {
                self.editing = None;
                self.targets.show_add_mode(doc)?;
                self.targets.set_holder(doc, "")?;
            }
            if self.awaiting_delete.as_ref() == Some(id) {
                self.awaiting_delete = None;
            }
        }

        debug!("record {} retired ({:?})", id, retirement);
        Ok(true)
    }
}

impl std::fmt::Debug for SubformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubformRegistry")
            .field("targets", &self.targets)
            .field("records", &self.entries.len())
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

fn node_id(id: &RecordId) -> String {
    format!("record-{id}")
}

/// Field values stored on a record's hidden node, falling back to the
/// record's own copy when the node is gone.
fn stored_fields(doc: &Document, entry: &Entry) -> Result<FieldMap, RegistryError> {
    match doc.get(&entry.node).and_then(|n| n.data_attr("fields")) {
        Some(blob) => Record::parse_blob(blob).map_err(|source| RegistryError::MalformedRecord {
            node: entry.node.clone(),
            source,
        }),
        None => Ok(entry.record.fields().clone()),
    }
}
