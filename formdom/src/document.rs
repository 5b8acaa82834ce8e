//! Document ownership and id-based mutation.

use crate::element::{
    descendants, find_element, find_element_mut, insert_after, normalize_id, remove_element,
    Element, Tag,
};
use crate::error::DomError;

/// A page: the root element plus id-based lookup and mutation.
///
/// Every id argument accepts an optional leading `#`.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        find_element(&self.root, normalize_id(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_element_mut(&mut self.root, normalize_id(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up an element, failing with [`DomError::MissingElement`].
    pub fn require(&self, id: &str) -> Result<&Element, DomError> {
        self.get(id)
            .ok_or_else(|| DomError::MissingElement(normalize_id(id).to_string()))
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut Element, DomError> {
        self.get_mut(id)
            .ok_or_else(|| DomError::MissingElement(normalize_id(id).to_string()))
    }

    /// Append `element` as the last child of `parent_id`.
    pub fn append_child(&mut self, parent_id: &str, element: Element) -> Result<(), DomError> {
        let parent = self.require_mut(parent_id)?;
        let parent_name = parent.id.clone();
        let children = parent
            .child_elements_mut()
            .ok_or(DomError::NotAContainer(parent_name))?;
        children.push(element);
        Ok(())
    }

    /// Insert `element` directly after `sibling_id`, under the same parent.
    pub fn insert_after(&mut self, sibling_id: &str, element: Element) -> Result<(), DomError> {
        let sibling_id = normalize_id(sibling_id);
        if self.root.id == sibling_id {
            return Err(DomError::Root(sibling_id.to_string()));
        }
        insert_after(&mut self.root, sibling_id, element)
            .map_err(|_| DomError::MissingElement(sibling_id.to_string()))
    }

    /// Detach and return the element with the given id.
    ///
    /// Returns `None` when the element does not exist or is the root.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let removed = remove_element(&mut self.root, normalize_id(id));
        if removed.is_none() {
            log::trace!("remove: no element '{}'", id);
        }
        removed
    }

    /// Remove every child of `parent_id`, keeping the first `keep`.
    pub fn truncate_children(&mut self, parent_id: &str, keep: usize) -> Result<(), DomError> {
        let parent = self.require_mut(parent_id)?;
        if let Some(children) = parent.child_elements_mut() {
            children.truncate(keep);
        }
        Ok(())
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|el| el.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> Result<(), DomError> {
        self.require_mut(id)?.value = value.into();
        Ok(())
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<(), DomError> {
        self.require_mut(id)?.hidden = hidden;
        Ok(())
    }

    pub fn is_hidden(&self, id: &str) -> Option<bool> {
        self.get(id).map(|el| el.hidden)
    }

    /// Named fields (inputs, selects, textareas) under `scope_id`, in document order.
    pub fn fields(&self, scope_id: &str) -> Result<Vec<&Element>, DomError> {
        let scope = self.require(scope_id)?;
        Ok(descendants(scope)
            .into_iter()
            .filter(|el| el.is_named_field())
            .collect())
    }

    /// The first named field called `name` under `scope_id`.
    pub fn field_by_name_mut(&mut self, scope_id: &str, name: &str) -> Option<&mut Element> {
        let id = self
            .fields(scope_id)
            .ok()?
            .into_iter()
            .find(|el| el.name.as_deref() == Some(name))
            .map(|el| el.id.clone())?;
        self.get_mut(&id)
    }

    /// Name/value pairs a submit of `form_id` would send, skipping disabled fields.
    pub fn form_data(&self, form_id: &str) -> Result<Vec<(String, String)>, DomError> {
        Ok(self
            .fields(form_id)?
            .into_iter()
            .filter(|el| !el.disabled)
            .filter_map(|el| el.name.clone().map(|name| (name, el.value.clone())))
            .collect())
    }

    /// Options of a select element, as (value, label) pairs.
    pub fn options(&self, select_id: &str) -> Result<Vec<(&str, &str)>, DomError> {
        let select = self.require(select_id)?;
        Ok(select
            .child_elements()
            .iter()
            .filter(|el| el.tag == Tag::Option)
            .map(|el| (el.value.as_str(), el.text().unwrap_or_default()))
            .collect())
    }

    /// Select the first option matching `predicate`, returning its value.
    pub fn select_option_where<F>(&mut self, select_id: &str, predicate: F) -> Option<String>
    where
        F: Fn(&Element) -> bool,
    {
        let select = self.get_mut(select_id)?;
        let value = select
            .child_elements()
            .iter()
            .filter(|el| el.tag == Tag::Option)
            .find(|el| predicate(el))
            .map(|el| el.value.clone())?;
        select.value = value.clone();
        Some(value)
    }
}
