use std::collections::HashMap;

use crate::element::normalize_id;

/// Kinds of user interaction the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    FocusOut,
}

/// A user interaction targeted at one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub target: String,
    pub kind: EventKind,
}

impl Event {
    pub fn new(target: impl Into<String>, kind: EventKind) -> Self {
        let target = target.into();
        Self {
            target: normalize_id(&target).to_string(),
            kind,
        }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Self::new(target, EventKind::Click)
    }

    pub fn change(target: impl Into<String>) -> Self {
        Self::new(target, EventKind::Change)
    }

    pub fn focus_out(target: impl Into<String>) -> Self {
        Self::new(target, EventKind::FocusOut)
    }
}

/// Listener table mapping (element id, event kind) to an action value.
///
/// Owners attach actions programmatically and look them up when an event
/// arrives, so no handler code lives in element attributes.
#[derive(Debug, Clone)]
pub struct Bindings<A> {
    map: HashMap<(String, EventKind), A>,
}

impl<A> Default for Bindings<A> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<A> Bindings<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an action, replacing any previous binding for the same target and kind.
    pub fn bind(&mut self, target: impl Into<String>, kind: EventKind, action: A) {
        let target = target.into();
        self.map
            .insert((normalize_id(&target).to_string(), kind), action);
    }

    /// Remove every binding attached to `target`.
    pub fn unbind(&mut self, target: &str) {
        let target = normalize_id(target);
        self.map.retain(|(id, _), _| id != target);
    }

    pub fn get(&self, event: &Event) -> Option<&A> {
        self.map.get(&(event.target.clone(), event.kind))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
