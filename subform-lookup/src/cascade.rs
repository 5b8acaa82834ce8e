//! Cascading selects.
//!
//! A change on the parent select fetches the options of the child select
//! from the application. Only one request runs per change; there is no retry
//! and a failed load leaves the child as it was.

use std::fmt;
use std::rc::Rc;

use formdom::{Document, Event, EventKind};
use log::{debug, error};

use crate::client::LookupClient;
use crate::error::LookupError;
use crate::loading::{ElementLoader, LoadingIndicator};
use crate::options::{populate_select, OptionItem};

type SuccessCallback = Box<dyn FnMut(&mut Document)>;
type ErrorCallback = Box<dyn FnMut(&LookupError)>;

/// The parent/child pairs the application serves options for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeKind {
    /// Service area -> service categories.
    ServiceCategoriesByArea,
    /// Service category -> services.
    ServicesByCategory,
    /// State -> cities.
    CitiesByState,
}

impl CascadeKind {
    /// Endpoint path relative to the application base URL.
    pub fn path(self, parent_value: &str) -> String {
        match self {
            Self::ServiceCategoriesByArea => format!("serviceAreas/{parent_value}/serviceCategories"),
            Self::ServicesByCategory => format!("serviceCategories/{parent_value}/services"),
            Self::CitiesByState => format!("states/{parent_value}/cities"),
        }
    }

    /// Whether a successful load fires a change on the child, so a further
    /// cascade can follow.
    pub fn retriggers_change(self) -> bool {
        !matches!(self, Self::ServicesByCategory)
    }

    /// Default (parent, child) element ids.
    pub fn default_ids(self) -> (&'static str, &'static str) {
        match self {
            Self::ServiceCategoriesByArea => ("serviceArea", "serviceCategory"),
            Self::ServicesByCategory => ("serviceCategory", "service"),
            Self::CitiesByState => ("state", "city"),
        }
    }
}

/// A parent select bound to a child select.
///
/// # Example
///
/// ```ignore
/// let mut cities = Cascade::new(CascadeKind::CitiesByState)
///     .on_error(|e| log::warn!("cities unavailable: {e}"));
///
/// if let Some(follow_up) = cities.handle(&client, &mut doc, &event).await? {
///     categories.handle(&client, &mut doc, &follow_up).await?;
/// }
/// ```
pub struct Cascade {
    kind: CascadeKind,
    parent: String,
    child: String,
    loader: Rc<dyn LoadingIndicator>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Cascade {
    pub fn new(kind: CascadeKind) -> Self {
        let (parent, child) = kind.default_ids();
        Self {
            kind,
            parent: parent.to_string(),
            child: child.to_string(),
            loader: Rc::new(ElementLoader::default()),
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_parent(mut self, id: impl Into<String>) -> Self {
        self.parent = normalize(id);
        self
    }

    pub fn with_child(mut self, id: impl Into<String>) -> Self {
        self.child = normalize(id);
        self
    }

    pub fn with_loader(mut self, loader: Rc<dyn LoadingIndicator>) -> Self {
        self.loader = loader;
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Document) + 'static,
    {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: FnMut(&LookupError) + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn kind(&self) -> CascadeKind {
        self.kind
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn child(&self) -> &str {
        &self.child
    }

    /// Whether `event` is a change of the parent select.
    pub fn matches(&self, event: &Event) -> bool {
        event.kind == EventKind::Change && event.target == self.parent
    }

    /// Loads the child options when `event` is a change of the parent.
    ///
    /// Returns the follow-up change event of the child, if this cascade
    /// fires one.
    pub async fn handle(
        &mut self,
        client: &LookupClient,
        doc: &mut Document,
        event: &Event,
    ) -> Result<Option<Event>, LookupError> {
        if !self.matches(event) {
            return Ok(None);
        }
        self.load(client, doc).await
    }

    /// Loads the child options for the parent's current value.
    ///
    /// An empty parent value only clears the child back to its placeholder.
    pub async fn load(&mut self, client: &LookupClient, doc: &mut Document) -> Result<Option<Event>, LookupError> {
        let value = match doc.value(&self.parent) {
            Some(value) => value.to_string(),
            None => {
                let err = LookupError::Dom(formdom::DomError::MissingElement(self.parent.clone()));
                return Err(self.fail(doc, err));
            }
        };

        if value.is_empty() {
            debug!("cascade {:?}: '{}' is empty, clearing '{}'", self.kind, self.parent, self.child);
            return self.complete(doc, Ok(Vec::new()));
        }

        self.loader.show(doc);
        let outcome = client.options(self.kind, &value).await;
        self.complete(doc, outcome)
    }

    /// Applies a fetched option list (or its failure) to the child select.
    ///
    /// The loader is hidden on every path.
    pub fn complete(
        &mut self,
        doc: &mut Document,
        outcome: Result<Vec<OptionItem>, LookupError>,
    ) -> Result<Option<Event>, LookupError> {
        let applied = outcome.and_then(|items| {
            populate_select(doc, &self.child, &items)?;
            Ok(items.len())
        });

        match applied {
            Ok(count) => {
                self.loader.hide(doc);
                debug!("cascade {:?}: {} option(s) into '{}'", self.kind, count, self.child);
                if let Some(callback) = self.on_success.as_mut() {
                    callback(doc);
                }
                Ok(self
                    .kind
                    .retriggers_change()
                    .then(|| Event::change(self.child.as_str())))
            }
            Err(err) => Err(self.fail(doc, err)),
        }
    }

    fn fail(&mut self, doc: &mut Document, err: LookupError) -> LookupError {
        self.loader.hide(doc);
        error!("cascade {:?} into '{}' failed: {}", self.kind, self.child, err);
        if let Some(callback) = self.on_error.as_mut() {
            callback(&err);
        }
        err
    }
}

impl fmt::Debug for Cascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cascade")
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("child", &self.child)
            .finish_non_exhaustive()
    }
}

fn normalize(id: impl Into<String>) -> String {
    let id = id.into();
    formdom::normalize_id(&id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            CascadeKind::ServiceCategoriesByArea.path("a1"),
            "serviceAreas/a1/serviceCategories"
        );
        assert_eq!(CascadeKind::ServicesByCategory.path("c1"), "serviceCategories/c1/services");
        assert_eq!(CascadeKind::CitiesByState.path("sp"), "states/sp/cities");
    }

    #[test]
    fn test_retrigger() {
        assert!(CascadeKind::ServiceCategoriesByArea.retriggers_change());
        assert!(!CascadeKind::ServicesByCategory.retriggers_change());
        assert!(CascadeKind::CitiesByState.retriggers_change());
    }
}
