//! Loading indicators shown while a lookup is in flight.

use formdom::Document;

/// Something shown while a request runs and hidden once it settles.
pub trait LoadingIndicator {
    fn show(&self, doc: &mut Document);
    fn hide(&self, doc: &mut Document);
}

/// Toggles the `hidden` flag of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementLoader {
    id: String,
}

impl ElementLoader {
    /// Default element id of the page-wide loading alert.
    pub const DEFAULT_ID: &'static str = "loadingAlert";

    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            id: formdom::normalize_id(&id).to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn set(&self, doc: &mut Document, hidden: bool) {
        if let Err(e) = doc.set_hidden(&self.id, hidden) {
            log::debug!("loader: {}", e);
        }
    }
}

impl Default for ElementLoader {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ID)
    }
}

impl LoadingIndicator for ElementLoader {
    fn show(&self, doc: &mut Document) {
        self.set(doc, false);
    }

    fn hide(&self, doc: &mut Document) {
        self.set(doc, true);
    }
}

/// Shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl LoadingIndicator for NoLoader {
    fn show(&self, _doc: &mut Document) {}

    fn hide(&self, _doc: &mut Document) {}
}
