//! A small document tree for form-driven pages.
//!
//! Elements carry an id, a tag, form state (name, value, visibility) and
//! free-form data attributes. A [`Document`] owns the root element and offers
//! id-based lookup and mutation.

pub mod document;
pub mod element;
pub mod error;
pub mod event;

pub use document::Document;
pub use element::{normalize_id, Content, Element, InputKind, Tag};
pub use error::DomError;
pub use event::{Bindings, Event, EventKind};
