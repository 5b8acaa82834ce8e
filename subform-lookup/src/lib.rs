//! Asynchronous lookups feeding form fields.
//!
//! - [`cascade`]: a parent select change loads the child select's options
//! - [`postal`]: a postal code fills the address fields
//!
//! Both talk to the network through [`LookupClient`] and report progress
//! through a [`LoadingIndicator`].

pub mod cascade;
pub mod client;
pub mod error;
pub mod loading;
pub mod options;
pub mod postal;

pub use cascade::{Cascade, CascadeKind};
pub use client::{LookupClient, LookupClientBuilder, DEFAULT_POSTAL_BASE_URL};
pub use error::LookupError;
pub use loading::{ElementLoader, LoadingIndicator, NoLoader};
pub use options::{populate_select, OptionItem};
pub use postal::{normalize_zip, AddressAutofill, PostalAddress};
