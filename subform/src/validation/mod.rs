//! Sub-form validation.
//!
//! A fluent API for checking named fields of a document scope and reflecting
//! the outcome on the elements themselves.
//!
//! # Example
//!
//! ```ignore
//! use subform::validation::Validator;
//!
//! let validator = Validator::new()
//!     .field("name")
//!         .required("Name is required")
//!         .min_length(3, "Name must be at least 3 characters")
//!     .field("email")
//!         .email("Please enter a valid email")
//!     .finish();
//!
//! if validator.validate(&mut doc, "subForm").is_valid() {
//!     // Proceed with adding the record
//! }
//! ```

mod result;
mod settings;
mod validator;

pub use result::{FieldError, ValidationResult};
pub use settings::ValidationSettings;
pub use validator::{FieldBuilder, Validator};
pub(crate) use validator::clear_marks;
