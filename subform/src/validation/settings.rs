//! Validation presentation settings

/// Default message for required fields.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Este dado é obrigatório";

/// How validation outcomes are reflected on the page.
///
/// # Example
///
/// ```
/// use subform::validation::ValidationSettings;
///
/// let settings = ValidationSettings::default()
///     .with_error_class("is-invalid")
///     .with_valid_class("is-valid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Class added to invalid fields and their message element.
    ///
    /// Default: `state-error`
    pub error_class: String,

    /// Class added to fields that passed.
    ///
    /// Default: `state-success`
    pub valid_class: String,

    /// Message used by `required_default`.
    pub required_message: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            error_class: "state-error".to_string(),
            valid_class: "state-success".to_string(),
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
        }
    }
}

impl ValidationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_class(mut self, class: impl Into<String>) -> Self {
        self.error_class = class.into();
        self
    }

    pub fn with_valid_class(mut self, class: impl Into<String>) -> Self {
        self.valid_class = class.into();
        self
    }

    pub fn with_required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Id of the message element placed after an invalid field.
    pub fn message_id(field_id: &str) -> String {
        format!("{field_id}-error")
    }
}
