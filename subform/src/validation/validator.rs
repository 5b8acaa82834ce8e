//! Validator builder for fluent validation API.

use std::fmt;

use email_address::EmailAddress;
use formdom::{Document, Element};
use regex::Regex;

use super::result::{FieldError, ValidationResult};
use super::settings::ValidationSettings;

/// Type alias for validation rule closures.
type Rule = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Internal representation of a field being validated.
struct FieldEntry {
    name: String,
    rules: Vec<Rule>,
}

/// Validates named fields inside a document scope.
///
/// Invalid fields get the error class, an `error` data attribute and a
/// message element right after them. Valid fields get the valid class.
pub struct Validator {
    fields: Vec<FieldEntry>,
    settings: ValidationSettings,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self::with_settings(ValidationSettings::default())
    }

    pub fn with_settings(settings: ValidationSettings) -> Self {
        Self {
            fields: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Add a field to validate.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            validator: self,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Run all rules against the fields under `scope_id`.
    ///
    /// Fields missing from the scope are skipped.
    pub fn validate(&self, doc: &mut Document, scope_id: &str) -> ValidationResult {
        let mut errors = Vec::new();

        for field in &self.fields {
            let Some(element) = doc.field_by_name_mut(scope_id, &field.name) else {
                log::warn!("validation: field '{}' not found in '{}'", field.name, scope_id);
                continue;
            };
            let element_id = element.id.clone();
            let value = element.value.clone();

            let first_error = field.rules.iter().find_map(|rule| rule(&value).err());
            match first_error {
                Some(message) => {
                    self.mark_invalid(doc, &element_id, &message);
                    errors.push(FieldError {
                        field_name: field.name.clone(),
                        element_id,
                        message,
                    });
                }
                None => self.mark_valid(doc, &element_id),
            }
        }

        ValidationResult::from_errors(errors)
    }

    /// Remove every validation mark from the fields under `scope_id`.
    pub fn clear(&self, doc: &mut Document, scope_id: &str) {
        clear_marks(doc, scope_id, &self.settings);
    }

    fn mark_invalid(&self, doc: &mut Document, element_id: &str, message: &str) {
        let message_id = ValidationSettings::message_id(element_id);
        doc.remove(&message_id);

        if let Some(element) = doc.get_mut(element_id) {
            element.remove_class(&self.settings.valid_class);
            element.add_class(self.settings.error_class.as_str());
            element.set_data("error", message);
        }

        let note = Element::span(message)
            .id(message_id)
            .class(self.settings.error_class.as_str());
        if let Err(e) = doc.insert_after(element_id, note) {
            log::warn!("validation: cannot place message for '{}': {}", element_id, e);
        }
    }

    fn mark_valid(&self, doc: &mut Document, element_id: &str) {
        doc.remove(&ValidationSettings::message_id(element_id));
        if let Some(element) = doc.get_mut(element_id) {
            element.remove_class(&self.settings.error_class);
            element.remove_data("error");
            element.add_class(self.settings.valid_class.as_str());
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field(
                "fields",
                &self.fields.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings)
            .finish()
    }
}

/// Strip validation classes, error data and message elements under `scope_id`.
pub(crate) fn clear_marks(doc: &mut Document, scope_id: &str, settings: &ValidationSettings) {
    let ids: Vec<String> = match doc.fields(scope_id) {
        Ok(fields) => fields.into_iter().map(|el| el.id.clone()).collect(),
        Err(_) => return,
    };

    for id in ids {
        doc.remove(&ValidationSettings::message_id(&id));
        if let Some(element) = doc.get_mut(&id) {
            element.remove_class(&settings.error_class);
            element.remove_class(&settings.valid_class);
            element.remove_data("error");
        }
    }
}

/// Builder for adding validation rules to a single field.
///
/// Rules other than `required` pass on empty values.
pub struct FieldBuilder {
    validator: Validator,
    name: String,
    rules: Vec<Rule>,
}

impl FieldBuilder {
    /// Add a custom validation rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Add a rule that is skipped for empty values.
    fn optional_rule<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rule(move |v| v.is_empty() || f(v), msg)
    }

    /// The field must not be blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// The field must not be blank; uses the settings' default message.
    pub fn required_default(self) -> Self {
        let msg = self.validator.settings.required_message.clone();
        self.required(msg)
    }

    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.optional_rule(move |v| v.chars().count() >= min, msg)
    }

    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    pub fn email(self, msg: impl Into<String>) -> Self {
        self.optional_rule(EmailAddress::is_valid, msg)
    }

    pub fn pattern(self, regex: Regex, msg: impl Into<String>) -> Self {
        self.optional_rule(move |v| regex.is_match(v), msg)
    }

    /// Continue to the next field.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        self.finish().field(name)
    }

    /// Finalize and run all validations.
    pub fn validate(self, doc: &mut Document, scope_id: &str) -> ValidationResult {
        self.finish().validate(doc, scope_id)
    }

    /// Finalize this field and return the validator.
    pub fn finish(self) -> Validator {
        let mut validator = self.validator;
        validator.fields.push(FieldEntry {
            name: self.name,
            rules: self.rules,
        });
        validator
    }
}
