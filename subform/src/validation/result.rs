/// A field that failed one of its rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field_name: String,
    /// Id of the marked element. Its message element is `{element_id}-error`.
    pub element_id: String,
    pub message: String,
}

/// Outcome of one validation pass over a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    #[default]
    Valid,
    /// Failed fields, in rule declaration order.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub(crate) fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        match self {
            Self::Valid => Vec::new(),
            Self::Invalid(errors) => errors,
        }
    }
}
