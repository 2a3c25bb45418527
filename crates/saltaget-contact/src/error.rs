//! Error types for contact form submission.

use crate::form::FieldError;

/// Errors from submitting the contact form.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid contact form: {}", summarize(.0))]
    Invalid(Vec<FieldError>),
    /// The backend could not be reached or rejected the message. The display
    /// text is the alert shown to the visitor; `detail` is for logs.
    #[error("{}", crate::FAILURE_ALERT)]
    Delivery { detail: String },
    #[error("HTTP client error: {0}")]
    Client(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ContactError {
    /// Field errors, if this is a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ContactError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}
