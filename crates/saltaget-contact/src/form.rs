//! Contact form fields and validation rules.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use saltaget_core::types::ContactRequest;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("Invalid email regex")
});

/// Input fields of the contact form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FullName,
    Email,
    Cellphone,
    Issue,
    Reason,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::FullName,
        ContactField::Email,
        ContactField::Cellphone,
        ContactField::Issue,
        ContactField::Reason,
    ];

    /// Message shown when the field is left blank.
    pub fn required_message(&self) -> &'static str {
        match self {
            ContactField::FullName => "Por favor ingresa tu nombre completo",
            ContactField::Email => "Por favor ingresa tu correo electrónico",
            ContactField::Cellphone => "Por favor ingresa tu número de teléfono",
            ContactField::Issue => "Por favor ingresa el asunto",
            ContactField::Reason => "Por favor ingresa tu mensaje",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactField::FullName => write!(f, "full_name"),
            ContactField::Email => write!(f, "email"),
            ContactField::Cellphone => write!(f, "cellphone"),
            ContactField::Issue => write!(f, "issue"),
            ContactField::Reason => write!(f, "reason"),
        }
    }
}

/// One failed rule, attached to the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ContactField,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Visitor input as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub cellphone: String,
    pub issue: String,
    pub reason: String,
}

impl ContactForm {
    fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::FullName => &self.full_name,
            ContactField::Email => &self.email,
            ContactField::Cellphone => &self.cellphone,
            ContactField::Issue => &self.issue,
            ContactField::Reason => &self.reason,
        }
    }

    /// Check every field and report all failures at once, in field order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        for field in ContactField::ALL {
            let value = self.value(field).trim();
            if value.is_empty() {
                errors.push(FieldError {
                    field,
                    message: field.required_message(),
                });
            } else if field == ContactField::Email && !EMAIL_PATTERN.is_match(value) {
                errors.push(FieldError {
                    field,
                    message: "Correo electrónico no válido",
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Wire body for the email endpoint.
    pub fn to_request(&self) -> ContactRequest {
        ContactRequest {
            issue: self.issue.trim().to_string(),
            email: self.email.trim().to_string(),
            cellphone: self.cellphone.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            reason: self.reason.trim().to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
