//! Contact form for the SaltaGet site.
//!
//! Validates visitor input and forwards it to the site backend, which sends
//! the notification email.

pub mod client;
pub mod error;
pub mod form;

pub use client::ContactClient;
pub use error::ContactError;
pub use form::{ContactField, ContactForm, FieldError};

/// Notice shown after the backend accepted the message.
pub const SUCCESS_NOTICE: &str = "Mensaje enviado con éxito";

/// Alert shown when the message could not be delivered.
pub const FAILURE_ALERT: &str =
    "Ocurrió un error al enviar el mensaje. Por favor intenta nuevamente.";
