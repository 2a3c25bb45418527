//! Shared building blocks for the SaltaGet client crates.
//!
//! Holds the conversation data model, the backend wire types, the TOML
//! configuration and the top-level error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::SaltagetConfig;
pub use error::{Result, SaltagetError};
pub use types::*;
