use thiserror::Error;

/// Top-level error type for the SaltaGet client.
///
/// Subsystem crates define their own error types; this one covers the
/// concerns shared by all of them (configuration files and serialization).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaltagetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SaltagetError {
    fn from(err: toml::de::Error) -> Self {
        SaltagetError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SaltagetError {
    fn from(err: toml::ser::Error) -> Self {
        SaltagetError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SaltagetError {
    fn from(err: serde_json::Error) -> Self {
        SaltagetError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for SaltaGet operations.
pub type Result<T> = std::result::Result<T, SaltagetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SaltagetError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = SaltagetError::Serialization("invalid json".to_string());
        assert_eq!(err.to_string(), "Serialization error: invalid json");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SaltagetError = io_err.into();
        assert!(matches!(err, SaltagetError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let toml_err = toml::from_str::<toml::Value>("[[invalid").unwrap_err();
        let err: SaltagetError = toml_err.into();
        assert!(matches!(err, SaltagetError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: SaltagetError = json_err.into();
        assert!(matches!(err, SaltagetError::Serialization(_)));
    }
}
