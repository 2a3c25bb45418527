use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SaltagetError};

/// Fallback reply shown when the chat backend fails for any reason other
/// than rate limiting.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Lo siento, solo soy un demo déjame descansar un poco o contratame para tener tu propio asistente.";

/// Fallback reply shown when the chat backend answers HTTP 429.
pub const DEFAULT_RATE_LIMITED_MESSAGE: &str = "¡Uff! Estoy un poco cansado de tanto trabajar solo me contrataron para la demo. Me voy a descansar un ratito. Intenta preguntarme algo más tarde, ¿vale?";

/// Top-level configuration for the SaltaGet client.
///
/// Loaded from `~/.saltaget/config.toml` by default. Every section falls back
/// to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaltagetConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SaltagetConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SaltagetConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SaltagetError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the client cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.chat_base_url.trim().is_empty() {
            return Err(SaltagetError::Config(
                "endpoints.chat_base_url must not be empty".to_string(),
            ));
        }
        if self.endpoints.site_base_url.trim().is_empty() {
            return Err(SaltagetError::Config(
                "endpoints.site_base_url must not be empty".to_string(),
            ));
        }
        if self.chat.max_message_chars == 0 {
            return Err(SaltagetError::Config(
                "chat.max_message_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Backend base URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Base URL of the chat and product backend.
    pub chat_base_url: String,
    /// Base URL of the site backend that sends contact emails.
    pub site_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            chat_base_url: "http://localhost:8000".to_string(),
            site_base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Chat widget behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum message length in characters.
    pub max_message_chars: usize,
    /// Entries kept from the previous exchange when a new one starts.
    pub retained_entries: usize,
    /// Delay before the second scroll-to-latest request, in milliseconds.
    pub scroll_delay_ms: u64,
    /// Apply the retention window when the product lookup fails.
    pub trim_after_lookup_failure: bool,
    /// Reply shown when the chat backend fails.
    pub fallback_message: String,
    /// Reply shown when the chat backend is rate limited.
    pub rate_limited_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: 150,
            retained_entries: 2,
            scroll_delay_ms: 150,
            trim_after_lookup_failure: false,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            rate_limited_message: DEFAULT_RATE_LIMITED_MESSAGE.to_string(),
        }
    }
}
