//! CLI argument definitions for the SaltaGet client.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use saltaget_core::SaltagetConfig;

/// SaltaGet client: talk to the store assistant demo or send a contact request.
#[derive(Parser, Debug)]
#[command(name = "saltaget", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the chat and product backend.
    #[arg(long = "chat-url")]
    pub chat_url: Option<String>,

    /// Base URL of the site backend (contact emails).
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat session; one message per line, `/salir` to quit.
    Chat,
    /// Send a single message and print the reply.
    Ask {
        /// Message for the assistant (max 150 characters).
        message: String,
    },
    /// Send the contact form.
    Contact {
        #[arg(long = "full-name")]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        cellphone: String,
        /// Subject line.
        #[arg(long)]
        issue: String,
        /// Message body.
        #[arg(long)]
        reason: String,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SALTAGET_CONFIG env var > ~/.saltaget/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SALTAGET_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply URL overrides on top of the loaded configuration.
    ///
    /// Priority: flag > env var (SALTAGET_CHAT_URL, SALTAGET_API_URL) > file.
    pub fn apply_overrides(&self, config: &mut SaltagetConfig) {
        if let Some(url) = pick(
            self.chat_url.clone(),
            std::env::var("SALTAGET_CHAT_URL").ok(),
        ) {
            config.endpoints.chat_base_url = url;
        }
        if let Some(url) = pick(self.api_url.clone(), std::env::var("SALTAGET_API_URL").ok()) {
            config.endpoints.site_base_url = url;
        }
        if let Some(level) = self.log_level.clone() {
            config.general.log_level = level;
        }
    }
}

/// First non-blank value, flag before env.
fn pick(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.into_iter()
        .chain(env)
        .find(|value| !value.trim().is_empty())
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".saltaget").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".saltaget").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let args = CliArgs::parse_from(["saltaget", "ask", "¿Tienen notebooks?"]);
        assert_eq!(
            args.command,
            Command::Ask {
                message: "¿Tienen notebooks?".to_string()
            }
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_global_flags() {
        let args = CliArgs::parse_from([
            "saltaget",
            "--chat-url",
            "https://chat.test",
            "-l",
            "debug",
            "chat",
        ]);
        assert_eq!(args.chat_url.as_deref(), Some("https://chat.test"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.command, Command::Chat);
    }

    #[test]
    fn test_parse_contact() {
        let args = CliArgs::parse_from([
            "saltaget",
            "contact",
            "--full-name",
            "Ana",
            "--email",
            "ana@example.com",
            "--cellphone",
            "123",
            "--issue",
            "Web",
            "--reason",
            "Hola",
        ]);
        match args.command {
            Command::Contact {
                full_name, email, ..
            } => {
                assert_eq!(full_name, "Ana");
                assert_eq!(email, "ana@example.com");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["saltaget", "-c", "/tmp/custom.toml", "chat"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_pick_prefers_flag_then_env() {
        assert_eq!(
            pick(Some("flag".into()), Some("env".into())),
            Some("flag".to_string())
        );
        assert_eq!(pick(None, Some("env".into())), Some("env".to_string()));
        assert_eq!(pick(Some("  ".into()), Some("env".into())), Some("env".to_string()));
        assert_eq!(pick(None, None), None);
    }

    #[test]
    fn test_flag_overrides_config() {
        let args = CliArgs::parse_from([
            "saltaget",
            "--chat-url",
            "https://chat.test",
            "--api-url",
            "https://api.test",
            "--log-level",
            "warn",
            "chat",
        ]);
        let mut config = SaltagetConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.endpoints.chat_base_url, "https://chat.test");
        assert_eq!(config.endpoints.site_base_url, "https://api.test");
        assert_eq!(config.general.log_level, "warn");
    }
}
