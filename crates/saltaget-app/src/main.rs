//! SaltaGet client binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Run the requested command: interactive chat, one-shot ask, or the
//!    contact form

mod cli;
mod render;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use saltaget_chat::{ChatController, ChatError, HttpChatBackend, SubmitOutcome};
use saltaget_contact::{ContactClient, ContactError, ContactForm, SUCCESS_NOTICE};
use saltaget_core::SaltagetConfig;

use cli::{CliArgs, Command};
use render::TerminalView;

const QUIT_COMMAND: &str = "/salir";

fn build_controller(config: &SaltagetConfig) -> Result<ChatController, ChatError> {
    let backend = HttpChatBackend::from_config(&config.endpoints)?;
    tracing::info!(url = %backend.base_url(), "Chat backend configured");
    Ok(ChatController::with_listener(
        Arc::new(backend),
        config.chat.clone(),
        Arc::new(TerminalView::new()),
    ))
}

/// Submit one message, printing validation problems inline.
async fn submit_line(ctrl: &ChatController, line: &str) -> Result<(), ChatError> {
    match ctrl.submit(line).await {
        Ok(SubmitOutcome::Ignored) => {
            println!("Espera la respuesta anterior.");
            Ok(())
        }
        Ok(outcome) => {
            tracing::debug!(?outcome, "Exchange finished");
            Ok(())
        }
        Err(e @ (ChatError::EmptyMessage | ChatError::MessageTooLong(_))) => {
            eprintln!("{}", render::validation_message(&e));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn run_chat(config: &SaltagetConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctrl = build_controller(config)?;
    println!(
        "Asistente Virtual SaltaGet. Escribe tu consulta (máx. {} caracteres), {} para terminar.",
        config.chat.max_message_chars, QUIT_COMMAND
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }
        submit_line(&ctrl, &line).await?;
    }

    ctrl.detach();
    Ok(())
}

async fn run_ask(config: &SaltagetConfig, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctrl = build_controller(config)?;
    let result = ctrl.submit(message).await;
    ctrl.detach();
    match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Exchange finished");
            Ok(())
        }
        Err(e @ (ChatError::EmptyMessage | ChatError::MessageTooLong(_))) => {
            Err(render::validation_message(&e).into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_contact(
    config: &SaltagetConfig,
    form: ContactForm,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ContactClient::from_config(&config.endpoints)?;
    match client.send(&form).await {
        Ok(payload) => {
            tracing::debug!(%payload, "Contact backend response");
            println!("{SUCCESS_NOTICE}");
            Ok(())
        }
        Err(ContactError::Invalid(errors)) => {
            for err in &errors {
                eprintln!("{err}");
            }
            Err(ContactError::Invalid(errors).into())
        }
        Err(e) => {
            eprintln!("{e}");
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Load errors are reported once tracing is up.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = match SaltagetConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (SaltagetConfig::default(), Some(e)),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    // Tracing. Logs go to stderr so the transcript stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting SaltaGet client v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        None => tracing::debug!(path = %config_file.display(), "Configuration loaded"),
        Some(_) if !config_file.exists() => {
            tracing::debug!(path = %config_file.display(), "No config file; using defaults")
        }
        Some(e) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Failed to load config; using defaults")
        }
    }

    match args.command {
        Command::Chat => run_chat(&config).await,
        Command::Ask { message } => run_ask(&config, &message).await,
        Command::Contact {
            full_name,
            email,
            cellphone,
            issue,
            reason,
        } => {
            let form = ContactForm {
                full_name,
                email,
                cellphone,
                issue,
                reason,
            };
            run_contact(&config, form).await
        }
    }
}
