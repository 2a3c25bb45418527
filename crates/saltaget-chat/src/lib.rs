//! Conversation controller for the SaltaGet chat widget.
//!
//! Sequences the chat request and the optional product lookup, keeps a
//! bounded transcript and notifies the renderer of every change.

pub mod client;
pub mod controller;
pub mod error;
pub mod history;
pub mod scroll;
pub mod state;

pub use client::{ChatBackend, HttpChatBackend};
pub use controller::{ChatController, SubmitOutcome};
pub use error::{ApiError, ChatError};
pub use history::ConversationHistory;
pub use scroll::{ScrollScheduler, TranscriptListener};
pub use state::{ExchangePhase, ExchangeStateMachine};
