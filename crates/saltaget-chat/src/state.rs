//! Exchange state machine.
//!
//! One submission walks through these phases:
//! - Idle -> SendingChat (message accepted, chat request issued)
//! - SendingChat -> SendingProducts (reply references products)
//! - SendingChat -> Settled (plain reply or failure)
//! - SendingProducts -> Settled (lookup finished either way)
//! - Settled -> Idle (ready for the next submission)

use std::fmt;

use crate::error::ChatError;

/// Where the controller is in the current exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangePhase {
    /// No exchange in flight. Submissions are accepted.
    Idle,
    /// Waiting for the chat backend.
    SendingChat,
    /// Waiting for the product lookup.
    SendingProducts,
    /// Terminal entry committed; about to return to Idle.
    Settled,
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangePhase::Idle => write!(f, "Idle"),
            ExchangePhase::SendingChat => write!(f, "SendingChat"),
            ExchangePhase::SendingProducts => write!(f, "SendingProducts"),
            ExchangePhase::Settled => write!(f, "Settled"),
        }
    }
}

impl ExchangePhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &ExchangePhase) -> bool {
        matches!(
            (self, target),
            (ExchangePhase::Idle, ExchangePhase::SendingChat)
                | (ExchangePhase::SendingChat, ExchangePhase::SendingProducts)
                | (ExchangePhase::SendingChat, ExchangePhase::Settled)
                | (ExchangePhase::SendingProducts, ExchangePhase::Settled)
                | (ExchangePhase::Settled, ExchangePhase::Idle)
        )
    }

    /// Whether a request is in flight.
    pub fn is_sending(&self) -> bool {
        matches!(
            self,
            ExchangePhase::SendingChat | ExchangePhase::SendingProducts
        )
    }
}

/// Validated phase holder owned by the controller state.
#[derive(Debug, Clone)]
pub struct ExchangeStateMachine {
    phase: ExchangePhase,
}

impl Default for ExchangeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeStateMachine {
    /// Create a state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            phase: ExchangePhase::Idle,
        }
    }

    pub fn current(&self) -> ExchangePhase {
        self.phase
    }

    /// Attempt to transition to the target phase.
    pub fn transition(&mut self, target: ExchangePhase) -> Result<(), ChatError> {
        if self.phase.can_transition_to(&target) {
            tracing::debug!("Exchange phase: {} -> {}", self.phase, target);
            self.phase = target;
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.phase,
                to: target,
            })
        }
    }

    /// Force the machine back to Idle (used for error recovery and detach).
    pub fn reset(&mut self) {
        if self.phase != ExchangePhase::Idle {
            tracing::warn!("Exchange state machine reset to Idle from {}", self.phase);
        }
        self.phase = ExchangePhase::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
