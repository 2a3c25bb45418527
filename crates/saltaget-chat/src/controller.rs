//! Conversation controller: sequences the chat request, the optional product
//! lookup and the transcript updates for one widget instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use saltaget_core::config::ChatConfig;
use saltaget_core::types::{ChatReply, ChatRequest, ConversationEntry, Product};

use crate::client::ChatBackend;
use crate::error::{ApiError, ChatError};
use crate::history::ConversationHistory;
use crate::scroll::{ScrollScheduler, TranscriptListener};
use crate::state::{ExchangePhase, ExchangeStateMachine};

/// How a call to [`ChatController::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Plain assistant reply appended.
    Answered,
    /// Reply appended together with `count` looked-up products.
    AnsweredWithProducts { count: usize },
    /// Reply referenced products but the lookup failed; text only.
    ProductsUnavailable,
    /// Chat request failed; a fallback reply was appended.
    Fallback { rate_limited: bool },
    /// Another exchange was in flight; nothing happened.
    Ignored,
    /// The controller was detached before the exchange resolved.
    Discarded,
}

struct ControllerState {
    history: ConversationHistory,
    machine: ExchangeStateMachine,
}

/// Terminal entry for one exchange plus whether the retention window applies.
struct Settlement {
    entry: ConversationEntry,
    trim: bool,
    outcome: SubmitOutcome,
}

/// Rolls back an accepted exchange that never settled, such as when the
/// `submit` future is dropped at an await point.
struct ExchangeGuard {
    state: Arc<Mutex<ControllerState>>,
    attached: Arc<AtomicBool>,
    scroll: ScrollScheduler,
    armed: bool,
}

impl ExchangeGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ExchangeGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let attached = self.attached.load(Ordering::Acquire);
        let snapshot = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.machine.reset();
            if !attached {
                return;
            }
            state.history.remove_pending();
            state.history.entries().to_vec()
        };
        tracing::debug!("Unsettled exchange rolled back");
        self.scroll.publish(&snapshot);
    }
}

/// Owns the transcript of one chat widget.
///
/// Cloning yields another handle to the same conversation. Only one
/// exchange runs at a time; the state lock is never held across an await.
#[derive(Clone)]
pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    state: Arc<Mutex<ControllerState>>,
    scroll: ScrollScheduler,
    attached: Arc<AtomicBool>,
    config: ChatConfig,
}

impl ChatController {
    /// Create a controller without a renderer.
    pub fn new(backend: Arc<dyn ChatBackend>, config: ChatConfig) -> Self {
        Self::build(backend, config, None)
    }

    /// Create a controller that reports transcript changes to `listener`.
    pub fn with_listener(
        backend: Arc<dyn ChatBackend>,
        config: ChatConfig,
        listener: Arc<dyn TranscriptListener>,
    ) -> Self {
        Self::build(backend, config, Some(listener))
    }

    fn build(
        backend: Arc<dyn ChatBackend>,
        config: ChatConfig,
        listener: Option<Arc<dyn TranscriptListener>>,
    ) -> Self {
        let attached = Arc::new(AtomicBool::new(true));
        let scroll = ScrollScheduler::new(
            listener,
            Duration::from_millis(config.scroll_delay_ms),
            Arc::clone(&attached),
        );
        Self {
            backend,
            state: Arc::new(Mutex::new(ControllerState {
                history: ConversationHistory::new(),
                machine: ExchangeStateMachine::new(),
            })),
            scroll,
            attached,
            config,
        }
    }

    /// Check a message against the input rules without sending it.
    pub fn validate(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.config.max_message_chars {
            return Err(ChatError::MessageTooLong(self.config.max_message_chars));
        }
        Ok(())
    }

    /// Run one exchange for `text`.
    ///
    /// Validation failures return an error before anything is appended or
    /// sent. Backend failures never error: they end as a fallback reply.
    /// Dropping the future mid-flight removes the pending entry and returns
    /// the controller to Idle.
    ///
    /// Must be polled inside a tokio runtime for the delayed scroll to fire.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, ChatError> {
        self.validate(text)?;
        if !self.is_attached() {
            return Ok(SubmitOutcome::Discarded);
        }

        let snapshot = {
            let mut state = self.lock()?;
            if state.machine.current() != ExchangePhase::Idle {
                tracing::debug!(phase = %state.machine.current(), "Submission ignored while exchange in flight");
                return Ok(SubmitOutcome::Ignored);
            }
            state.machine.transition(ExchangePhase::SendingChat)?;
            state.history.retain_recent(self.config.retained_entries);
            state.history.push(ConversationEntry::user(text));
            state.history.push(ConversationEntry::pending());
            state.history.entries().to_vec()
        };
        let mut guard = ExchangeGuard {
            state: Arc::clone(&self.state),
            attached: Arc::clone(&self.attached),
            scroll: self.scroll.clone(),
            armed: true,
        };
        self.scroll.publish(&snapshot);

        tracing::info!(chars = text.chars().count(), "Sending chat message");
        let request = ChatRequest {
            message: text.to_string(),
        };
        let settlement = match self.backend.send_message(&request).await {
            Ok(reply) if reply.success => self.resolve_reply(reply).await?,
            Ok(_) => {
                tracing::warn!("Chat backend reported success=false");
                self.fallback(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.fallback(e.is_rate_limited())
            }
        };

        let outcome = self.settle(settlement)?;
        guard.disarm();
        Ok(outcome)
    }

    /// Snapshot of the transcript, oldest entry first.
    pub fn transcript(&self) -> Vec<ConversationEntry> {
        match self.state.lock() {
            Ok(state) => state.history.entries().to_vec(),
            Err(e) => {
                tracing::error!("Controller state lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    pub fn phase(&self) -> ExchangePhase {
        self.state
            .lock()
            .map(|state| state.machine.current())
            .unwrap_or(ExchangePhase::Idle)
    }

    /// Whether a submission would currently be accepted.
    pub fn is_busy(&self) -> bool {
        self.phase().is_sending()
    }

    /// Unmount the widget. Results that arrive later are dropped.
    pub fn detach(&self) {
        if self.attached.swap(false, Ordering::AcqRel) {
            tracing::debug!("Chat controller detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    // -- Private helpers --

    fn lock(&self) -> Result<MutexGuard<'_, ControllerState>, ChatError> {
        self.state
            .lock()
            .map_err(|e| ChatError::StatePoisoned(e.to_string()))
    }

    async fn resolve_reply(&self, reply: ChatReply) -> Result<Settlement, ChatError> {
        let Some(ids) = reply.product_ids().map(<[i64]>::to_vec) else {
            return Ok(Settlement {
                entry: ConversationEntry::assistant(reply.response),
                trim: true,
                outcome: SubmitOutcome::Answered,
            });
        };

        if !self.is_attached() {
            // Skip the lookup entirely; settle() will discard.
            return Ok(self.fallback(false));
        }
        self.lock()?
            .machine
            .transition(ExchangePhase::SendingProducts)?;

        tracing::info!(count = ids.len(), "Looking up referenced products");
        match self.backend.products_by_ids(&ids).await {
            Ok(found) => Ok(self.with_products(reply.response, found.products)),
            Err(e) => Ok(self.without_products(reply.response, &e)),
        }
    }

    fn with_products(&self, text: String, products: Vec<Product>) -> Settlement {
        let count = products.len();
        Settlement {
            entry: ConversationEntry::assistant_with_products(text, products),
            trim: true,
            outcome: SubmitOutcome::AnsweredWithProducts { count },
        }
    }

    fn without_products(&self, text: String, err: &ApiError) -> Settlement {
        tracing::warn!(error = %err, "Product lookup failed; showing reply without products");
        Settlement {
            entry: ConversationEntry::assistant(text),
            // The retention window is not applied on this branch unless
            // configured; the transcript may hold one extra exchange.
            trim: self.config.trim_after_lookup_failure,
            outcome: SubmitOutcome::ProductsUnavailable,
        }
    }

    fn fallback(&self, rate_limited: bool) -> Settlement {
        let text = if rate_limited {
            &self.config.rate_limited_message
        } else {
            &self.config.fallback_message
        };
        Settlement {
            entry: ConversationEntry::assistant(text.clone()),
            trim: false,
            outcome: SubmitOutcome::Fallback { rate_limited },
        }
    }

    /// Commit the terminal entry and return to Idle.
    fn settle(&self, settlement: Settlement) -> Result<SubmitOutcome, ChatError> {
        let snapshot = {
            let mut state = self.lock()?;
            if !self.is_attached() {
                state.machine.reset();
                tracing::debug!("Exchange resolved after detach; result discarded");
                return Ok(SubmitOutcome::Discarded);
            }

            state.history.remove_pending();
            if settlement.trim {
                state.history.retain_recent(self.config.retained_entries);
            }
            state.history.push(settlement.entry);

            if let Err(e) = state.machine.transition(ExchangePhase::Settled) {
                state.machine.reset();
                return Err(e);
            }
            state.machine.transition(ExchangePhase::Idle)?;
            state.history.entries().to_vec()
        };
        self.scroll.publish(&snapshot);

        tracing::debug!(outcome = ?settlement.outcome, entries = snapshot.len(), "Exchange settled");
        Ok(settlement.outcome)
    }
}

// =============================================================================
// Tests
// =============================================================================
