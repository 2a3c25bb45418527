//! Renderer notifications.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use saltaget_core::types::ConversationEntry;

/// View side of the chat widget.
pub trait TranscriptListener: Send + Sync {
    /// Called with a snapshot after every transcript change.
    fn transcript_changed(&self, entries: &[ConversationEntry]);

    /// Bring the newest entry into view.
    fn scroll_to_latest(&self);
}

/// Fires scroll-to-latest twice per append: immediately, and once more
/// after `delay` so layout that settles late is still followed.
#[derive(Clone)]
pub struct ScrollScheduler {
    listener: Option<Arc<dyn TranscriptListener>>,
    delay: Duration,
    attached: Arc<AtomicBool>,
}

impl ScrollScheduler {
    pub fn new(
        listener: Option<Arc<dyn TranscriptListener>>,
        delay: Duration,
        attached: Arc<AtomicBool>,
    ) -> Self {
        Self {
            listener,
            delay,
            attached,
        }
    }

    /// Push a fresh snapshot to the listener, then schedule the scrolls.
    pub fn publish(&self, entries: &[ConversationEntry]) {
        if let Some(listener) = &self.listener {
            listener.transcript_changed(entries);
        }
        self.schedule();
    }

    /// Scroll now and again after the delay. Outside a tokio runtime only
    /// the immediate scroll happens.
    pub fn schedule(&self) {
        let Some(listener) = self.listener.clone() else {
            return;
        };
        if !self.attached.load(Ordering::Acquire) {
            return;
        }
        listener.scroll_to_latest();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::trace!("No tokio runtime; delayed scroll skipped");
            return;
        };
        let attached = Arc::clone(&self.attached);
        let delay = self.delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if attached.load(Ordering::Acquire) {
                listener.scroll_to_latest();
            } else {
                tracing::trace!("Delayed scroll dropped after detach");
            }
        });
    }
}
