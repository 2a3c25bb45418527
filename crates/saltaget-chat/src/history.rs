//! Bounded conversation transcript.
//!
//! Older context is dropped on purpose: when a new exchange starts only the
//! most recent entries survive, so the transcript never grows unbounded.

use saltaget_core::types::ConversationEntry;

/// Ordered transcript, oldest entry first.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    entries: Vec<ConversationEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    /// Drop everything except the last `keep` entries.
    pub fn retain_recent(&mut self, keep: usize) {
        if self.entries.len() > keep {
            let excess = self.entries.len() - keep;
            self.entries.drain(..excess);
        }
    }

    /// Remove every pending placeholder. Returns how many were removed.
    pub fn remove_pending(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_pending());
        before - self.entries.len()
    }

    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(ConversationEntry::is_pending)
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
