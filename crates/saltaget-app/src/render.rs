//! Terminal rendering of the chat transcript.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use chrono::{Local, TimeZone};
use uuid::Uuid;

use saltaget_chat::{ChatError, TranscriptListener};
use saltaget_core::types::{ConversationEntry, Product, Role};

const STAR_SLOTS: usize = 5;
const FULL_STAR: char = '★';
const HALF_STAR: char = '⯪';
const EMPTY_STAR: char = '☆';

/// Inline text for a rejected chat message.
pub fn validation_message(err: &ChatError) -> String {
    match err {
        ChatError::EmptyMessage => "El mensaje es requerido".to_string(),
        ChatError::MessageTooLong(max) => format!("Máximo {max} caracteres"),
        other => other.to_string(),
    }
}

/// Rating as shown on a product card.
///
/// Glyph strings pass through, numeric strings become five star slots,
/// anything else is shown raw.
pub fn render_rating(rating: &str) -> String {
    if rating.contains('⭐') {
        return rating.to_string();
    }
    let Ok(value) = rating.trim().parse::<f64>() else {
        return rating.to_string();
    };
    if !value.is_finite() {
        return rating.to_string();
    }

    let full = value.floor().clamp(0.0, STAR_SLOTS as f64) as usize;
    let half = value % 1.0 >= 0.5;
    (0..STAR_SLOTS)
        .map(|i| {
            if i < full {
                FULL_STAR
            } else if i == full && half {
                HALF_STAR
            } else {
                EMPTY_STAR
            }
        })
        .collect()
}

pub fn render_product(product: &Product) -> String {
    let mut line = format!(
        "  • {} | {} | {}",
        product.name,
        product.final_price,
        render_rating(&product.rating_stars)
    );
    if product.has_discount() {
        line.push_str(&format!(" | {}% OFF", product.discount_percentage));
    }
    if !product.is_available {
        line.push_str(" | Sin stock");
    }
    line
}

pub fn render_entry(entry: &ConversationEntry) -> String {
    let time = Local
        .timestamp_opt(entry.created_at, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default();
    match entry.role {
        Role::Pending => "Asistente: escribiendo…".to_string(),
        Role::User => format!("[{time}] Tú: {}", entry.text),
        Role::Assistant => {
            let mut out = format!("[{time}] Asistente: {}", entry.text);
            if let Some(products) = &entry.products {
                for product in products {
                    out.push('\n');
                    out.push_str(&render_product(product));
                }
            }
            out
        }
    }
}

/// Prints entries the first time they appear in a snapshot.
#[derive(Default)]
pub struct TerminalView {
    shown: Mutex<HashSet<Uuid>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines for entries not printed yet, in transcript order.
    fn unseen(&self, entries: &[ConversationEntry]) -> Vec<String> {
        let Ok(mut shown) = self.shown.lock() else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|entry| shown.insert(entry.id))
            .map(render_entry)
            .collect()
    }
}

impl TranscriptListener for TerminalView {
    fn transcript_changed(&self, entries: &[ConversationEntry]) {
        for line in self.unseen(entries) {
            println!("{line}");
        }
    }

    fn scroll_to_latest(&self) {
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!(error = %e, "Failed to flush transcript output");
        }
    }
}
