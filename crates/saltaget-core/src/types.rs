use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Author of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text typed by the visitor.
    User,
    /// Reply from the assistant, including synthetic fallback replies.
    Assistant,
    /// Placeholder shown while an exchange is in flight.
    Pending,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Pending => write!(f, "pending"),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Entity name the chat backend uses when a reply references products.
pub const PRODUCT_MODEL: &str = "Product";

/// A store product as returned by the product lookup endpoint.
///
/// Never constructed client-side outside of tests; the backend is the
/// source of truth for every field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Price already formatted as currency text.
    pub final_price: String,
    pub is_available: bool,
    /// Discount in percent; 0 means no discount.
    pub discount_percentage: f64,
    /// Either a pre-rendered glyph string or a numeric string.
    pub rating_stars: String,
}

impl Product {
    /// Whether the product carries a discount badge.
    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0.0
    }
}

// =============================================================================
// Transcript
// =============================================================================

/// One entry of the visible conversation transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Stable identifier for renderers; not used by the controller.
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// Products attached to an assistant reply, if the lookup succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    /// Epoch seconds (UTC) at which the entry was appended.
    pub created_at: i64,
}

impl ConversationEntry {
    fn new(role: Role, text: String, products: Option<Vec<Product>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            products,
            created_at: Utc::now().timestamp(),
        }
    }

    /// Entry for text submitted by the visitor.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), None)
    }

    /// Placeholder for an exchange that has not resolved yet.
    pub fn pending() -> Self {
        Self::new(Role::Pending, String::new(), None)
    }

    /// Plain assistant reply.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text.into(), None)
    }

    /// Assistant reply with resolved products attached.
    pub fn assistant_with_products(text: impl Into<String>, products: Vec<Product>) -> Self {
        Self::new(Role::Assistant, text.into(), Some(products))
    }

    pub fn is_pending(&self) -> bool {
        self.role == Role::Pending
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Body of `POST /api/chat/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Structured hint telling the client which records to resolve next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrontEndData {
    pub model: String,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Response of `POST /api/chat/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_end_data: Option<FrontEndData>,
}

impl ChatReply {
    /// Product ids to look up, if the reply references a non-empty set of
    /// products.
    pub fn product_ids(&self) -> Option<&[i64]> {
        self.front_end_data
            .as_ref()
            .filter(|data| data.model == PRODUCT_MODEL && !data.ids.is_empty())
            .map(|data| data.ids.as_slice())
    }
}

/// Body of `POST /api/products/by-ids/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductsRequest {
    pub ids: Vec<i64>,
}

/// Response of `POST /api/products/by-ids/`.
///
/// `products` may hold fewer records than were requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub count: usize,
}

/// Body of `POST /email/send_email`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub issue: String,
    pub email: String,
    pub cellphone: String,
    pub full_name: String,
    pub reason: String,
}

// =============================================================================
// Tests
// =============================================================================
