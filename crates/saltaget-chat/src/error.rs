//! Error types for the chat controller and its backend.

use crate::state::ExchangePhase;

/// HTTP status the chat backend uses when the demo quota is exhausted.
pub const RATE_LIMITED_STATUS: u16 = 429;

/// Failures talking to the chat or product backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the backend rejected the request for rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Status(RATE_LIMITED_STATUS))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Errors returned by the conversation controller.
///
/// Backend failures never show up here; they are turned into fallback
/// replies in the transcript.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("invalid exchange transition: {from} -> {to}")]
    InvalidTransition {
        from: ExchangePhase,
        to: ExchangePhase,
    },
    #[error("controller state lock poisoned: {0}")]
    StatePoisoned(String),
    #[error("HTTP client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        assert_eq!(ApiError::Status(503).to_string(), "backend returned HTTP 503");
        assert_eq!(
            ApiError::Transport("connection refused".into()).to_string(),
            "transport error: connection refused"
        );
        assert_eq!(
            ApiError::Decode("expected value".into()).to_string(),
            "invalid response body: expected value"
        );
    }

    #[test]
    fn test_only_429_is_rate_limited() {
        assert!(ApiError::Status(429).is_rate_limited());
        for status in [400, 404, 428, 430, 500, 502, 503] {
            assert!(!ApiError::Status(status).is_rate_limited(), "{status}");
        }
        assert!(!ApiError::Transport("timed out".into()).is_rate_limited());
        assert!(!ApiError::Decode("eof".into()).is_rate_limited());
    }

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(150).to_string(),
            "message exceeds maximum length of 150 characters"
        );
        let err = ChatError::InvalidTransition {
            from: ExchangePhase::Idle,
            to: ExchangePhase::Settled,
        };
        assert_eq!(err.to_string(), "invalid exchange transition: Idle -> Settled");
        assert_eq!(
            ChatError::StatePoisoned("boom".into()).to_string(),
            "controller state lock poisoned: boom"
        );
    }
}
