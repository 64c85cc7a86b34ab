//! Error taxonomy for the bot.
//!
//! `Config` is fatal at startup. `Network`, `Auth` and `MalformedResponse` are
//! per-tick fetch failures. `Delivery` covers a failed chat message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Missing or invalid startup configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Connectivity failure, timeout, or an unavailable endpoint
    #[error("network error: {0}")]
    Network(String),

    /// Credential rejected by the remote API
    #[error("authentication rejected (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// Payload could not be turned into status records
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Message could not be sent to the chat
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl BotError {
    /// Short stable name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::Config(_) => "config",
            BotError::Network(_) => "network",
            BotError::Auth { .. } => "auth",
            BotError::MalformedResponse(_) => "malformed_response",
            BotError::Delivery(_) => "delivery",
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::Auth {
            status: 401,
            body: "invalid token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "authentication rejected (HTTP 401): invalid token"
        );
        assert_eq!(err.kind(), "auth");
    }
}
