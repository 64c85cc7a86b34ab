//! Remote API clients.
//!
//! The poll loop only talks to the two traits below so tests can swap in
//! scripted implementations.

use crate::error::Result;
use crate::models::StatusSnapshot;
use async_trait::async_trait;

pub mod practicum;
pub mod telegram;

// Re-export commonly used types
pub use practicum::PracticumClient;
pub use telegram::TelegramClient;

/// Source of homework review statuses
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// Fetch every homework updated since `from_date` (Unix seconds)
    async fn fetch_statuses(&self, from_date: i64) -> Result<StatusSnapshot>;

    /// Client name for logging
    fn api_name(&self) -> &str;
}

/// Outbound chat channel
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a text message to the configured chat
    async fn send_message(&self, text: &str) -> Result<()>;
}
