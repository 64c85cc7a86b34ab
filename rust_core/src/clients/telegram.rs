//! Telegram Bot API client (send-only)

use crate::clients::Messenger;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(base_url: String, token: String, chat_id: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token,
            chat_id,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<()> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        // The URL embeds the bot token, so transport errors are reported without it.
        let resp = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Delivery(format!("Telegram request failed: {}", e.without_url())))?;

        let status = resp.status();
        let text_body = resp.text().await.map_err(|e| {
            BotError::Delivery(format!(
                "failed to read Telegram response (HTTP {status}): {}",
                e.without_url()
            ))
        })?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&text_body).ok();

        match parsed {
            Some(api) if api.ok && status.is_success() => {
                debug!("Telegram message delivered to chat {}", self.chat_id);
                Ok(())
            }
            Some(api) => Err(BotError::Delivery(format!(
                "Telegram API rejected message (HTTP {status}): {}",
                api.description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(BotError::Delivery(format!(
                "Telegram API non-JSON response (HTTP {status}): {text_body}"
            ))),
        }
    }
}
