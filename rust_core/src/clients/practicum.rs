//! Yandex Practicum homework status API client
//!
//! Read-only access to `homework_statuses`: one GET with the OAuth token and a
//! `from_date` cursor.

use crate::clients::HomeworkApi;
use crate::error::{BotError, Result};
use crate::formatters::truncate_message;
use crate::models::{HomeworkStatusesResponse, StatusSnapshot};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Longest response body kept inside an auth error
const MAX_ERROR_BODY_LEN: usize = 512;

/// Practicum API client
#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(endpoint: String, token: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("homework-bot/1.0")
            .build()
            .map_err(|e| BotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn fetch_statuses(&self, from_date: i64) -> Result<StatusSnapshot> {
        debug!("Fetching homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| BotError::Network(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(format!("failed to read response body: {e}")))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BotError::Auth {
                status: status.as_u16(),
                body: truncate_message(&body, MAX_ERROR_BODY_LEN),
            });
        }
        if !status.is_success() {
            return Err(BotError::Network(format!(
                "endpoint unavailable: HTTP {status}"
            )));
        }

        let parsed: HomeworkStatusesResponse = serde_json::from_str(&body)
            .map_err(|e| BotError::MalformedResponse(format!("unexpected payload: {e}")))?;

        let snapshot = StatusSnapshot::try_from(parsed)?;
        debug!(
            "Fetched {} homework(s), current_date={}",
            snapshot.homeworks.len(),
            snapshot.current_date
        );
        Ok(snapshot)
    }

    fn api_name(&self) -> &str {
        "practicum"
    }
}
