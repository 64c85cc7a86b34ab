use homework_bot_core::clients::practicum::DEFAULT_ENDPOINT;
use homework_bot_core::clients::telegram::DEFAULT_API_BASE_URL;
use homework_bot_core::poller::{NewHomeworkPolicy, PollerSettings};
use homework_bot_core::{BotError, Result};
use std::env;
use std::fmt;
use std::time::Duration;

const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,

    pub practicum_endpoint: String,
    pub telegram_api_base_url: String,

    pub retry_period: Duration,
    pub http_timeout: Duration,

    pub notify_new_homeworks: bool,
    pub report_errors_to_chat: bool,
    /// Overrides the first `from_date`; defaults to startup time
    pub initial_from_date: Option<i64>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_base_url", &self.telegram_api_base_url)
            .field("retry_period", &self.retry_period)
            .field("http_timeout", &self.http_timeout)
            .field("notify_new_homeworks", &self.notify_new_homeworks)
            .field("report_errors_to_chat", &self.report_errors_to_chat)
            .field("initial_from_date", &self.initial_from_date)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(BotError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let practicum_token = get("PRACTICUM_TOKEN").unwrap_or_default();
        let telegram_token = get("TELEGRAM_TOKEN").unwrap_or_default();
        let telegram_chat_id = get("TELEGRAM_CHAT_ID").unwrap_or_default();

        let practicum_endpoint =
            get("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let telegram_api_base_url =
            get("TELEGRAM_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let retry_period = Duration::from_secs(parse_positive_secs(
            "RETRY_PERIOD_SECS",
            get("RETRY_PERIOD_SECS"),
            600,
        )?);
        let http_timeout = Duration::from_secs(parse_positive_secs(
            "HTTP_TIMEOUT_SECS",
            get("HTTP_TIMEOUT_SECS"),
            30,
        )?);

        let notify_new_homeworks =
            parse_bool("NOTIFY_NEW_HOMEWORKS", get("NOTIFY_NEW_HOMEWORKS"), true)?;
        let report_errors_to_chat =
            parse_bool("REPORT_ERRORS_TO_CHAT", get("REPORT_ERRORS_TO_CHAT"), true)?;

        let initial_from_date = match get("FROM_DATE") {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                BotError::Config(format!("Invalid FROM_DATE: {raw} (expected Unix seconds)"))
            })?),
            None => None,
        };

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            practicum_endpoint,
            telegram_api_base_url,
            retry_period,
            http_timeout,
            notify_new_homeworks,
            report_errors_to_chat,
            initial_from_date,
        })
    }

    pub fn poller_settings(&self, now: i64) -> PollerSettings {
        PollerSettings {
            new_homework_policy: if self.notify_new_homeworks {
                NewHomeworkPolicy::Notify
            } else {
                NewHomeworkPolicy::Record
            },
            report_errors: self.report_errors_to_chat,
            initial_from_date: self.initial_from_date.unwrap_or(now),
        }
    }
}

fn parse_positive_secs(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(BotError::Config(format!("Invalid {key}: must be greater than zero"))),
        Ok(secs) => Ok(secs),
        Err(_) => Err(BotError::Config(format!(
            "Invalid {key}: {raw} (expected whole seconds)"
        ))),
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        other => Err(BotError::Config(format!(
            "Invalid {key}: {other} (expected true/false)"
        ))),
    }
}
