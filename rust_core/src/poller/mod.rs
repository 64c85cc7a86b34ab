//! Poll loop: fetch statuses, diff against the status map, notify each change,
//! update the map, wait for the next tick.
//!
//! Every failure inside a tick is logged and swallowed. A failed fetch leaves
//! the status map and the cursor untouched; a failed notification still
//! advances the map so the same transition is never re-sent.

pub mod state;
pub mod ticker;

pub use state::{diff, NewHomeworkPolicy, StatusMap};
pub use ticker::{IntervalTicker, Ticker};

use crate::clients::{HomeworkApi, Messenger};
use crate::error::{BotError, Result};
use crate::formatters;
use crate::models::{StatusChange, StatusSnapshot};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub new_homework_policy: NewHomeworkPolicy,
    /// Send fetch failures to the chat (deduplicated)
    pub report_errors: bool,
    /// Cursor for the first fetch, Unix seconds
    pub initial_from_date: i64,
}

/// Running counters since startup
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub fetch_errors: u64,
    pub changes: u64,
    pub sent: u64,
    pub send_errors: u64,
}

/// Outcome of one tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub fetched: usize,
    pub changes: usize,
    pub delivered: usize,
    pub delivery_failures: usize,
    pub fetch_error: Option<BotError>,
    /// A malfunction message reached the chat this tick
    pub error_reported: bool,
}

pub struct Poller {
    api: Arc<dyn HomeworkApi>,
    messenger: Arc<dyn Messenger>,
    settings: PollerSettings,
    statuses: StatusMap,
    from_date: i64,
    last_reported_error: Option<String>,
    stats: PollStats,
}

impl Poller {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        messenger: Arc<dyn Messenger>,
        settings: PollerSettings,
    ) -> Self {
        let from_date = settings.initial_from_date;
        Self {
            api,
            messenger,
            settings,
            statuses: StatusMap::new(),
            from_date,
            last_reported_error: None,
            stats: PollStats::default(),
        }
    }

    /// Start from a known status map instead of an empty one
    pub fn with_statuses(mut self, statuses: StatusMap) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    pub fn from_date(&self) -> i64 {
        self.from_date
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    pub async fn fetch_statuses(&self) -> Result<StatusSnapshot> {
        self.api.fetch_statuses(self.from_date).await
    }

    pub async fn notify(&self, change: &StatusChange) -> Result<()> {
        let message = formatters::format_status_change(change);
        self.messenger.send_message(&message).await
    }

    /// One poll cycle. Never fails; problems are in the report and the logs.
    pub async fn tick(&mut self) -> TickReport {
        self.stats.ticks += 1;
        let mut report = TickReport::default();

        let snapshot = match self.fetch_statuses().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.fetch_errors += 1;
                error!("Status fetch failed ({}): {}", e.kind(), e);
                report.error_reported = self.report_error(&e).await;
                report.fetch_error = Some(e);
                return report;
            }
        };
        self.last_reported_error = None;
        report.fetched = snapshot.homeworks.len();

        if snapshot.homeworks.is_empty() {
            debug!("No new statuses since {}", self.from_date);
        }

        let changes = diff(
            &self.statuses,
            &snapshot.homeworks,
            self.settings.new_homework_policy,
        );
        report.changes = changes.len();

        for change in &changes {
            match self.notify(change).await {
                Ok(()) => {
                    report.delivered += 1;
                    info!(
                        "Notified status change: id={} name={} {} -> {} reviewed_at={}",
                        change.homework.id,
                        change.homework.name,
                        change
                            .previous
                            .map(|s| s.as_str())
                            .unwrap_or("(new)"),
                        change.homework.status,
                        change
                            .homework
                            .reviewed_at
                            .map(|t| t.to_rfc3339())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
                Err(e) => {
                    report.delivery_failures += 1;
                    error!(
                        "Failed to notify status change for {}: {}",
                        change.homework.id, e
                    );
                }
            }
            // Record right away so an abandoned tick cannot re-send this change.
            self.statuses
                .insert(change.homework.id.clone(), change.homework.status);
        }

        self.statuses.apply(&snapshot.homeworks);
        self.from_date = snapshot.current_date;

        self.stats.changes += report.changes as u64;
        self.stats.sent += report.delivered as u64;
        self.stats.send_errors += report.delivery_failures as u64;

        info!(
            "Tick complete: fetched={} changes={} delivered={} failed={} tracked={} next_from_date={}",
            report.fetched,
            report.changes,
            report.delivered,
            report.delivery_failures,
            self.statuses.len(),
            self.from_date
        );

        report
    }

    /// Send a malfunction message unless the same error was the last one reported
    async fn report_error(&mut self, err: &BotError) -> bool {
        if !self.settings.report_errors {
            return false;
        }

        let text = err.to_string();
        if self.last_reported_error.as_deref() == Some(text.as_str()) {
            debug!("Same error already reported to chat, skipping");
            return false;
        }
        self.last_reported_error = Some(text);

        match self
            .messenger
            .send_message(&formatters::format_malfunction(err))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to report malfunction to chat: {}", e);
                false
            }
        }
    }

    /// Tick until `shutdown` completes. An in-flight tick is dropped.
    pub async fn run_until<T, F>(&mut self, ticker: &mut T, shutdown: F)
    where
        T: Ticker,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            "Poll loop started: api={} from_date={} policy={:?}",
            self.api.api_name(),
            self.from_date,
            self.settings.new_homework_policy
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.tick() => {}
            }
        }

        info!(
            "Poll loop stopped: ticks={} fetch_errors={} sent={} send_errors={}",
            self.stats.ticks, self.stats.fetch_errors, self.stats.sent, self.stats.send_errors
        );
    }

    pub async fn run_forever<T: Ticker>(&mut self, ticker: &mut T) {
        self.run_until(ticker, std::future::pending()).await
    }
}
