mod config;

use anyhow::{Context, Result};
use chrono::Utc;
use config::Config;
use dotenv::dotenv;
use homework_bot_core::clients::{PracticumClient, TelegramClient};
use homework_bot_core::poller::{IntervalTicker, Poller};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting homework status bot...");

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Bot stopped: startup configuration is incomplete");
        }
    };
    info!(
        "Config: chat={} retry_period={}s timeout={}s notify_new={} report_errors={}",
        cfg.telegram_chat_id,
        cfg.retry_period.as_secs(),
        cfg.http_timeout.as_secs(),
        cfg.notify_new_homeworks,
        cfg.report_errors_to_chat,
    );

    let api = PracticumClient::new(
        cfg.practicum_endpoint.clone(),
        cfg.practicum_token.clone(),
        cfg.http_timeout,
    )
    .context("Failed to create Practicum client")?;

    let telegram = TelegramClient::new(
        cfg.telegram_api_base_url.clone(),
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id.clone(),
        cfg.http_timeout,
    )
    .context("Failed to create Telegram client")?;

    let mut poller = Poller::new(
        Arc::new(api),
        Arc::new(telegram),
        cfg.poller_settings(Utc::now().timestamp()),
    );
    let mut ticker = IntervalTicker::new(cfg.retry_period);

    poller.run_until(&mut ticker, shutdown_signal()).await;

    info!("Homework status bot stopped");
    Ok(())
}

/// Completes on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
