//! Homework Bot Core - review status polling and change notification.
//!
//! This module provides:
//! - Error taxonomy shared by the clients and the poll loop
//! - Homework status models and the review API wire format
//! - Practicum homework API client and Telegram Bot API client
//! - Message formatting for status changes and malfunction reports
//! - In-memory status map with a pure change detector
//! - Poll loop driven by an injectable ticker

pub mod clients;
pub mod error;
pub mod formatters;
pub mod models;
pub mod poller;

pub use error::{BotError, Result};
pub use models::{Homework, HomeworkStatus, StatusChange, StatusSnapshot};
pub use poller::{NewHomeworkPolicy, Poller, PollerSettings, TickReport};
