//! Shared models for the homework bot

use crate::error::BotError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Review Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Reviewing,
    Approved,
    Rejected,
}

impl HomeworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Reviewing => "The work has been taken for review by the reviewer.",
            HomeworkStatus::Approved => {
                "The work has been reviewed: the reviewer liked everything. Hooray!"
            }
            HomeworkStatus::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "approved" => Ok(HomeworkStatus::Approved),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(BotError::MalformedResponse(format!(
                "unknown homework status: {other}"
            ))),
        }
    }
}

// ============================================================================
// Homework Records
// ============================================================================

/// One assignment as seen in a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    /// Assignment identifier used as the status map key
    pub id: String,
    pub name: String,
    pub status: HomeworkStatus,
    pub reviewer_comment: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Homework {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: HomeworkStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            reviewer_comment: None,
            reviewed_at: None,
        }
    }
}

/// Result of a successful fetch: the records plus the server-side cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub homeworks: Vec<Homework>,
    /// Unix seconds reported by the API; next `from_date`
    pub current_date: i64,
}

/// A detected status transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub homework: Homework,
    /// None when the assignment had not been seen before
    pub previous: Option<HomeworkStatus>,
}

impl StatusChange {
    pub fn is_first_sighting(&self) -> bool {
        self.previous.is_none()
    }
}

// ============================================================================
// Practicum API Wire Format
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct HomeworkStatusesResponse {
    pub homeworks: Vec<HomeworkPayload>,
    pub current_date: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HomeworkPayload {
    #[serde(default)]
    pub id: Option<i64>,
    pub homework_name: String,
    pub status: String,
    #[serde(default)]
    pub reviewer_comment: Option<String>,
    #[serde(default)]
    pub date_updated: Option<DateTime<Utc>>,
}

impl TryFrom<HomeworkPayload> for Homework {
    type Error = BotError;

    fn try_from(payload: HomeworkPayload) -> Result<Self, Self::Error> {
        let status = payload.status.parse::<HomeworkStatus>().map_err(|_| {
            BotError::MalformedResponse(format!(
                "unknown status '{}' for homework '{}'",
                payload.status, payload.homework_name
            ))
        })?;

        let id = payload
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| payload.homework_name.clone());

        Ok(Homework {
            id,
            name: payload.homework_name,
            status,
            reviewer_comment: payload.reviewer_comment.filter(|c| !c.trim().is_empty()),
            reviewed_at: payload.date_updated,
        })
    }
}

impl TryFrom<HomeworkStatusesResponse> for StatusSnapshot {
    type Error = BotError;

    fn try_from(response: HomeworkStatusesResponse) -> Result<Self, Self::Error> {
        let homeworks = response
            .homeworks
            .into_iter()
            .map(Homework::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatusSnapshot {
            homeworks,
            current_date: response.current_date,
        })
    }
}
