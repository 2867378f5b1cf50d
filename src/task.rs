//! Task data model.
//!
//! A task is a short piece of text with a numeric id, a three-state
//! lifecycle status and two UTC timestamps. Tasks are serialized as JSON
//! objects with camelCase field names:
//!
//! ```json
//! {
//!     "id": 1,
//!     "description": "buy milk",
//!     "status": "todo",
//!     "createdAt": "2025-01-01T00:00:00Z",
//!     "updatedAt": "2025-01-01T00:00:00Z"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Task identifier. Always positive.
pub type TaskId = u64;

/// Lifecycle stage of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown status '{}': must be todo, in-progress, or done",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a fresh `todo` task with both timestamps set to `now`.
    ///
    /// The description must already be validated with [`normalize_description`].
    pub fn new(id: TaskId, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_description(&mut self, description: String, now: DateTime<Utc>) {
        self.description = description;
        self.touch(now);
    }

    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    // updatedAt never drops below createdAt, even if the clock went backwards.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} - {} (created: {}, updated: {})",
            self.id,
            self.description,
            self.status,
            format_timestamp(&self.created_at),
            format_timestamp(&self.updated_at)
        )
    }
}

/// Trim a caller-supplied description and reject it if nothing is left.
///
/// Internal whitespace is kept verbatim.
pub fn normalize_description(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "description cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Render a timestamp the same way it is stored on disk.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}
