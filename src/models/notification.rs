use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::metadata::Metadata;
use super::require_non_empty;
use crate::error::{AppError, AppResult};

/// Notification category. Any other value on the wire is rejected.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Appointment,
    Message,
    Review,
    System,
    Reminder,
}

impl NotificationType {
    pub const ALL: [NotificationType; 5] = [
        Self::Appointment,
        Self::Message,
        Self::Review,
        Self::System,
        Self::Reminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Message => "message",
            Self::Review => "review",
            Self::System => "system",
            Self::Reminder => "reminder",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::invalid(format!("unknown notification type: {}", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn validate(&self, max_metadata_entries: usize) -> AppResult<()> {
        require_non_empty("notification id", &self.id)?;
        require_non_empty("userId", &self.user_id)?;
        require_non_empty("title", &self.title)?;
        self.metadata.check_bounds(max_metadata_entries)
    }

    /// Apply a partial update, touching `updated_at` only when something changed.
    pub fn apply(&mut self, update: UpdateNotificationParams, now: DateTime<Utc>) -> bool {
        let before = self.clone();
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(message) = update.message {
            self.message = message;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(is_read) = update.is_read {
            self.is_read = is_read;
        }
        if let Some(link) = update.link {
            self.link = link;
        }
        if let Some(metadata) = update.metadata {
            self.metadata = metadata;
        }

        let changed = *self != before;
        if changed {
            self.updated_at = now;
        }
        changed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationParams {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<NotificationType>,
    #[serde(default)]
    pub is_read: Option<bool>,
    /// `Some(None)` (JSON `null`) removes the link
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<Option<String>>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}
