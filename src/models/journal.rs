use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mood::MoodValue;
use super::require_non_empty;
use crate::error::{AppError, AppResult};

const SHARE_CODE_LEN: usize = 10;
const SHARE_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<MoodValue>,
    pub tags: Vec<String>,
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("journal entry id", &self.id)?;
        require_non_empty("user_id", &self.user_id)?;
        if let Some(mood) = &self.mood {
            mood.validate()?;
        }
        match (&self.share_code, self.is_shared) {
            (Some(_), false) => Err(AppError::invalid(
                "share_code is only allowed on shared journal entries",
            )),
            (Some(code), true) => require_non_empty("share_code", code),
            (None, _) => Ok(()),
        }
    }

    /// Mark the entry shared under `code`, overwriting any code it had.
    pub fn share(&mut self, code: String, now: DateTime<Utc>) {
        self.is_shared = true;
        self.share_code = Some(code);
        self.updated_at = now;
    }

    pub fn unshare(&mut self, now: DateTime<Utc>) {
        self.is_shared = false;
        self.share_code = None;
        self.updated_at = now;
    }
}

/// Random share code without look-alike characters (0/O, 1/l/I).
pub fn generate_share_code() -> String {
    let mut rng = rand::thread_rng();
    (0..SHARE_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SHARE_CODE_CHARSET.len());
            SHARE_CODE_CHARSET[idx] as char
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub mood: Option<MoodValue>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the field as it is. `title` and `mood` take
/// `Some(None)` (JSON `null`) to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJournalEntry {
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub mood: Option<Option<MoodValue>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
