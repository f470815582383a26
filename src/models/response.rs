use serde::{Deserialize, Serialize};

use super::{ChatMessage, ConversationItem, JournalEntry, MoodEntry, Notification, StressAssessment};
use crate::error::AppResult;

/// Result of a fetch operation: either `data` or `error` is set, never both.
/// Fields are private so the only way in is through `ok`, `err` or a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse<T> {
    data: Option<T>,
    error: Option<String>,
}

pub type JournalResponse = ServiceResponse<Vec<JournalEntry>>;
pub type MoodResponse = ServiceResponse<Vec<MoodEntry>>;
pub type StressResponse = ServiceResponse<Vec<StressAssessment>>;
pub type NotificationResponse = ServiceResponse<Vec<Notification>>;
pub type ConversationResponse = ServiceResponse<Vec<ConversationItem>>;
pub type MessageResponse = ServiceResponse<Vec<ChatMessage>>;

impl<T> ServiceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Error first: a response carrying an error never yields its data.
    pub fn into_result(self) -> Result<T, String> {
        match (self.error, self.data) {
            (Some(error), _) => Err(error),
            (None, Some(data)) => Ok(data),
            (None, None) => Err("response carried neither data nor error".to_string()),
        }
    }
}

impl<T> From<AppResult<T>> for ServiceResponse<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.public_message()),
        }
    }
}
