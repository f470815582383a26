// Domain records exchanged with clients as JSON.
//
// Records are plain data. Invariants that the wire format cannot express are
// checked by `validate` methods, which the store calls before every write.

pub mod chat;
pub mod journal;
pub mod metadata;
pub mod mood;
pub mod notification;
pub mod profile;
pub mod response;
pub mod stress;

pub use chat::{ChatMessage, Conversation, ConversationItem, MessageStatus, NewChatMessage};
pub use journal::{JournalEntry, NewJournalEntry, UpdateJournalEntry};
pub use metadata::{Metadata, MetadataValue};
pub use mood::{MoodEntry, MoodSummary, MoodValue, NewMoodEntry};
pub use notification::{
    CreateNotificationParams, Notification, NotificationType, UpdateNotificationParams,
};
pub use profile::{NewProfile, Role, UserProfile};
pub use response::{
    ConversationResponse, JournalResponse, MessageResponse, MoodResponse, NotificationResponse,
    ServiceResponse, StressResponse,
};
pub use stress::{NewStressAssessment, StressAssessment, StressScale};

use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

pub(crate) fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Deserializer for `Option<Option<T>>` update fields: a missing key leaves
/// the field alone (`None`), an explicit `null` clears it (`Some(None)`).
/// Pair it with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
