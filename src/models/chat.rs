use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::require_non_empty;
use crate::error::{AppError, AppResult};

/// Delivery status of a chat message. Ordered so that a message can only move
/// forward: sent, then delivered, then read.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "read" => Ok(Self::Read),
            other => Err(AppError::invalid(format!("unknown message status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl ChatMessage {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("message id", &self.id)?;
        require_non_empty("conversationId", &self.conversation_id)?;
        require_non_empty("senderId", &self.sender_id)?;
        require_non_empty("content", &self.content)
    }

    /// Move the message to `next`. Repeating the current status is a no-op;
    /// moving backwards is an error.
    pub fn advance(&mut self, next: MessageStatus) -> AppResult<bool> {
        if next < self.status {
            return Err(AppError::invalid(format!(
                "message {} cannot go from {} back to {}",
                self.id, self.status, next
            )));
        }
        let changed = next != self.status;
        self.status = next;
        Ok(changed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
}

/// Stored conversation row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("conversation id", &self.id)?;
        if self.participants.len() < 2 {
            return Err(AppError::invalid(
                "a conversation needs at least two participants",
            ));
        }
        for participant in &self.participants {
            require_non_empty("participant", participant)?;
        }
        Ok(())
    }

    pub fn includes(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

/// Inbox row as seen by one participant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationItem {
    pub id: String,
    pub participants: Vec<String>,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
    pub unread_count: u32,
}
