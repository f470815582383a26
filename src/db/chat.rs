use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::profiles::require_profile;
use super::{new_id, parse_column};
use crate::error::{AppError, AppResult};
use crate::models::{ChatMessage, Conversation, ConversationItem, MessageStatus, NewChatMessage};
use crate::state::DbPool;

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, content, timestamp, status";

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    let status: String = row.get(5)?;
    Ok(ChatMessage {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        sender_id: row.get(2)?,
        content: row.get(3)?,
        timestamp: row.get(4)?,
        status: parse_column(5, &status)?,
    })
}

fn participants(conn: &rusqlite::Connection, conversation_id: &str) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM conversation_participants WHERE conversation_id = ?1 ORDER BY position",
    )?;
    let ids = stmt
        .query_map(params![conversation_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ids)
}

fn load_conversation(conn: &rusqlite::Connection, id: &str) -> AppResult<Conversation> {
    let created_at: DateTime<Utc> = conn
        .query_row(
            "SELECT created_at FROM conversations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| AppError::not_found(format!("conversation {}", id)))?;

    Ok(Conversation {
        id: id.to_string(),
        participants: participants(conn, id)?,
        created_at,
    })
}

fn load_message(conn: &rusqlite::Connection, id: &str) -> AppResult<ChatMessage> {
    conn.query_row(
        &format!("SELECT {} FROM chat_messages WHERE id = ?1", MESSAGE_COLUMNS),
        params![id],
        row_to_message,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found(format!("message {}", id)))
}

fn require_participant(conversation: &Conversation, user_id: &str) -> AppResult<()> {
    if !conversation.includes(user_id) {
        return Err(AppError::invalid(format!(
            "{} is not a participant of conversation {}",
            user_id, conversation.id
        )));
    }
    Ok(())
}

/// Open a conversation between `participant_ids`. Duplicates are dropped,
/// first-seen order is kept.
pub fn create_conversation(pool: &DbPool, participant_ids: &[String]) -> AppResult<Conversation> {
    let mut unique: Vec<String> = Vec::with_capacity(participant_ids.len());
    for id in participant_ids {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }

    let conversation = Conversation {
        id: new_id(),
        participants: unique,
        created_at: Utc::now(),
    };
    conversation.validate()?;

    let mut conn = pool.get()?;
    let tx = conn.transaction()?;
    for user_id in &conversation.participants {
        require_profile(&tx, user_id)?;
    }
    tx.execute(
        "INSERT INTO conversations (id, created_at) VALUES (?1, ?2)",
        params![conversation.id, conversation.created_at],
    )?;
    for (position, user_id) in conversation.participants.iter().enumerate() {
        tx.execute(
            "INSERT INTO conversation_participants (conversation_id, user_id, position)
             VALUES (?1, ?2, ?3)",
            params![conversation.id, user_id, position as i64],
        )?;
    }
    tx.commit()?;

    tracing::info!(
        "Opened conversation {} with {} participants",
        conversation.id,
        conversation.participants.len()
    );
    Ok(conversation)
}

pub fn get_conversation(pool: &DbPool, id: &str) -> AppResult<Conversation> {
    let conn = pool.get()?;
    load_conversation(&conn, id)
}

pub fn send_message(pool: &DbPool, input: NewChatMessage) -> AppResult<ChatMessage> {
    let conn = pool.get()?;
    let conversation = load_conversation(&conn, &input.conversation_id)?;
    require_participant(&conversation, &input.sender_id)?;

    let message = ChatMessage {
        id: new_id(),
        conversation_id: input.conversation_id,
        sender_id: input.sender_id,
        content: input.content,
        timestamp: Utc::now(),
        status: MessageStatus::Sent,
    };
    message.validate()?;

    conn.execute(
        "INSERT INTO chat_messages (id, conversation_id, sender_id, content, timestamp, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            message.id,
            message.conversation_id,
            message.sender_id,
            message.content,
            message.timestamp,
            message.status.as_str(),
        ],
    )?;

    tracing::debug!(
        "Message {} sent in {}",
        message.id,
        message.conversation_id
    );
    Ok(message)
}

/// Move a message forward to `status`. Regressions are rejected and leave
/// the stored status untouched.
///
/// The read and the write share an immediate transaction, so a concurrent
/// writer cannot slip a newer status in between them.
pub fn update_message_status(
    pool: &DbPool,
    message_id: &str,
    status: MessageStatus,
) -> AppResult<ChatMessage> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut message = load_message(&tx, message_id)?;
    if !message.advance(status)? {
        return Ok(message);
    }

    tx.execute(
        "UPDATE chat_messages SET status = ?2 WHERE id = ?1",
        params![message.id, message.status.as_str()],
    )?;
    tx.commit()?;
    Ok(message)
}

/// Mark every message `reader_id` received in the conversation as read.
/// Returns how many messages changed.
pub fn mark_conversation_read(
    pool: &DbPool,
    conversation_id: &str,
    reader_id: &str,
) -> AppResult<usize> {
    let conn = pool.get()?;
    let conversation = load_conversation(&conn, conversation_id)?;
    require_participant(&conversation, reader_id)?;

    let rows = conn.execute(
        "UPDATE chat_messages SET status = 'read'
         WHERE conversation_id = ?1 AND sender_id != ?2 AND status != 'read'",
        params![conversation_id, reader_id],
    )?;
    Ok(rows)
}

/// Oldest first, so the history reads top to bottom
pub fn list_messages(
    pool: &DbPool,
    conversation_id: &str,
    limit: u32,
) -> AppResult<Vec<ChatMessage>> {
    let conn = pool.get()?;
    load_conversation(&conn, conversation_id)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM (
            SELECT {} FROM chat_messages WHERE conversation_id = ?1
            ORDER BY timestamp DESC, id DESC LIMIT ?2
         ) ORDER BY timestamp, id",
        MESSAGE_COLUMNS, MESSAGE_COLUMNS
    ))?;
    let messages = stmt
        .query_map(params![conversation_id, limit], row_to_message)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(messages)
}

/// Inbox for `user_id`, most recently active conversation first. Unread
/// counts only include messages from other participants.
pub fn list_conversations(pool: &DbPool, user_id: &str) -> AppResult<Vec<ConversationItem>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT c.id, c.created_at,
            (SELECT m.content FROM chat_messages m WHERE m.conversation_id = c.id
             ORDER BY m.timestamp DESC, m.id DESC LIMIT 1),
            (SELECT m.timestamp FROM chat_messages m WHERE m.conversation_id = c.id
             ORDER BY m.timestamp DESC, m.id DESC LIMIT 1),
            (SELECT COUNT(*) FROM chat_messages m WHERE m.conversation_id = c.id
             AND m.sender_id != ?1 AND m.status != 'read')
         FROM conversations c
         JOIN conversation_participants p ON p.conversation_id = c.id
         WHERE p.user_id = ?1",
    )?;

    let rows = stmt
        .query_map(params![user_id], |row| {
            let created_at: DateTime<Utc> = row.get(1)?;
            let last_time: Option<DateTime<Utc>> = row.get(3)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                last_time.unwrap_or(created_at),
                row.get::<_, u32>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut items = Vec::with_capacity(rows.len());
    for (id, last_message, last_message_time, unread_count) in rows {
        items.push(ConversationItem {
            participants: participants(&conn, &id)?,
            id,
            last_message,
            last_message_time,
            unread_count,
        });
    }
    items.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
    Ok(items)
}
