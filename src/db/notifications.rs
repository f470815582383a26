use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::profiles::require_profile;
use super::{from_json, new_id, parse_column, to_json};
use crate::error::{AppError, AppResult};
use crate::models::{CreateNotificationParams, Notification, UpdateNotificationParams};
use crate::state::DbPool;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, kind, is_read, link, metadata, created_at, updated_at";

fn row_to_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let kind: String = row.get(4)?;
    let metadata: String = row.get(7)?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        kind: parse_column(4, &kind)?,
        is_read: row.get(5)?,
        link: row.get(6)?,
        metadata: from_json(7, &metadata)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn load(conn: &rusqlite::Connection, id: &str) -> AppResult<Notification> {
    conn.query_row(
        &format!("SELECT {} FROM notifications WHERE id = ?1", NOTIFICATION_COLUMNS),
        params![id],
        row_to_notification,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found(format!("notification {}", id)))
}

pub fn create_notification(
    pool: &DbPool,
    max_metadata_entries: usize,
    input: CreateNotificationParams,
) -> AppResult<Notification> {
    let now = Utc::now();
    let notification = Notification {
        id: new_id(),
        user_id: input.user_id,
        title: input.title,
        message: input.message,
        kind: input.kind,
        is_read: false,
        link: input.link,
        metadata: input.metadata.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    notification.validate(max_metadata_entries)?;

    let conn = pool.get()?;
    require_profile(&conn, &notification.user_id)?;
    conn.execute(
        "INSERT INTO notifications (id, user_id, title, message, kind, is_read, link, metadata, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            notification.id,
            notification.user_id,
            notification.title,
            notification.message,
            notification.kind.as_str(),
            notification.is_read,
            notification.link,
            to_json(&notification.metadata)?,
            notification.created_at,
            notification.updated_at,
        ],
    )?;

    tracing::info!(
        "Created {} notification {} for {}",
        notification.kind,
        notification.id,
        notification.user_id
    );
    Ok(notification)
}

pub fn get_notification(pool: &DbPool, id: &str) -> AppResult<Notification> {
    let conn = pool.get()?;
    load(&conn, id)
}

/// Newest first, optionally restricted to unread notifications
pub fn list_notifications(
    pool: &DbPool,
    user_id: &str,
    unread_only: bool,
    limit: u32,
) -> AppResult<Vec<Notification>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM notifications
         WHERE user_id = ?1 AND (?2 = 0 OR is_read = 0)
         ORDER BY created_at DESC, id DESC LIMIT ?3",
        NOTIFICATION_COLUMNS
    ))?;
    let notifications = stmt
        .query_map(params![user_id, unread_only, limit], row_to_notification)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(notifications)
}

pub fn unread_count(pool: &DbPool, user_id: &str) -> AppResult<u32> {
    let conn = pool.get()?;
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn update_notification(
    pool: &DbPool,
    max_metadata_entries: usize,
    id: &str,
    update: UpdateNotificationParams,
) -> AppResult<Notification> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut notification = load(&tx, id)?;
    if !notification.apply(update, Utc::now()) {
        return Ok(notification);
    }
    notification.validate(max_metadata_entries)?;

    tx.execute(
        "UPDATE notifications
         SET title = ?2, message = ?3, kind = ?4, is_read = ?5, link = ?6, metadata = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            notification.id,
            notification.title,
            notification.message,
            notification.kind.as_str(),
            notification.is_read,
            notification.link,
            to_json(&notification.metadata)?,
            notification.updated_at,
        ],
    )?;
    tx.commit()?;
    Ok(notification)
}

pub fn mark_as_read(pool: &DbPool, id: &str) -> AppResult<Notification> {
    let conn = pool.get()?;
    let rows = conn.execute(
        "UPDATE notifications SET is_read = 1, updated_at = ?2 WHERE id = ?1 AND is_read = 0",
        params![id, Utc::now()],
    )?;
    if rows == 0 {
        tracing::debug!("Notification {} already read or missing", id);
    }
    load(&conn, id)
}

/// Returns how many notifications changed
pub fn mark_all_as_read(pool: &DbPool, user_id: &str) -> AppResult<usize> {
    let conn = pool.get()?;
    let rows = conn.execute(
        "UPDATE notifications SET is_read = 1, updated_at = ?2 WHERE user_id = ?1 AND is_read = 0",
        params![user_id, Utc::now()],
    )?;
    tracing::info!("Marked {} notifications read for {}", rows, user_id);
    Ok(rows)
}

pub fn delete_notification(pool: &DbPool, id: &str) -> AppResult<()> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM notifications WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(AppError::not_found(format!("notification {}", id)));
    }
    Ok(())
}
