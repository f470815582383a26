use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::profiles::require_profile;
use super::{from_json, new_id, to_json};
use crate::error::{AppError, AppResult};
use crate::format::slugify;
use crate::models::journal::generate_share_code;
use crate::models::{JournalEntry, MoodValue, NewJournalEntry, UpdateJournalEntry};
use crate::state::DbPool;

const ENTRY_COLUMNS: &str =
    "id, user_id, title, content, mood, tags, is_shared, share_code, created_at, updated_at";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let mood: Option<String> = row.get(4)?;
    let tags: String = row.get(5)?;
    Ok(JournalEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        mood: mood.map(|m| from_json::<MoodValue>(4, &m)).transpose()?,
        tags: from_json(5, &tags)?,
        is_shared: row.get(6)?,
        share_code: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Slugify tags, dropping empties and repeats but keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let slug = slugify(tag);
        if !slug.is_empty() && !out.contains(&slug) {
            out.push(slug);
        }
    }
    out
}

fn save(conn: &rusqlite::Connection, entry: &JournalEntry) -> AppResult<()> {
    entry.validate()?;
    let mood = entry.mood.as_ref().map(to_json).transpose()?;
    conn.execute(
        "INSERT INTO journal_entries (id, user_id, title, content, mood, tags, is_shared, share_code, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
           title = excluded.title,
           content = excluded.content,
           mood = excluded.mood,
           tags = excluded.tags,
           is_shared = excluded.is_shared,
           share_code = excluded.share_code,
           updated_at = excluded.updated_at",
        params![
            entry.id,
            entry.user_id,
            entry.title,
            entry.content,
            mood,
            to_json(&entry.tags)?,
            entry.is_shared,
            entry.share_code,
            entry.created_at,
            entry.updated_at,
        ],
    )?;
    Ok(())
}

pub fn create_entry(pool: &DbPool, input: NewJournalEntry) -> AppResult<JournalEntry> {
    let now = Utc::now();
    let entry = JournalEntry {
        id: new_id(),
        user_id: input.user_id,
        title: input.title,
        content: input.content,
        mood: input.mood,
        tags: normalize_tags(&input.tags),
        is_shared: false,
        share_code: None,
        created_at: now,
        updated_at: now,
    };

    let conn = pool.get()?;
    require_profile(&conn, &entry.user_id)?;
    save(&conn, &entry)?;
    tracing::info!("Created journal entry {} for {}", entry.id, entry.user_id);
    Ok(entry)
}

pub fn get_entry(pool: &DbPool, id: &str) -> AppResult<JournalEntry> {
    let conn = pool.get()?;
    load(&conn, id)
}

fn load(conn: &rusqlite::Connection, id: &str) -> AppResult<JournalEntry> {
    conn.query_row(
        &format!("SELECT {} FROM journal_entries WHERE id = ?1", ENTRY_COLUMNS),
        params![id],
        row_to_entry,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found(format!("journal entry {}", id)))
}

/// Newest first
pub fn list_entries(pool: &DbPool, user_id: &str, limit: u32) -> AppResult<Vec<JournalEntry>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM journal_entries WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user_id, limit], row_to_entry)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn update_entry(pool: &DbPool, id: &str, update: UpdateJournalEntry) -> AppResult<JournalEntry> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut entry = load(&tx, id)?;

    if let Some(title) = update.title {
        entry.title = title;
    }
    if let Some(content) = update.content {
        entry.content = content;
    }
    if let Some(mood) = update.mood {
        entry.mood = mood;
    }
    if let Some(tags) = update.tags {
        entry.tags = normalize_tags(&tags);
    }
    entry.updated_at = Utc::now();

    save(&tx, &entry)?;
    tx.commit()?;
    Ok(entry)
}

pub fn delete_entry(pool: &DbPool, id: &str) -> AppResult<()> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM journal_entries WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(AppError::not_found(format!("journal entry {}", id)));
    }
    Ok(())
}

/// Share an entry under a fresh code. Sharing an already shared entry keeps
/// its existing code, so concurrent shares all return the same one.
pub fn share_entry(pool: &DbPool, id: &str) -> AppResult<JournalEntry> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut entry = load(&tx, id)?;
    if entry.is_shared && entry.share_code.is_some() {
        return Ok(entry);
    }

    entry.share(generate_share_code(), Utc::now());
    save(&tx, &entry)?;
    tx.commit()?;
    tracing::info!("Shared journal entry {}", entry.id);
    Ok(entry)
}

pub fn unshare_entry(pool: &DbPool, id: &str) -> AppResult<JournalEntry> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut entry = load(&tx, id)?;
    if !entry.is_shared {
        return Ok(entry);
    }

    entry.unshare(Utc::now());
    save(&tx, &entry)?;
    tx.commit()?;
    tracing::info!("Unshared journal entry {}", entry.id);
    Ok(entry)
}

pub fn find_by_share_code(pool: &DbPool, code: &str) -> AppResult<JournalEntry> {
    let conn = pool.get()?;
    conn.query_row(
        &format!(
            "SELECT {} FROM journal_entries WHERE share_code = ?1 AND is_shared = 1",
            ENTRY_COLUMNS
        ),
        params![code],
        row_to_entry,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found(format!("shared journal entry {}", code)))
}
