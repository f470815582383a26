use chrono::Utc;
use rusqlite::{params, Row};

use super::profiles::require_profile;
use super::{from_json, new_id, to_json};
use crate::error::{AppError, AppResult};
use crate::models::{MoodEntry, MoodSummary, NewMoodEntry};
use crate::state::DbPool;

const MOOD_COLUMNS: &str =
    "id, user_id, mood, assessment_result, notes, tags, activities, created_at, updated_at";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<MoodEntry> {
    let mood: String = row.get(2)?;
    let tags: Option<String> = row.get(5)?;
    let activities: Option<String> = row.get(6)?;
    Ok(MoodEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        mood: from_json(2, &mood)?,
        assessment_result: row.get(3)?,
        notes: row.get(4)?,
        tags: tags.map(|t| from_json(5, &t)).transpose()?,
        activities: activities.map(|a| from_json(6, &a)).transpose()?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn create_entry(pool: &DbPool, input: NewMoodEntry) -> AppResult<MoodEntry> {
    let now = Utc::now();
    let entry = MoodEntry {
        id: new_id(),
        user_id: input.user_id,
        mood: input.mood,
        assessment_result: input.assessment_result,
        notes: input.notes,
        tags: input.tags,
        activities: input.activities,
        created_at: now,
        updated_at: now,
    };
    entry.validate()?;

    let conn = pool.get()?;
    require_profile(&conn, &entry.user_id)?;
    conn.execute(
        "INSERT INTO mood_entries (id, user_id, mood, assessment_result, notes, tags, activities, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.id,
            entry.user_id,
            to_json(&entry.mood)?,
            entry.assessment_result,
            entry.notes,
            entry.tags.as_ref().map(to_json).transpose()?,
            entry.activities.as_ref().map(to_json).transpose()?,
            entry.created_at,
            entry.updated_at,
        ],
    )?;

    tracing::info!("Logged mood {} for {}", entry.mood, entry.user_id);
    Ok(entry)
}

/// Newest first
pub fn list_entries(pool: &DbPool, user_id: &str, limit: u32) -> AppResult<Vec<MoodEntry>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM mood_entries WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        MOOD_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user_id, limit], row_to_entry)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn delete_entry(pool: &DbPool, id: &str) -> AppResult<()> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM mood_entries WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(AppError::not_found(format!("mood entry {}", id)));
    }
    Ok(())
}

/// Summary over the user's whole history
pub fn summarize(pool: &DbPool, user_id: &str) -> AppResult<MoodSummary> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM mood_entries WHERE user_id = ?1 ORDER BY created_at, id",
        MOOD_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![user_id], row_to_entry)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MoodSummary::from_entries(user_id, &entries))
}
