use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{new_id, parse_column};
use crate::error::{AppError, AppResult};
use crate::models::{NewProfile, Role, UserProfile};
use crate::state::DbPool;

const PROFILE_COLUMNS: &str = "id, email, full_name, role, avatar_url, created_at";

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let role: String = row.get(3)?;
    Ok(UserProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        role: parse_column(3, &role)?,
        avatar_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn create_profile(pool: &DbPool, input: NewProfile) -> AppResult<UserProfile> {
    let profile = UserProfile {
        id: new_id(),
        email: input.email,
        full_name: input.full_name,
        role: input.role,
        avatar_url: input.avatar_url,
        created_at: Utc::now(),
    };
    profile.validate()?;

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO profiles (id, email, full_name, role, avatar_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            profile.id,
            profile.email,
            profile.full_name,
            profile.role.as_str(),
            profile.avatar_url,
            profile.created_at,
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::invalid("a profile with this email already exists")
        }
        other => other.into(),
    })?;

    tracing::info!("Created {} profile {}", profile.role, profile.id);
    Ok(profile)
}

pub fn get_profile(pool: &DbPool, id: &str) -> AppResult<UserProfile> {
    let conn = pool.get()?;
    conn.query_row(
        &format!("SELECT {} FROM profiles WHERE id = ?1", PROFILE_COLUMNS),
        params![id],
        row_to_profile,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found(format!("profile {}", id)))
}

/// Fails with `NotFound` unless a profile with `id` exists. Run it on the
/// same connection as the write that references the profile.
pub(crate) fn require_profile(conn: &rusqlite::Connection, id: &str) -> AppResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(AppError::not_found(format!("profile {}", id)));
    }
    Ok(())
}

pub fn list_profiles(pool: &DbPool, role: Option<Role>) -> AppResult<Vec<UserProfile>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM profiles WHERE ?1 IS NULL OR role = ?1 ORDER BY created_at",
        PROFILE_COLUMNS
    ))?;
    let profiles = stmt
        .query_map(params![role.map(|r| r.as_str())], row_to_profile)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(profiles)
}
