use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::profiles::require_profile;
use super::{from_json, new_id, to_json};
use crate::error::AppResult;
use crate::models::{NewStressAssessment, StressAssessment, StressScale};
use crate::state::DbPool;

const STRESS_COLUMNS: &str = "id, user_id, stress_level, symptoms, triggers, coping_strategies, notes, created_at, updated_at";

fn row_to_assessment(row: &Row<'_>) -> rusqlite::Result<StressAssessment> {
    let symptoms: String = row.get(3)?;
    let triggers: String = row.get(4)?;
    let coping: Option<String> = row.get(5)?;
    Ok(StressAssessment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        stress_level: row.get(2)?,
        symptoms: from_json(3, &symptoms)?,
        triggers: from_json(4, &triggers)?,
        coping_strategies: coping.map(|c| from_json(5, &c)).transpose()?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn create_assessment(
    pool: &DbPool,
    scale: &StressScale,
    input: NewStressAssessment,
) -> AppResult<StressAssessment> {
    let now = Utc::now();
    let assessment = StressAssessment {
        id: new_id(),
        user_id: input.user_id,
        stress_level: input.stress_level,
        symptoms: input.symptoms,
        triggers: input.triggers,
        coping_strategies: input.coping_strategies,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    };
    assessment.validate(scale)?;

    let conn = pool.get()?;
    require_profile(&conn, &assessment.user_id)?;
    conn.execute(
        "INSERT INTO stress_assessments (id, user_id, stress_level, symptoms, triggers, coping_strategies, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            assessment.id,
            assessment.user_id,
            assessment.stress_level,
            to_json(&assessment.symptoms)?,
            to_json(&assessment.triggers)?,
            assessment.coping_strategies.as_ref().map(to_json).transpose()?,
            assessment.notes,
            assessment.created_at,
            assessment.updated_at,
        ],
    )?;

    tracing::info!(
        "Recorded stress level {} for {}",
        assessment.stress_level,
        assessment.user_id
    );
    Ok(assessment)
}

/// Newest first
pub fn list_assessments(
    pool: &DbPool,
    user_id: &str,
    limit: u32,
) -> AppResult<Vec<StressAssessment>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM stress_assessments WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        STRESS_COLUMNS
    ))?;
    let assessments = stmt
        .query_map(params![user_id, limit], row_to_assessment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assessments)
}

pub fn latest_assessment(pool: &DbPool, user_id: &str) -> AppResult<Option<StressAssessment>> {
    let conn = pool.get()?;
    let latest = conn
        .query_row(
            &format!(
                "SELECT {} FROM stress_assessments WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
                STRESS_COLUMNS
            ),
            params![user_id],
            row_to_assessment,
        )
        .optional()?;
    Ok(latest)
}
