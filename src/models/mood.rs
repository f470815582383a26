use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::require_non_empty;
use crate::error::{AppError, AppResult};

pub const MOOD_SCORE_MIN: i32 = 1;
pub const MOOD_SCORE_MAX: i32 = 10;

/// A mood reading: either a 1-10 score or a named category.
/// On the wire this is a bare number or a bare string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MoodValue {
    Score(i32),
    Category(String),
}

impl MoodValue {
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Score(score) if !(MOOD_SCORE_MIN..=MOOD_SCORE_MAX).contains(score) => {
                Err(AppError::invalid(format!(
                    "mood score {} is outside {}..={}",
                    score, MOOD_SCORE_MIN, MOOD_SCORE_MAX
                )))
            }
            Self::Score(_) => Ok(()),
            Self::Category(category) => require_non_empty("mood category", category),
        }
    }

    pub fn score(&self) -> Option<i32> {
        match self {
            Self::Score(score) => Some(*score),
            Self::Category(_) => None,
        }
    }

    /// Parse command-line input: digits become a score, anything else a category.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i32>() {
            Ok(score) => Self::Score(score),
            Err(_) => Self::Category(input.trim().to_string()),
        }
    }
}

impl fmt::Display for MoodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{}", score),
            Self::Category(category) => write!(f, "{}", category),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    pub id: String,
    pub user_id: String,
    pub mood: MoodValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("mood entry id", &self.id)?;
        require_non_empty("user_id", &self.user_id)?;
        self.mood.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMoodEntry {
    pub user_id: String,
    pub mood: MoodValue,
    #[serde(default)]
    pub assessment_result: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub activities: Option<Vec<String>>,
}

/// Aggregate view over a user's mood history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodSummary {
    pub user_id: String,
    pub entries: u32,
    /// Mean of the numeric readings, absent when every entry is a category
    pub average_score: Option<f64>,
    pub latest: Option<MoodEntry>,
}

impl MoodSummary {
    pub fn from_entries(user_id: &str, entries: &[MoodEntry]) -> Self {
        let scores: Vec<i32> = entries.iter().filter_map(|e| e.mood.score()).collect();
        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().map(|s| f64::from(*s)).sum::<f64>() / scores.len() as f64)
        };
        let latest = entries.iter().max_by_key(|e| e.created_at).cloned();

        Self {
            user_id: user_id.to_string(),
            entries: entries.len() as u32,
            average_score,
            latest,
        }
    }
}
