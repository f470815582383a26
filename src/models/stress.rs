use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::error::{AppError, AppResult};

/// Inclusive range a stress level must fall in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StressScale {
    pub min: f64,
    pub max: f64,
}

impl Default for StressScale {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 10.0,
        }
    }
}

impl StressScale {
    pub fn check(&self, level: f64) -> AppResult<()> {
        if !level.is_finite() || level < self.min || level > self.max {
            return Err(AppError::invalid(format!(
                "stress level {} is outside {}..={}",
                level, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StressAssessment {
    pub id: String,
    pub user_id: String,
    pub stress_level: f64,
    pub symptoms: Vec<String>,
    pub triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coping_strategies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StressAssessment {
    pub fn validate(&self, scale: &StressScale) -> AppResult<()> {
        require_non_empty("stress assessment id", &self.id)?;
        require_non_empty("user_id", &self.user_id)?;
        scale.check(self.stress_level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStressAssessment {
    pub user_id: String,
    pub stress_level: f64,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub coping_strategies: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
}
