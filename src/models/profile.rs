use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::require_non_empty;
use crate::error::{AppError, AppResult};

/// Account role
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    MoodMentor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::MoodMentor => "mood_mentor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "mood_mentor" => Ok(Self::MoodMentor),
            other => Err(AppError::invalid(format!("unknown role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(rename = "avatarUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn validate(&self) -> AppResult<()> {
        require_non_empty("profile id", &self.id)?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::invalid(format!("invalid email: {}", email)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::MoodMentor).unwrap(), "\"mood_mentor\"");
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"patient\"");
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn profile_uses_mixed_case_field_names() {
        let json = r#"{
            "id": "u1",
            "fullName": "Ada Lovelace",
            "role": "patient",
            "avatarUrl": "https://img.example/ada.png",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert!(profile.email.is_none());

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("email").is_none());
        assert_eq!(value["avatarUrl"], "https://img.example/ada.png");
    }

    #[test]
    fn validate_rejects_empty_id_and_bad_email() {
        let mut profile = UserProfile {
            id: "".into(),
            email: None,
            full_name: None,
            role: Role::Patient,
            avatar_url: None,
            created_at: Utc::now(),
        };
        assert!(profile.validate().is_err());

        profile.id = "u1".into();
        profile.email = Some("not-an-email".into());
        assert!(profile.validate().is_err());

        profile.email = Some("ada@example.com".into());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn role_parses_from_wire_name() {
        assert_eq!("mood_mentor".parse::<Role>().unwrap(), Role::MoodMentor);
        assert!("Mentor".parse::<Role>().is_err());
    }
}
