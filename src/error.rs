#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::Invalid(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    /// Message safe to hand back to a caller. Storage failures are logged
    /// and collapsed into a generic message.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(what) => format!("Not found: {}", what),
            AppError::Invalid(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal error".to_string()
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                "Internal error".to_string()
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                "Internal error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
        }
    }

    /// Process exit code for the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotFound(_) => 3,
            AppError::Invalid(_) => 2,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_exits_with_3() {
        assert_eq!(AppError::not_found("journal entry x").exit_code(), 3);
    }

    #[test]
    fn invalid_exits_with_2() {
        assert_eq!(AppError::invalid("oops").exit_code(), 2);
    }

    #[test]
    fn internal_exits_with_1() {
        assert_eq!(AppError::Internal("boom".into()).exit_code(), 1);
    }

    #[test]
    fn invalid_message_is_passed_through() {
        assert_eq!(
            AppError::invalid("mood score 11 is outside 1..=10").public_message(),
            "mood score 11 is outside 1..=10"
        );
    }

    #[test]
    fn storage_errors_are_hidden() {
        let err = AppError::Database(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.public_message(), "Internal error");
    }
}
