//! API error handling
//!
//! Consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Wrapper that renders engine/store errors as JSON responses
#[derive(Debug)]
pub struct ApiError(pub common::Error);

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use common::Error;

        let (status, response) = match self.0 {
            Error::CredentialExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: "GitHub credential expired, please re-authenticate".to_string(),
                    code: Some("credential_expired".to_string()),
                    retry_after_secs: None,
                },
            ),
            Error::CooldownActive { remaining_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    error: format!("sync cooldown active, retry in {}s", remaining_secs),
                    code: Some("cooldown_active".to_string()),
                    retry_after_secs: Some(remaining_secs),
                },
            ),
            Error::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    error: "rate limited by GitHub".to_string(),
                    code: Some("rate_limited".to_string()),
                    retry_after_secs: Some(retry_after_secs),
                },
            ),
            Error::SourceUnavailable(msg) => {
                error!("activity source unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "GitHub is unreachable, try again later".to_string(),
                        code: Some("source_unavailable".to_string()),
                        retry_after_secs: None,
                    },
                )
            }
            err @ (Error::UserNotFound(_)
            | Error::CharacterNotFound(_)
            | Error::AchievementNotFound(_)
            | Error::GuildNotFound(_)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: err.to_string(),
                    code: Some("not_found".to_string()),
                    retry_after_secs: None,
                },
            ),
            err => {
                error!("internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "internal server error".to_string(),
                        code: Some("internal_error".to_string()),
                        retry_after_secs: None,
                    },
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Extension trait to convert sqlx errors to ApiError
pub trait DbResultExt<T> {
    fn db_err(self) -> Result<T, ApiError>;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn db_err(self) -> Result<T, ApiError> {
        self.map_err(|e| ApiError(common::Error::Database(e.to_string())))
    }
}
