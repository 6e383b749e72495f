use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leaderboard::LeaderboardError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Leaderboard(LeaderboardError),
    Validation(ValidationErrors),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaderboard(e) => write!(f, "Leaderboard error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Leaderboard(LeaderboardError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Leaderboard(LeaderboardError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            Self::Leaderboard(LeaderboardError::Encoding(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Leaderboard(LeaderboardError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Leaderboard(LeaderboardError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Leaderboard(LeaderboardError::StoreUnavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            Self::Leaderboard(
                e @ (LeaderboardError::StoreUnavailable { .. } | LeaderboardError::Timeout { .. }),
            ) => {
                tracing::error!("Store error: {:?}", e);
                json!({
                    "error": "The leaderboard store is unavailable"
                })
            }
            Self::Leaderboard(e) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<LeaderboardError> for WebError {
    fn from(error: LeaderboardError) -> Self {
        Self::Leaderboard(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;
