use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use engine::{ErrorKind, LeagueError};
use log::{error, warn};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
    NotFound(String),
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::Conflict(m)
            | ApiError::Unavailable(m)
            | ApiError::NotFound(m)
            | ApiError::InternalError(m) => m,
        }
    }
}

impl From<LeagueError> for ApiError {
    fn from(err: LeagueError) -> Self {
        let message = err.to_string();

        match err.kind() {
            ErrorKind::Validation => ApiError::BadRequest(message),
            ErrorKind::StateConflict | ErrorKind::Sequencing => ApiError::Conflict(message),
            ErrorKind::Persistence => ApiError::Unavailable(message),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("worker failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{}: {}", status, self.message());
        } else {
            warn!("{}: {}", status, self.message());
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
