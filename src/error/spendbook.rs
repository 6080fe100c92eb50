use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;
use tracing::error;

use super::IsRetryable;
use super::oauth::OauthError;

#[derive(Debug, ThisError)]
pub enum SpendbookError {
    #[error("Expense not found: {id}")]
    NotFound { id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Oauth(#[from] OauthError),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream error with status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    #[error("Malformed sheet row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),
}

/// Coarse outcome classes the HTTP layer renders differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested id does not exist. Expected and non-fatal.
    NotFound,
    /// Connection, authentication or network failure reaching the storage medium.
    BackendUnavailable,
    /// Malformed input rejected before reaching storage.
    ValidationFailure,
}

impl SpendbookError {
    pub fn not_found(id: impl Into<String>) -> Self {
        SpendbookError::NotFound { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SpendbookError::NotFound { .. } => ErrorKind::NotFound,
            SpendbookError::Validation(_) => ErrorKind::ValidationFailure,
            _ => ErrorKind::BackendUnavailable,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<JsonRejection> for SpendbookError {
    fn from(rejection: JsonRejection) -> Self {
        SpendbookError::Validation(rejection.body_text())
    }
}

impl IntoResponse for SpendbookError {
    fn into_response(self) -> Response {
        let (status, body) = match self.kind() {
            ErrorKind::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: "Expense not found".to_string(),
                },
            ),
            ErrorKind::ValidationFailure => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorObject {
                    code: "VALIDATION_FAILED".to_string(),
                    message: self.to_string(),
                },
            ),
            ErrorKind::BackendUnavailable => {
                error!(error = %self, "storage backend failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorObject {
                        code: "BACKEND_UNAVAILABLE".to_string(),
                        message: "The storage backend failed to process the request.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorBody { inner: body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

impl IsRetryable for SpendbookError {
    fn is_retryable(&self) -> bool {
        match self {
            SpendbookError::Reqwest(_) => true,
            SpendbookError::Oauth(err) => err.is_retryable(),
            SpendbookError::UpstreamStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_error_taxonomy() {
        assert_eq!(SpendbookError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(
            SpendbookError::Validation("bad".to_string()).kind(),
            ErrorKind::ValidationFailure
        );
        assert_eq!(
            SpendbookError::UpstreamStatus {
                status: StatusCode::FORBIDDEN,
                body: String::new(),
            }
            .kind(),
            ErrorKind::BackendUnavailable
        );
        assert_eq!(
            SpendbookError::Credentials("none".to_string()).kind(),
            ErrorKind::BackendUnavailable
        );
    }

    #[test]
    fn responses_use_distinct_statuses() {
        let resp = SpendbookError::not_found("gone").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let err = SpendbookError::Validation("amount must be a finite number".to_string());
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = SpendbookError::RactorError("mailbox closed".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
