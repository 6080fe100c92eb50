use super::IsRetryable;
use super::spendbook::SpendbookError;
use axum::http::StatusCode;
use oauth2::basic::BasicErrorResponseType;
use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{HttpClientError, RequestTokenError, StandardErrorResponse};
use thiserror::Error as ThisError;

/// Failures talking to a Google OAuth2 token endpoint.
#[derive(Debug, ThisError)]
pub enum OauthError {
    #[error("OAuth2 request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OAuth2 upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("OAuth2 server response error: {error}")]
    ServerResponse { error: String },

    #[error("OAuth2 token endpoint parse error: {message}. Body: {body}")]
    Parse { message: String, body: String },

    #[error("OAuth2 unexpected error: {message}")]
    Other { message: String },
}

impl IsRetryable for OauthError {
    fn is_retryable(&self) -> bool {
        match self {
            OauthError::Request(_) => true,
            OauthError::UpstreamStatus(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

/// Truncates an upstream body for inclusion in error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let body_str = String::from_utf8_lossy(body);
    body_str
        .char_indices()
        .nth(100)
        .map(|(idx, _)| format!("{}...<truncated>", &body_str[..idx]))
        .unwrap_or_else(|| body_str.into_owned())
}

type PkgsRequestTokenError = RequestTokenError<
    HttpClientError<ReqwestClientError>,
    StandardErrorResponse<BasicErrorResponseType>,
>;

impl From<PkgsRequestTokenError> for OauthError {
    fn from(e: PkgsRequestTokenError) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => OauthError::ServerResponse {
                error: err.error().to_string(),
            },
            RequestTokenError::Request(wrapper) => match wrapper {
                oauth2::HttpClientError::Reqwest(real_err) => OauthError::Request(*real_err),
                other => OauthError::Other {
                    message: format!("HttpClientError: {other:?}"),
                },
            },
            RequestTokenError::Parse(parse_err, body) => OauthError::Parse {
                message: parse_err.to_string(),
                body: body_preview(&body),
            },
            RequestTokenError::Other(s) => OauthError::Other { message: s },
        }
    }
}

impl From<PkgsRequestTokenError> for SpendbookError {
    fn from(e: PkgsRequestTokenError) -> Self {
        OauthError::from(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_statuses_are_retryable() {
        assert!(OauthError::UpstreamStatus(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(OauthError::UpstreamStatus(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!OauthError::UpstreamStatus(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(
            !OauthError::ServerResponse {
                error: "invalid_grant".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn body_preview_truncates_long_bodies() {
        let long = "x".repeat(250);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("...<truncated>"));
        assert_eq!(preview.len(), 100 + "...<truncated>".len());
        assert_eq!(body_preview(b"short"), "short");
    }
}
