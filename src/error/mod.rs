mod oauth;
mod spendbook;

pub use oauth::OauthError;
pub(crate) use oauth::body_preview;
pub use spendbook::{ApiErrorBody, ApiErrorObject, ErrorKind, SpendbookError};

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
