use crate::config::SheetsConfig;
use crate::error::{IsRetryable, SpendbookError};
use crate::google_oauth::SPREADSHEETS_SCOPE;
use crate::google_oauth::credentials::{CachedToken, CredentialFile};
use crate::google_oauth::endpoints::GoogleOauthEndpoints;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Source of bearer tokens for Sheets API calls.
///
/// Resolved once at startup and handed to the client; nothing reads credentials
/// from global state.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, SpendbookError>;
}

/// A fixed, externally managed token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, SpendbookError> {
        Ok(self.token.clone())
    }
}

/// Issues tokens from a credential file and caches them until shortly before expiry.
pub struct GoogleTokenProvider {
    credential: CredentialFile,
    http_client: reqwest::Client,
    retry_policy: ExponentialBuilder,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleTokenProvider {
    pub fn new(
        credential: CredentialFile,
        http_client: reqwest::Client,
        retry_max_times: usize,
    ) -> Self {
        let seed = match &credential {
            CredentialFile::AuthorizedUser(user) => user.seed_token(),
            CredentialFile::ServiceAccount(_) => None,
        };
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(retry_max_times)
            .with_jitter();
        Self {
            credential,
            http_client,
            retry_policy,
            cached: Mutex::new(seed),
        }
    }

    async fn request_token(&self) -> Result<CachedToken, SpendbookError> {
        match &self.credential {
            CredentialFile::ServiceAccount(key) => {
                GoogleOauthEndpoints::exchange_jwt_assertion(
                    key,
                    SPREADSHEETS_SCOPE,
                    &self.http_client,
                )
                .await
            }
            CredentialFile::AuthorizedUser(user) => {
                GoogleOauthEndpoints::refresh_access_token(user, &self.http_client).await
            }
        }
    }

    /// Token request with network-aware retries.
    async fn request_token_with_retry(&self) -> Result<CachedToken, SpendbookError> {
        (|| async { self.request_token().await })
            .retry(self.retry_policy)
            .when(|e: &SpendbookError| e.is_retryable())
            .notify(|err, dur: Duration| {
                warn!(
                    "token request retrying after error {}, sleeping {:?}",
                    err, dur
                );
            })
            .await
    }
}

#[async_trait]
impl AccessTokenProvider for GoogleTokenProvider {
    async fn access_token(&self) -> Result<String, SpendbookError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.access_token.clone());
        }

        let fresh = self.request_token_with_retry().await?;
        debug!(expiry = %fresh.expiry, "access token cached");
        let token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// Picks the credential source for the Sheets backend.
///
/// Order: `credentials_file` (or `./credentials.json` when unset), then
/// `token_file`, then a static `access_token`. Unusable files are logged and skipped.
pub fn resolve_provider(
    cfg: &SheetsConfig,
    http_client: reqwest::Client,
) -> Result<Arc<dyn AccessTokenProvider>, SpendbookError> {
    let candidates = [
        cfg.credentials_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("credentials.json")),
        cfg.token_file.clone(),
    ];

    for path in candidates.iter().filter(|p| p.is_file()) {
        match CredentialFile::load(path) {
            Ok(credential) => {
                info!(
                    path = %path.display(),
                    principal = %credential.describe(),
                    "Using Google credential file"
                );
                return Ok(Arc::new(GoogleTokenProvider::new(
                    credential,
                    http_client,
                    cfg.oauth_retry_max_times,
                )));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable credential file; skipping");
            }
        }
    }

    if let Some(token) = cfg.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
        info!("Using static access token from configuration");
        return Ok(Arc::new(StaticTokenProvider::new(token)));
    }

    Err(SpendbookError::Credentials(
        "no authentication method available; set storage.sheets.credentials_file \
         (service account key or authorized user JSON), provide a token file, \
         or set storage.sheets.access_token"
            .to_string(),
    ))
}
