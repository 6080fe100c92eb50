use crate::error::{OauthError, SpendbookError};
use crate::google_oauth::credentials::{AuthorizedUser, CachedToken, ServiceAccountKey};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use oauth2::{
    ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl, basic::BasicClient,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Lifetime requested for service-account assertions (the maximum Google accepts).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Lifetime assumed when a token response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Stateless Google OAuth token endpoint calls.
pub struct GoogleOauthEndpoints;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct AssertionTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl GoogleOauthEndpoints {
    /// Refresh the access token using the stored refresh token.
    pub async fn refresh_access_token(
        user: &AuthorizedUser,
        http_client: &reqwest::Client,
    ) -> Result<CachedToken, SpendbookError> {
        let client = BasicClient::new(ClientId::new(user.client_id.clone()))
            .set_client_secret(ClientSecret::new(user.client_secret.clone()))
            .set_token_uri(TokenUrl::new(user.token_uri.clone())?);

        let token_result = client
            .exchange_refresh_token(&RefreshToken::new(user.refresh_token.clone()))
            .request_async(http_client)
            .await?;

        let expires_in = token_result
            .expires_in()
            .and_then(|d| i64::try_from(d.as_secs()).ok())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        info!("Authorized user access token refreshed successfully");
        Ok(CachedToken::expiring_in(
            token_result.access_token().secret().clone(),
            expires_in,
        ))
    }

    /// Exchange a signed service-account assertion for an access token.
    pub async fn exchange_jwt_assertion(
        key: &ServiceAccountKey,
        scope: &str,
        http_client: &reqwest::Client,
    ) -> Result<CachedToken, SpendbookError> {
        let assertion = Self::sign_assertion(key, scope)?;

        let resp = http_client
            .post(key.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(OauthError::from)?;

        if !resp.status().is_success() {
            return Err(OauthError::UpstreamStatus(resp.status()).into());
        }

        let body = resp.bytes().await.map_err(OauthError::from)?;
        let token: AssertionTokenResponse =
            serde_json::from_slice(&body).map_err(|e| OauthError::Parse {
                message: e.to_string(),
                body: crate::error::body_preview(&body),
            })?;

        info!(
            client_email = %key.client_email,
            "Service account access token issued"
        );
        Ok(CachedToken::expiring_in(
            token.access_token,
            token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        ))
    }

    /// RS256 JWT asserting the service account identity for `scope`.
    pub fn sign_assertion(key: &ServiceAccountKey, scope: &str) -> Result<String, SpendbookError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&key.private_key_id);

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
    }
}
