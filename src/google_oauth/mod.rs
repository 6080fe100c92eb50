//! Google OAuth2 credential handling for the Sheets backend.

pub mod credentials;
pub mod endpoints;
pub mod provider;

pub use credentials::{AuthorizedUser, CachedToken, CredentialFile, ServiceAccountKey};
pub use endpoints::GoogleOauthEndpoints;
pub use provider::{
    AccessTokenProvider, GoogleTokenProvider, StaticTokenProvider, resolve_provider,
};

/// Read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Token endpoint used when a credential file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
