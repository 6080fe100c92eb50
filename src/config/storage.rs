use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, path::PathBuf};
use url::Url;

/// Which persistence medium backs the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Relational table in a local SQLite database.
    #[default]
    Sqlite,
    /// Rows of a Google Sheets spreadsheet.
    Sheets,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Sheets => "sheets",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Active backend.
    /// TOML: `storage.backend`. Values: `sqlite` | `sheets`. Default: `sqlite`.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database URL for SQLite.
    /// TOML: `storage.database_url`. Default: `sqlite://expenses.db`.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Google Sheets backend settings (see `storage.sheets` table).
    #[serde(default)]
    pub sheets: SheetsConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: default_database_url(),
            sheets: SheetsConfig::default(),
        }
    }
}

/// Google Sheets backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    /// Target spreadsheet id (the long token in the spreadsheet URL).
    /// TOML: `storage.sheets.spreadsheet_id`. Env alias: `GOOGLE_SHEETS_ID`.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub spreadsheet_id: String,

    /// Title of the sheet (tab) holding the records.
    /// TOML: `storage.sheets.sheet_name`. Default: `Expenses`.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Sheets REST API base URL.
    /// TOML: `storage.sheets.api_url`. Default: `https://sheets.googleapis.com/`.
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Service-account key or authorized-user credential JSON.
    /// TOML: `storage.sheets.credentials_file`. Env alias: `GOOGLE_SERVICE_ACCOUNT_FILE`.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,

    /// Authorized-user token file consulted when `credentials_file` is unset or unusable.
    /// TOML: `storage.sheets.token_file`. Default: `token.json`.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    /// Pre-issued bearer token; used only when no credential file is usable.
    /// TOML: `storage.sheets.access_token`.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Optional upstream HTTP proxy for Sheets and token endpoint calls.
    /// TOML: `storage.sheets.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Per-request timeout for Sheets calls, in seconds.
    /// TOML: `storage.sheets.request_timeout_secs`. Default: `30`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Max retry attempts for OAuth token requests. Data calls are never retried.
    /// TOML: `storage.sheets.oauth_retry_max_times`. Default: `3`.
    #[serde(default = "default_oauth_retry_max_times")]
    pub oauth_retry_max_times: usize,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            api_url: default_api_url(),
            credentials_file: None,
            token_file: default_token_file(),
            access_token: None,
            proxy: None,
            request_timeout_secs: default_request_timeout_secs(),
            oauth_retry_max_times: default_oauth_retry_max_times(),
        }
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for storage.sheets.spreadsheet_id",
        )),
    }
}

fn default_database_url() -> String {
    "sqlite://expenses.db".to_string()
}

fn default_sheet_name() -> String {
    "Expenses".to_string()
}

fn default_api_url() -> Url {
    Url::parse("https://sheets.googleapis.com/").expect("valid Google Sheets API URL")
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_oauth_retry_max_times() -> usize {
    3
}
