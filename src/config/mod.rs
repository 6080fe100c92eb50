mod basic;
mod storage;

pub use basic::BasicConfig;
pub use storage::{SheetsConfig, StorageBackend, StorageConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error as ThisError;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Persistence backend selection and settings (see `storage` table in config.toml).
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to extract configuration: {0}")]
    Extract(Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "SPENDBOOK_";

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` (if present) and the environment.
    pub fn figment() -> Figment {
        Self::figment_with_file(DEFAULT_CONFIG_FILE)
    }

    /// Layering, lowest to highest precedence: defaults, the TOML file at `path`,
    /// `SPENDBOOK_*` variables (`__` separates tables), then the legacy
    /// `GOOGLE_SHEETS_ID` / `GOOGLE_SERVICE_ACCOUNT_FILE` variables.
    pub fn figment_with_file(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if path.is_file() {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&["GOOGLE_SHEETS_ID"])
                    .map(|_| "storage.sheets.spreadsheet_id".into()),
            )
            .merge(
                Env::raw()
                    .only(&["GOOGLE_SERVICE_ACCOUNT_FILE"])
                    .map(|_| "storage.sheets.credentials_file".into()),
            )
    }

    /// Loads and validates configuration from the default sources.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let cfg: Self = figment
            .extract()
            .map_err(|err| ConfigError::Extract(Box::new(err)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Sheets
            && self.storage.sheets.spreadsheet_id.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.sheets.spreadsheet_id must be set when storage.backend = \"sheets\""
                    .to_string(),
            ));
        }
        if self.storage.sheets.sheet_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.sheets.sheet_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml));
        Config::from_figment(&figment)
    }

    #[test]
    fn defaults_select_sqlite() {
        let cfg = from_toml("").unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
        assert_eq!(cfg.storage.database_url, "sqlite://expenses.db");
        assert_eq!(cfg.storage.sheets.sheet_name, "Expenses");
        assert_eq!(cfg.basic.listen_port, 8000);
    }

    #[test]
    fn sheets_backend_requires_spreadsheet_id() {
        let err = from_toml(
            r#"
            [storage]
            backend = "sheets"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn sheets_table_overrides_defaults() {
        let cfg = from_toml(
            r#"
            [storage]
            backend = "sheets"

            [storage.sheets]
            spreadsheet_id = "sheet-123"
            sheet_name = "Ledger"
            access_token = "static-token"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Sheets);
        assert_eq!(cfg.storage.sheets.spreadsheet_id, "sheet-123");
        assert_eq!(cfg.storage.sheets.sheet_name, "Ledger");
        assert_eq!(
            cfg.storage.sheets.access_token.as_deref(),
            Some("static-token")
        );
        assert_eq!(
            cfg.storage.sheets.api_url.as_str(),
            "https://sheets.googleapis.com/"
        );
    }

    #[test]
    fn numeric_spreadsheet_id_is_accepted_as_text() {
        let cfg = from_toml(
            r#"
            [storage.sheets]
            spreadsheet_id = 12345
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.sheets.spreadsheet_id, "12345");
    }
}
