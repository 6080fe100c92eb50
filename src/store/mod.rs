//! The record store contract shared by every persistence backend.

pub mod summary;

pub use summary::summarize;

use crate::config::{Config, StorageBackend};
use crate::error::SpendbookError;
use async_trait::async_trait;
use spendbook_schema::{Expense, ExpenseInput, ExpenseSummary};
use std::sync::Arc;
use tracing::info;

/// Operations every backend supports.
///
/// `get_by_id` and `update` report an unknown id as [`SpendbookError::NotFound`];
/// `delete` reports it as `Ok(false)`. Any other error is a backend failure.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend(&self) -> StorageBackend;

    /// Persists a new record with a fresh id and the current time as `created_at`.
    async fn create(&self, input: ExpenseInput) -> Result<Expense, SpendbookError>;

    async fn list_all(&self) -> Result<Vec<Expense>, SpendbookError>;

    async fn get_by_id(&self, id: &str) -> Result<Expense, SpendbookError>;

    /// Replaces `title`, `amount` and `category`; `id` and `created_at` carry over.
    async fn update(&self, id: &str, input: ExpenseInput) -> Result<Expense, SpendbookError>;

    /// Returns whether a record was actually removed.
    async fn delete(&self, id: &str) -> Result<bool, SpendbookError>;

    /// Exact, case-sensitive category match. No match is an empty list.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Expense>, SpendbookError>;

    async fn summarize(&self) -> Result<ExpenseSummary, SpendbookError> {
        let records = self.list_all().await?;
        Ok(summarize(&records))
    }
}

pub type SharedStore = Arc<dyn RecordStore>;

/// Fresh 128-bit random record id.
pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Builds the backend selected by `cfg.storage.backend`.
pub async fn open(cfg: &Config) -> Result<SharedStore, SpendbookError> {
    let storage = &cfg.storage;
    info!(backend = %storage.backend, "Opening record store");

    let store: SharedStore = match storage.backend {
        StorageBackend::Sqlite => {
            info!(database_url = %storage.database_url, "SQLite backend selected");
            Arc::new(crate::db::spawn(&storage.database_url).await?)
        }
        StorageBackend::Sheets => {
            let sheets_cfg = &storage.sheets;
            info!(
                spreadsheet_id = %sheets_cfg.spreadsheet_id,
                sheet_name = %sheets_cfg.sheet_name,
                api_url = %sheets_cfg.api_url,
                proxy = %sheets_cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
                "Google Sheets backend selected"
            );
            let http = crate::sheets::build_http_client(sheets_cfg)?;
            let tokens = crate::google_oauth::resolve_provider(sheets_cfg, http.clone())?;
            let client = crate::sheets::SheetsClient::new(
                http,
                sheets_cfg.api_url.clone(),
                sheets_cfg.spreadsheet_id.clone(),
                tokens,
            );
            Arc::new(crate::sheets::SheetsStore::connect(client, &sheets_cfg.sheet_name).await?)
        }
    };
    Ok(store)
}
