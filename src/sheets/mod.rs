//! Google Sheets backed record store.
//!
//! One spreadsheet tab holds the records: row 1 is the header, every row after
//! it is one record, columns A..E in the order of [`grid::HEADER`].

mod client;
pub mod grid;
mod store;

pub use client::{SheetProperties, SheetsClient};
pub use store::SheetsStore;

use crate::config::SheetsConfig;
use crate::error::SpendbookError;
use std::time::Duration;

const SHEETS_USER_AGENT: &str = concat!("spendbook/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by the Sheets API calls and the token endpoints.
pub fn build_http_client(cfg: &SheetsConfig) -> Result<reqwest::Client, SpendbookError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(SHEETS_USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .http2_adaptive_window(true);

    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    Ok(builder.build()?)
}
