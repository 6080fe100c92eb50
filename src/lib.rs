pub mod config;
pub mod db;
pub mod error;
pub mod google_oauth;
pub mod server;
pub mod sheets;
pub mod store;

pub use error::SpendbookError;
pub use store::{RecordStore, SharedStore};
