//! Relational backend: expenses in a single SQLite table.
//!
//! Layout:
//! - `models.rs`: Rust struct mirroring the table row
//! - `schema.rs`: SQL DDL applied when the backend starts
//! - `actor.rs`: the actor owning the connection pool, plus its `RecordStore` handle

pub mod actor;
pub mod models;
pub mod schema;

pub use models::DbExpense;
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, spawn};
