pub mod router;
pub mod routes;

pub use router::{AppState, spendbook_router};
