use crate::server::router::AppState;
use axum::{Router, routing::get};

pub mod extract;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/summary/stats", get(handlers::expense_summary))
        .route(
            "/expenses/category/{category}",
            get(handlers::list_expenses_by_category),
        )
        .route(
            "/expenses/{id}",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}
