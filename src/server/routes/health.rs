use crate::server::router::AppState;
use axum::{Json, extract::State};
use spendbook_schema::{HealthResponse, MessageResponse, timestamp};

pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Expense Tracker API is running!"))
}

/// Liveness only; the backend is not contacted.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: timestamp::now(),
        backend: state.store.backend().to_string(),
    })
}
