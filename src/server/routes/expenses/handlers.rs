use super::extract::ValidExpenseInput;
use crate::error::SpendbookError;
use crate::server::router::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use spendbook_schema::{Expense, ExpenseSummary, MessageResponse};
use tracing::info;

pub async fn create_expense(
    State(state): State<AppState>,
    ValidExpenseInput(input): ValidExpenseInput,
) -> Result<Json<Expense>, SpendbookError> {
    let expense = state.store.create(input).await?;
    info!(id = %expense.id, category = %expense.category, "expense created");
    Ok(Json(expense))
}

pub async fn list_expenses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Expense>>, SpendbookError> {
    Ok(Json(state.store.list_all().await?))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, SpendbookError> {
    Ok(Json(state.store.get_by_id(&id).await?))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidExpenseInput(input): ValidExpenseInput,
) -> Result<Json<Expense>, SpendbookError> {
    let expense = state.store.update(&id, input).await?;
    info!(id = %expense.id, "expense updated");
    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, SpendbookError> {
    if !state.store.delete(&id).await? {
        return Err(SpendbookError::not_found(id));
    }
    info!(id = %id, "expense deleted");
    Ok(Json(MessageResponse::new("Expense deleted successfully")))
}

pub async fn list_expenses_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Expense>>, SpendbookError> {
    Ok(Json(state.store.list_by_category(&category).await?))
}

pub async fn expense_summary(
    State(state): State<AppState>,
) -> Result<Json<ExpenseSummary>, SpendbookError> {
    Ok(Json(state.store.summarize().await?))
}
