use crate::error::SpendbookError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use spendbook_schema::ExpenseInput;
use tracing::debug;

/// Request body of create and update, rejected with 422 when it cannot be stored.
pub struct ValidExpenseInput(pub ExpenseInput);

impl<S> FromRequest<S> for ValidExpenseInput
where
    S: Send + Sync,
{
    type Rejection = SpendbookError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(input) = Json::<ExpenseInput>::from_request(req, &()).await?;

        if let Err(violation) = input.validate() {
            debug!(%violation, "expense input rejected");
            return Err(SpendbookError::Validation(violation.to_string()));
        }

        Ok(Self(input))
    }
}
