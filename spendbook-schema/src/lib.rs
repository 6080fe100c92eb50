pub mod expense;
pub mod responses;
pub mod summary;
pub mod timestamp;

pub use expense::{Expense, ExpenseInput, InputViolation};
pub use responses::{HealthResponse, MessageResponse};
pub use summary::ExpenseSummary;
