use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored expense (negative `amount`) or income (positive `amount`) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields accepted by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub title: String,
    pub amount: f64,
    pub category: String,
}

impl Expense {
    pub fn from_input(
        id: impl Into<String>,
        input: ExpenseInput,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            amount: input.amount,
            category: input.category,
            created_at,
        }
    }

    /// True when the entry counts as an expense. Zero is neither expense nor income.
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputViolation {
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for InputViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

impl ExpenseInput {
    pub fn new(title: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
        }
    }

    /// Checks the rules the HTTP layer enforces before touching storage.
    ///
    /// `title` and `category` are free text; any string, including an empty one,
    /// is accepted.
    pub fn validate(&self) -> Result<(), InputViolation> {
        if !self.amount.is_finite() {
            return Err(InputViolation {
                field: "amount",
                reason: "must be a finite number",
            });
        }
        Ok(())
    }
}
