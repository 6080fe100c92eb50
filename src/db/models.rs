use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendbook_schema::Expense;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbExpense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbExpense> for Expense {
    fn from(row: DbExpense) -> Self {
        Expense {
            id: row.id,
            title: row.title,
            amount: row.amount,
            category: row.category,
            created_at: row.created_at,
        }
    }
}
