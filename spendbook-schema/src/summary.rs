use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate totals over every stored entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExpenseSummary {
    /// Absolute value of the sum of all negative amounts.
    pub total_expenses: f64,
    /// Sum of all positive amounts.
    pub total_income: f64,
    pub net_balance: f64,
    pub total_transactions: usize,
    /// Signed sum of amounts per category.
    pub categories: BTreeMap<String, f64>,
}
