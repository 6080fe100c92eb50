use spendbook_schema::{Expense, ExpenseSummary};

/// Folds records into income, expense and per-category totals.
///
/// Negative amounts are expenses, positive amounts are income. Zero amounts count
/// toward `total_transactions` and their category but toward neither total.
pub fn summarize<'a, I>(records: I) -> ExpenseSummary
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut summary = ExpenseSummary::default();
    let mut negative_sum = 0.0_f64;

    for record in records {
        if record.is_expense() {
            negative_sum += record.amount;
        } else if record.is_income() {
            summary.total_income += record.amount;
        }
        *summary
            .categories
            .entry(record.category.clone())
            .or_insert(0.0) += record.amount;
        summary.total_transactions += 1;
    }

    summary.total_expenses = negative_sum.abs();
    summary.net_balance = summary.total_income + negative_sum;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendbook_schema::ExpenseInput;

    fn record(id: &str, amount: f64, category: &str) -> Expense {
        Expense::from_input(
            id,
            ExpenseInput::new(format!("entry {id}"), amount, category),
            spendbook_schema::timestamp::now(),
        )
    }

    #[test]
    fn mixed_records_produce_signed_category_totals() {
        let records = vec![
            record("1", -50.0, "food"),
            record("2", -20.0, "food"),
            record("3", 100.0, "salary"),
            record("4", 0.0, "misc"),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.total_expenses, 70.0);
        assert_eq!(summary.total_income, 100.0);
        assert_eq!(summary.net_balance, 30.0);
        assert_eq!(summary.total_transactions, 4);
        assert_eq!(summary.categories.len(), 3);
        assert_eq!(summary.categories["food"], -70.0);
        assert_eq!(summary.categories["salary"], 100.0);
        assert_eq!(summary.categories["misc"], 0.0);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = summarize(&Vec::<Expense>::new());
        assert_eq!(summary, ExpenseSummary::default());
        assert!(summary.total_expenses.is_sign_positive());
    }

    #[test]
    fn categories_are_case_sensitive() {
        let records = vec![record("1", -5.0, "Food"), record("2", -7.0, "food")];
        let summary = summarize(&records);
        assert_eq!(summary.categories["Food"], -5.0);
        assert_eq!(summary.categories["food"], -7.0);
        assert_eq!(summary.net_balance, -12.0);
    }
}
