//! Mapping between records and spreadsheet rows.

use crate::error::SpendbookError;
use serde_json::Value;
use spendbook_schema::{Expense, timestamp};

pub const HEADER: [&str; 5] = ["ID", "Title", "Amount", "Category", "Created At"];

/// Index of the `Created At` column within a row.
pub const CREATED_AT_COLUMN: usize = 4;

/// A1 notation for `cells` on `sheet`, e.g. `'Expenses'!A2:E`.
pub fn a1_range(sheet: &str, cells: &str) -> String {
    format!("'{}'!{cells}", sheet.replace('\'', "''"))
}

/// A1 notation for the full record span of a single 1-based row.
pub fn row_span(row: usize) -> String {
    format!("A{row}:E{row}")
}

pub fn header_row() -> Vec<Value> {
    HEADER.iter().map(|h| Value::from(*h)).collect()
}

/// True only for a row that is exactly [`HEADER`], cell for cell.
pub fn header_matches(row: &[Value]) -> bool {
    row.len() == HEADER.len()
        && HEADER
            .iter()
            .zip(row)
            .all(|(expected, cell)| cell.as_str() == Some(*expected))
}

pub fn encode_row(expense: &Expense) -> Vec<Value> {
    vec![
        Value::from(expense.id.as_str()),
        Value::from(expense.title.as_str()),
        Value::from(expense.amount),
        Value::from(expense.category.as_str()),
        Value::from(timestamp::format(&expense.created_at)),
    ]
}

/// Text content of a cell as the sheet would display it.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decodes row `row` (1-based sheet row number).
///
/// Rows with fewer than five cells are not records and yield `None`.
pub fn decode_row(row: usize, cells: &[Value]) -> Result<Option<Expense>, SpendbookError> {
    if cells.len() < HEADER.len() {
        return Ok(None);
    }

    let amount = parse_amount(row, &cells[2])?;
    let created_at = parse_created_at(row, &cells[CREATED_AT_COLUMN])?;

    Ok(Some(Expense {
        id: cell_text(&cells[0]),
        title: cell_text(&cells[1]),
        amount,
        category: cell_text(&cells[3]),
        created_at,
    }))
}

pub fn parse_created_at(
    row: usize,
    cell: &Value,
) -> Result<chrono::DateTime<chrono::Utc>, SpendbookError> {
    let raw = cell_text(cell);
    timestamp::parse(raw.trim()).map_err(|e| SpendbookError::MalformedRow {
        row,
        reason: format!("created_at {raw:?}: {e}"),
    })
}

fn parse_amount(row: usize, cell: &Value) -> Result<f64, SpendbookError> {
    let malformed = |reason: String| SpendbookError::MalformedRow { row, reason };

    match cell {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| malformed(format!("amount {n} is not representable"))),
        Value::Null => Ok(0.0),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| malformed(format!("amount {s:?} is not a number"))),
        other => Err(malformed(format!("amount {other} is not a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn a1_range_quotes_sheet_names() {
        assert_eq!(a1_range("Expenses", "A2:E"), "'Expenses'!A2:E");
        assert_eq!(a1_range("Bob's sheet", "A:A"), "'Bob''s sheet'!A:A");
    }

    #[test]
    fn header_must_match_exactly() {
        assert!(header_matches(&header_row()));

        let padded = vec![
            json!("ID"),
            json!(" Title"),
            json!("Amount"),
            json!("Category "),
            json!("Created At"),
        ];
        assert!(!header_matches(&padded));

        let lowercase = vec![
            json!("id"),
            json!("Title"),
            json!("Amount"),
            json!("Category"),
            json!("Created At"),
        ];
        assert!(!header_matches(&lowercase));

        let mut extra = header_row();
        extra.push(json!("Notes"));
        assert!(!header_matches(&extra));
        assert!(!header_matches(&extra[..4]));
    }

    #[test]
    fn decodes_numeric_and_text_amounts() {
        let row = vec![
            json!("a1"),
            json!("Lunch"),
            json!(-12.5),
            json!("food"),
            json!("2024-03-01T12:00:00.000000Z"),
        ];
        let expense = decode_row(2, &row).unwrap().unwrap();
        assert_eq!(expense.amount, -12.5);
        assert_eq!(expense.category, "food");

        let mut text_amount = row.clone();
        text_amount[2] = json!("40");
        assert_eq!(decode_row(2, &text_amount).unwrap().unwrap().amount, 40.0);

        let mut empty_amount = row;
        empty_amount[2] = json!("");
        assert_eq!(decode_row(2, &empty_amount).unwrap().unwrap().amount, 0.0);
    }

    #[test]
    fn short_rows_are_not_records() {
        let row = vec![json!("a1"), json!("Lunch"), json!(3)];
        assert!(decode_row(7, &row).unwrap().is_none());
    }

    #[test]
    fn non_numeric_amount_is_reported_with_row() {
        let row = vec![
            json!("a1"),
            json!("Lunch"),
            json!("twelve"),
            json!("food"),
            json!("2024-03-01T12:00:00Z"),
        ];
        match decode_row(9, &row) {
            Err(SpendbookError::MalformedRow { row, .. }) => assert_eq!(row, 9),
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn encoded_row_keeps_amount_numeric() {
        let created_at = timestamp::parse("2024-03-01T12:00:00.123456Z").unwrap();
        let expense = Expense {
            id: "x".into(),
            title: "Salary".into(),
            amount: 100.0,
            category: "income".into(),
            created_at,
        };
        let row = encode_row(&expense);
        assert!(row[2].is_number());
        assert_eq!(row[4], json!("2024-03-01T12:00:00.123456Z"));
    }
}
