use super::client::SheetsClient;
use super::grid::{self, CREATED_AT_COLUMN};
use crate::config::StorageBackend;
use crate::error::SpendbookError;
use crate::store::{RecordStore, new_record_id};
use async_trait::async_trait;
use serde_json::Value;
use spendbook_schema::{Expense, ExpenseInput, timestamp};
use tracing::{debug, info, warn};

/// Record store over a single spreadsheet tab.
///
/// Every operation goes to the API; nothing is cached besides the tab's sheet id.
/// Two concurrent creates can both pick the same "next row" and one write will
/// land on top of the other. Records are located by scanning column A, so the
/// row a record lives on is only valid until the next delete.
pub struct SheetsStore {
    client: SheetsClient,
    sheet_name: String,
    sheet_id: i64,
}

struct LocatedRow {
    /// 1-based sheet row number.
    row: usize,
    cells: Vec<Value>,
}

impl SheetsStore {
    /// Binds to `sheet_name`, creating the tab and writing the header row when missing.
    pub async fn connect(client: SheetsClient, sheet_name: &str) -> Result<Self, SpendbookError> {
        let sheet_id = ensure_sheet(&client, sheet_name).await?;
        let store = Self {
            client,
            sheet_name: sheet_name.to_string(),
            sheet_id,
        };
        store.ensure_header().await?;
        Ok(store)
    }

    fn range(&self, cells: &str) -> String {
        grid::a1_range(&self.sheet_name, cells)
    }

    async fn ensure_header(&self) -> Result<(), SpendbookError> {
        let range = self.range(&grid::row_span(1));
        let rows = self.client.get_values(&range).await?;
        if rows.first().is_some_and(|row| grid::header_matches(row)) {
            debug!(sheet = %self.sheet_name, "header row present");
            return Ok(());
        }

        warn!(sheet = %self.sheet_name, "header row missing or wrong, rewriting");
        self.client
            .update_values(&range, vec![grid::header_row()])
            .await
    }

    /// First row after the last non-empty cell of column A, never the header row.
    async fn next_free_row(&self) -> Result<usize, SpendbookError> {
        let ids = self.client.get_values(&self.range("A:A")).await?;
        Ok((ids.len() + 1).max(2))
    }

    async fn locate(&self, id: &str) -> Result<Option<LocatedRow>, SpendbookError> {
        let rows = self.client.get_values(&self.range("A:E")).await?;
        let found = rows
            .into_iter()
            .enumerate()
            .skip(1)
            .find(|(_, cells)| cells.first().is_some_and(|c| grid::cell_text(c) == id))
            .map(|(idx, cells)| LocatedRow {
                row: idx + 1,
                cells,
            });
        Ok(found)
    }

    async fn read_records(&self) -> Result<Vec<Expense>, SpendbookError> {
        let rows = self.client.get_values(&self.range("A2:E")).await?;
        let mut records = Vec::with_capacity(rows.len());
        for (idx, cells) in rows.iter().enumerate() {
            let row = idx + 2;
            match grid::decode_row(row, cells)? {
                Some(expense) => records.push(expense),
                None => debug!(row, cells = cells.len(), "skipping incomplete sheet row"),
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

async fn ensure_sheet(client: &SheetsClient, sheet_name: &str) -> Result<i64, SpendbookError> {
    let sheets = client.sheet_properties().await?;
    if let Some(existing) = sheets.iter().find(|s| s.title == sheet_name) {
        debug!(sheet = sheet_name, sheet_id = existing.sheet_id, "sheet found");
        return Ok(existing.sheet_id);
    }

    let sheet_id = client.add_sheet(sheet_name).await?;
    info!(sheet = sheet_name, sheet_id, "sheet created");
    Ok(sheet_id)
}

#[async_trait]
impl RecordStore for SheetsStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sheets
    }

    async fn create(&self, input: ExpenseInput) -> Result<Expense, SpendbookError> {
        let expense = Expense::from_input(new_record_id(), input, timestamp::now());
        let row = self.next_free_row().await?;
        self.client
            .update_values(
                &self.range(&grid::row_span(row)),
                vec![grid::encode_row(&expense)],
            )
            .await?;
        debug!(id = %expense.id, row, "expense appended");
        Ok(expense)
    }

    async fn list_all(&self) -> Result<Vec<Expense>, SpendbookError> {
        self.read_records().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Expense, SpendbookError> {
        let Some(located) = self.locate(id).await? else {
            return Err(SpendbookError::not_found(id));
        };
        grid::decode_row(located.row, &located.cells)?.ok_or_else(|| SpendbookError::not_found(id))
    }

    async fn update(&self, id: &str, input: ExpenseInput) -> Result<Expense, SpendbookError> {
        let Some(LocatedRow { row, cells }) = self.locate(id).await? else {
            return Err(SpendbookError::not_found(id));
        };

        let created_at_cell = cells
            .get(CREATED_AT_COLUMN)
            .cloned()
            .ok_or_else(|| SpendbookError::MalformedRow {
                row,
                reason: "created_at cell is missing".into(),
            })?;
        let created_at = grid::parse_created_at(row, &created_at_cell)?;

        let expense = Expense::from_input(id, input, created_at);
        let mut values = grid::encode_row(&expense);
        values[CREATED_AT_COLUMN] = created_at_cell;

        self.client
            .update_values(&self.range(&grid::row_span(row)), vec![values])
            .await?;
        debug!(id, row, "expense updated");
        Ok(expense)
    }

    async fn delete(&self, id: &str) -> Result<bool, SpendbookError> {
        let Some(located) = self.locate(id).await? else {
            return Ok(false);
        };
        self.client
            .delete_rows(self.sheet_id, located.row, located.row)
            .await?;
        debug!(id, row = located.row, "expense row deleted");
        Ok(true)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Expense>, SpendbookError> {
        let mut records = self.read_records().await?;
        records.retain(|e| e.category == category);
        Ok(records)
    }
}
