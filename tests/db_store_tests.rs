use spendbook::RecordStore;
use spendbook::error::ErrorKind;
use spendbook_schema::ExpenseInput;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_sqlite_path(prefix: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "spendbook-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

async fn spawn_store(prefix: &str) -> (spendbook::db::DbActorHandle, std::path::PathBuf) {
    let path = unique_sqlite_path(prefix);
    let database_url = format!("sqlite:{}", path.display());
    let store = spendbook::db::spawn(&database_url)
        .await
        .expect("spawn sqlite store");
    (store, path)
}

#[tokio::test]
async fn sqlite_store_create_get_update_delete() {
    let (store, path) = spawn_store("crud").await;

    // Fresh database lists nothing.
    assert!(store.list_all().await.expect("list_all").is_empty());

    let created = store
        .create(ExpenseInput::new("Coffee", -3.5, "food"))
        .await
        .expect("create");
    assert_eq!(created.id.len(), 36, "id should be a hyphenated uuid");
    assert_eq!(created.title, "Coffee");
    assert_eq!(created.created_at.timestamp_subsec_nanos() % 1_000, 0);

    let fetched = store.get_by_id(&created.id).await.expect("get_by_id");
    assert_eq!(fetched, created);

    let updated = store
        .update(&created.id, ExpenseInput::new("Espresso", -4.0, "drinks"))
        .await
        .expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "Espresso");
    assert_eq!(updated.amount, -4.0);
    assert_eq!(updated.category, "drinks");
    assert_eq!(store.get_by_id(&created.id).await.expect("get"), updated);

    assert!(store.delete(&created.id).await.expect("delete"));
    assert!(!store.delete(&created.id).await.expect("second delete"));

    let err = store.get_by_id(&created.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn sqlite_store_reports_unknown_ids_as_not_found() {
    let (store, path) = spawn_store("not-found").await;

    let err = store.get_by_id("nonexistent").await.unwrap_err();
    assert!(err.is_not_found());

    let err = store
        .update("nonexistent", ExpenseInput::new("x", 1.0, "y"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert!(!store.delete("nonexistent").await.expect("delete"));
    assert!(store.list_all().await.expect("list_all").is_empty());

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn sqlite_store_lists_newest_first_and_filters_by_exact_category() {
    let (store, path) = spawn_store("listing").await;

    let first = store
        .create(ExpenseInput::new("Groceries", -50.0, "food"))
        .await
        .expect("create");
    let second = store
        .create(ExpenseInput::new("Salary", 100.0, "income"))
        .await
        .expect("create");
    let third = store
        .create(ExpenseInput::new("Dinner", -20.0, "food"))
        .await
        .expect("create");

    let all = store.list_all().await.expect("list_all");
    let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);

    let food = store.list_by_category("food").await.expect("by category");
    let ids: Vec<&str> = food.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![third.id.as_str(), first.id.as_str()]);

    assert!(store.list_by_category("Food").await.expect("by category").is_empty());
    assert!(store.list_by_category("travel").await.expect("by category").is_empty());

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn sqlite_store_summarizes_live_records() {
    let (store, path) = spawn_store("summary").await;

    let empty = store.summarize().await.expect("summarize");
    assert_eq!(empty.total_transactions, 0);
    assert!(empty.categories.is_empty());

    store
        .create(ExpenseInput::new("Groceries", -50.0, "food"))
        .await
        .expect("create");
    store
        .create(ExpenseInput::new("Salary", 100.0, "income"))
        .await
        .expect("create");
    store
        .create(ExpenseInput::new("Dinner", -20.0, "food"))
        .await
        .expect("create");
    let refund = store
        .create(ExpenseInput::new("Refund", 0.0, "misc"))
        .await
        .expect("create");

    let summary = store.summarize().await.expect("summarize");
    assert_eq!(summary.total_expenses, 70.0);
    assert_eq!(summary.total_income, 100.0);
    assert_eq!(summary.net_balance, 30.0);
    assert_eq!(summary.total_transactions, 4);
    assert_eq!(summary.categories.get("food"), Some(&-70.0));
    assert_eq!(summary.categories.get("income"), Some(&100.0));
    assert_eq!(summary.categories.get("misc"), Some(&0.0));

    assert!(store.delete(&refund.id).await.expect("delete"));
    assert_eq!(store.summarize().await.expect("summarize").total_transactions, 3);

    let _ = tokio::fs::remove_file(&path).await;
}
