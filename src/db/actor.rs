use crate::config::StorageBackend;
use crate::db::models::DbExpense;
use crate::db::schema::SQLITE_INIT;
use crate::error::SpendbookError;
use crate::store::{RecordStore, new_record_id};
use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use spendbook_schema::{Expense, ExpenseInput, timestamp};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub enum DbActorMessage {
    /// Insert a new record and return it with its generated fields.
    Create(ExpenseInput, RpcReplyPort<Result<Expense, SpendbookError>>),

    /// List every record, newest first.
    ListAll(RpcReplyPort<Result<Vec<Expense>, SpendbookError>>),

    /// Get one record by id.
    Get(String, RpcReplyPort<Result<Expense, SpendbookError>>),

    /// Replace the mutable fields of a record.
    Update(
        String,
        ExpenseInput,
        RpcReplyPort<Result<Expense, SpendbookError>>,
    ),

    /// Delete a record; replies whether a row was removed.
    Delete(String, RpcReplyPort<Result<bool, SpendbookError>>),

    /// List records of one category, newest first.
    ListByCategory(String, RpcReplyPort<Result<Vec<Expense>, SpendbookError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

#[async_trait]
impl RecordStore for DbActorHandle {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }

    async fn create(&self, input: ExpenseInput) -> Result<Expense, SpendbookError> {
        ractor::call!(self.actor, DbActorMessage::Create, input)
            .map_err(|e| SpendbookError::RactorError(format!("DbActor Create RPC failed: {e}")))?
    }

    async fn list_all(&self) -> Result<Vec<Expense>, SpendbookError> {
        ractor::call!(self.actor, DbActorMessage::ListAll)
            .map_err(|e| SpendbookError::RactorError(format!("DbActor ListAll RPC failed: {e}")))?
    }

    async fn get_by_id(&self, id: &str) -> Result<Expense, SpendbookError> {
        ractor::call!(self.actor, DbActorMessage::Get, id.to_string())
            .map_err(|e| SpendbookError::RactorError(format!("DbActor Get RPC failed: {e}")))?
    }

    async fn update(&self, id: &str, input: ExpenseInput) -> Result<Expense, SpendbookError> {
        ractor::call!(self.actor, DbActorMessage::Update, id.to_string(), input)
            .map_err(|e| SpendbookError::RactorError(format!("DbActor Update RPC failed: {e}")))?
    }

    async fn delete(&self, id: &str) -> Result<bool, SpendbookError> {
        ractor::call!(self.actor, DbActorMessage::Delete, id.to_string())
            .map_err(|e| SpendbookError::RactorError(format!("DbActor Delete RPC failed: {e}")))?
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Expense>, SpendbookError> {
        ractor::call!(
            self.actor,
            DbActorMessage::ListByCategory,
            category.to_string()
        )
        .map_err(|e| {
            SpendbookError::RactorError(format!("DbActor ListByCategory RPC failed: {e}"))
        })?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::Create(input, reply) => {
                let res = self.create(&state.pool, input).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListAll(reply) => {
                let res = self.list_all(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Get(id, reply) => {
                let res = self.get(&state.pool, &id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Update(id, input, reply) => {
                let res = self.update(&state.pool, &id, input).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Delete(id, reply) => {
                let res = self.delete(&state.pool, &id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListByCategory(category, reply) => {
                let res = self.list_by_category(&state.pool, &category).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create(
        &self,
        pool: &SqlitePool,
        input: ExpenseInput,
    ) -> Result<Expense, SpendbookError> {
        let id = new_record_id();
        let created_at = timestamp::now();

        let row = sqlx::query_as::<_, DbExpense>(
            r#"
        INSERT INTO expenses (id, title, amount, category, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, title, amount, category, created_at
        "#,
        )
        .bind(&id)
        .bind(input.title)
        .bind(input.amount)
        .bind(input.category)
        .bind(timestamp::format(&created_at))
        .fetch_one(pool)
        .await?;

        debug!(id = %row.id, "expense inserted");
        Ok(row.into())
    }

    async fn list_all(&self, pool: &SqlitePool) -> Result<Vec<Expense>, SpendbookError> {
        let rows = sqlx::query_as::<_, DbExpense>(
            r#"
        SELECT id, title, amount, category, created_at
        FROM expenses
        ORDER BY created_at DESC, rowid DESC
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn get(&self, pool: &SqlitePool, id: &str) -> Result<Expense, SpendbookError> {
        let row = sqlx::query_as::<_, DbExpense>(
            r#"
        SELECT id, title, amount, category, created_at
        FROM expenses
        WHERE id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.map(Expense::from)
            .ok_or_else(|| SpendbookError::not_found(id))
    }

    async fn update(
        &self,
        pool: &SqlitePool,
        id: &str,
        input: ExpenseInput,
    ) -> Result<Expense, SpendbookError> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, DbExpense>(
            r#"
        UPDATE expenses
        SET title = ?, amount = ?, category = ?
        WHERE id = ?
        RETURNING id, title, amount, category, created_at
        "#,
        )
        .bind(input.title)
        .bind(input.amount)
        .bind(input.category)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(SpendbookError::not_found(id));
        };

        tx.commit().await?;
        debug!(id = %row.id, "expense updated");
        Ok(row.into())
    }

    async fn delete(&self, pool: &SqlitePool, id: &str) -> Result<bool, SpendbookError> {
        let mut tx = pool.begin().await?;

        let affected = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        debug!(id, "expense deleted");
        Ok(true)
    }

    async fn list_by_category(
        &self,
        pool: &SqlitePool,
        category: &str,
    ) -> Result<Vec<Expense>, SpendbookError> {
        let rows = sqlx::query_as::<_, DbExpense>(
            r#"
        SELECT id, title, amount, category, created_at
        FROM expenses
        WHERE category = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
        )
        .bind(category)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, SpendbookError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| SpendbookError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), SpendbookError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
