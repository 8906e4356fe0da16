use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{named_params, Connection, Row};
use thiserror::Error;
use ulid::Ulid;

use crate::config::AppConfig;
use crate::model::Task;

/// Failures surfaced by a task store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("no stored task with id '{0}'")]
    MissingRow(String),
    #[error("{0}")]
    Unavailable(String),
}

/// Persistence seam for the task collection.
///
/// Methods take `&self` so implementations are free to use interior
/// mutability. `replace_fields` rewrites every mutable column, the
/// completion flag included. `remove` is idempotent: deleting an id that is
/// already gone succeeds. The other mutating calls report `MissingRow` when
/// no row matched.
pub trait TaskStore {
    fn list_all(&self) -> Result<Vec<Task>, StoreError>;
    fn create(&self, text: &str, deadline: &str) -> Result<Task, StoreError>;
    fn set_completed(&self, id: &str, completed: bool) -> Result<(), StoreError>;
    fn replace_fields(
        &self,
        id: &str,
        text: &str,
        deadline: &str,
        completed: bool,
    ) -> Result<(), StoreError>;
    fn remove(&self, id: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(config: &AppConfig) -> Result<Self> {
        let conn = Connection::open(config.db_path()).with_context(|| {
            format!("Failed to open database at {}", config.db_path().display())
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to configure SQLite WAL mode")?;

        let store = Self { conn };
        store.apply_migrations()?;
        Ok(store)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                deadline TEXT NOT NULL,
                created_at TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);
            ",
        )?;
        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get(2)?,
        deadline: row.get(3)?,
    })
}

impl TaskStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, completed, deadline FROM tasks ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], map_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn create(&self, text: &str, deadline: &str) -> Result<Task, StoreError> {
        let id = Ulid::new().to_string();
        self.conn.execute(
            "INSERT INTO tasks (id, text, completed, deadline, created_at)
             VALUES (:id, :text, 0, :deadline, :created_at)",
            named_params![
                ":id": &id,
                ":text": text,
                ":deadline": deadline,
                ":created_at": Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(Task {
            id,
            text: text.to_string(),
            completed: false,
            deadline: deadline.to_string(),
        })
    }

    fn set_completed(&self, id: &str, completed: bool) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            "UPDATE tasks SET completed = :completed WHERE id = :id",
            named_params![":completed": completed, ":id": id],
        )?;
        if affected == 0 {
            return Err(StoreError::MissingRow(id.to_string()));
        }
        Ok(())
    }

    fn replace_fields(
        &self,
        id: &str,
        text: &str,
        deadline: &str,
        completed: bool,
    ) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            "UPDATE tasks SET text = :text, deadline = :deadline, completed = :completed
             WHERE id = :id",
            named_params![
                ":text": text,
                ":deadline": deadline,
                ":completed": completed,
                ":id": id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::MissingRow(id.to_string()));
        }
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = :id", named_params![":id": id])?;
        Ok(())
    }
}
