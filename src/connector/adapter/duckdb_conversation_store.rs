use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ConversationStore;
use crate::config::is_valid_table_name;
use crate::domain::{ConversationTurn, DomainError};

/// Conversation turns in a DuckDB table keyed by `(user_key, date_time)`.
///
/// All access goes through one connection behind a mutex, so appends from
/// concurrent invocations in this process are serialized.
pub struct DuckdbConversationStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

impl DuckdbConversationStore {
    pub fn new(db_path: &Path, table: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::internal(format!("Failed to open DuckDB database: {}", e)))?;
        Self::with_connection(Arc::new(Mutex::new(conn)), table)
    }

    pub fn in_memory(table: &str) -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::internal(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::with_connection(Arc::new(Mutex::new(conn)), table)
    }

    /// Create a store on an existing connection, creating the table if needed.
    pub fn with_connection(conn: Arc<Mutex<Connection>>, table: &str) -> Result<Self, DomainError> {
        if !is_valid_table_name(table) {
            return Err(DomainError::config(format!("Invalid table name: {}", table)));
        }

        {
            let guard = conn.try_lock().map_err(|_| {
                DomainError::internal("DuckDB connection is busy during initialization")
            })?;
            Self::initialize_schema(&guard, table)?;
        }

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    fn initialize_schema(conn: &Connection, table: &str) -> Result<(), DomainError> {
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                user_key TEXT NOT NULL,
                date_time TEXT NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                PRIMARY KEY (user_key, date_time)
            );
            "#
        ))
        .map_err(|e| DomainError::internal(format!("Failed to initialize schema: {}", e)))?;

        debug!("DuckDB conversation table \"{}\" initialized", table);
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for DuckdbConversationStore {
    async fn read(&self, user_key: &str) -> Result<Vec<ConversationTurn>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                r#"SELECT user_key, date_time, question, answer FROM "{}"
                   WHERE user_key = ? ORDER BY date_time"#,
                self.table
            ))
            .map_err(|e| {
                DomainError::history_unavailable(format!("Failed to prepare statement: {}", e))
            })?;

        let rows = stmt
            .query_map(params![user_key], |row| {
                Ok(ConversationTurn::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| DomainError::history_unavailable(format!("Failed to query turns: {}", e)))?;

        let mut turns = Vec::new();
        for row in rows {
            turns.push(
                row.map_err(|e| DomainError::history_unavailable(format!("Failed to read row: {}", e)))?,
            );
        }

        debug!("Read {} turns for {} from DuckDB", turns.len(), user_key);
        Ok(turns)
    }

    async fn append(&self, turn: &ConversationTurn) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!(
                r#"INSERT INTO "{}" (user_key, date_time, question, answer) VALUES (?, ?, ?, ?)"#,
                self.table
            ),
            params![turn.user_key(), turn.date_time(), turn.question(), turn.answer()],
        )
        .map_err(|e| DomainError::persist_failed(format!("Failed to insert turn: {}", e)))?;

        debug!("Appended turn {} for {}", turn.date_time(), turn.user_key());
        Ok(())
    }
}
