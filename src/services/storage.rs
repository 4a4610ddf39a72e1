use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// One question/answer exchange stored for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatRecord {
    pub fn new(user_id: &str, message: &str, response: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            response: response.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only chat history keyed by user id.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn append(&self, record: &ChatRecord) -> Result<()>;

    /// Latest records for the user, newest first.
    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<ChatRecord>>;
}

/// Chat history kept in SQLite
pub struct SQLiteStorage {
    conn: Mutex<Connection>,
}

// Fixed-width UTC text so that ORDER BY timestamp is chronological.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl SQLiteStorage {
    /// Opens the database, creating it and its schema if needed
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = db_path.unwrap_or_else(|| {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".config/heritago/chat.db")
        });

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        log::info!("📦 SQLite DB opened: {}", db_path.display());

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS chat_history (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                message TEXT NOT NULL,
                response TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_chat_history_user
             ON chat_history(user_id, timestamp)",
            [],
        )?;

        log::info!("✓ DB schema ready");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("chat history connection poisoned"))
    }
}

#[async_trait]
impl ChatStore for SQLiteStorage {
    async fn append(&self, record: &ChatRecord) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO chat_history (id, user_id, message, response, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &record.id,
                &record.user_id,
                &record.message,
                &record.response,
                format_timestamp(&record.timestamp),
            ],
        )?;

        log::debug!(
            "💾 Saved chat record {} for user {}",
            record.id,
            record.user_id
        );
        Ok(())
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<ChatRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, message, response, timestamp
             FROM chat_history
             WHERE user_id = ?1
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?2",
        )?;

        // SQLite reads a negative LIMIT as unbounded, so saturate instead of wrapping.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (id, user_id, message, response, timestamp) = row?;
            result.push(ChatRecord {
                id,
                user_id,
                message,
                response,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc),
            });
        }

        log::debug!("📖 Loaded {} records for user {}", result.len(), user_id);
        Ok(result)
    }
}
