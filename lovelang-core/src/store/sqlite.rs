//! SQLite-backed session repository

use super::SessionRepository;
use crate::error::{Error, Result};
use crate::session::{SessionSnapshot, SNAPSHOT_KEY};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Summary of the stored snapshot without parsing its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSnapshotInfo {
    pub name: String,
    pub saved_at: DateTime<Utc>,
}

/// Session store with a single connection.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open or create a store at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        super::schema::run_migrations(&conn)?;

        tracing::debug!(path = %path.display(), "Opened session store");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("session store lock poisoned".to_string()))
    }

    /// Name and save time of the stored snapshot, if any.
    pub fn info(&self) -> Result<Option<StoredSnapshotInfo>> {
        let conn = self.connection()?;
        let row = conn
            .query_row(
                "SELECT name, saved_at FROM session_snapshots WHERE key = ?",
                [SNAPSHOT_KEY],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        row.map(|(name, saved_at)| {
            let saved_at = DateTime::parse_from_rfc3339(&saved_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Storage(format!("bad saved_at {:?}: {}", saved_at, e)))?;
            Ok(StoredSnapshotInfo { name, saved_at })
        })
        .transpose()
    }

    /// Store raw payload text under the snapshot key (for repair tooling and tests).
    pub fn save_raw(&self, name: &str, payload: &str, saved_at: DateTime<Utc>) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            r#"
            INSERT INTO session_snapshots (key, name, payload, saved_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                name = excluded.name,
                payload = excluded.payload,
                saved_at = excluded.saved_at
            "#,
            params![SNAPSHOT_KEY, name, payload, saved_at.to_rfc3339()],
        )?;
        Ok(())
    }
}

impl SessionRepository for SqliteSessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let payload = snapshot.to_json()?;
        self.save_raw(&snapshot.name, &payload, snapshot.timestamp)?;
        tracing::trace!(
            position = snapshot.current_question_index,
            "Saved session snapshot"
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        let conn = self.connection()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM session_snapshots WHERE key = ?",
                [SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        payload
            .map(|json| SessionSnapshot::from_json(&json))
            .transpose()
    }

    fn clear(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM session_snapshots WHERE key = ?",
            [SNAPSHOT_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::types::AnswerSet;
    use tempfile::TempDir;

    fn snapshot(position: usize) -> SessionSnapshot {
        let questions = QuestionBank::bundled().unwrap().into_questions();
        let mut answers = AnswerSet::new(questions.len());
        for i in 0..position {
            answers.record(i, 0);
        }
        SessionSnapshot {
            name: "Auto-save".to_string(),
            timestamp: Utc::now(),
            current_question_index: position,
            answers,
            questions,
        }
    }

    #[test]
    fn test_save_overwrites_single_slot() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        store.save(&snapshot(1)).unwrap();
        store.save(&snapshot(3)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.current_question_index, 3);

        let count: i64 = store
            .connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM session_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_clear() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        store.save(&snapshot(2)).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.info().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_info() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let snap = snapshot(2);
        store.save(&snap).unwrap();

        let info = store.info().unwrap().unwrap();
        assert_eq!(info.name, "Auto-save");
        assert_eq!(info.saved_at.timestamp(), snap.timestamp.timestamp());
    }

    #[test]
    fn test_corrupt_payload_is_error() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        store.save_raw("broken", "{", Utc::now()).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/sessions.db");

        let snap = snapshot(4);
        {
            let store = SqliteSessionStore::open(&path).unwrap();
            store.save(&snap).unwrap();
        }

        let store = SqliteSessionStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), Some(snap));
    }
}
