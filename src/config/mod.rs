//! Persistent settings backed by SQLite.
//!
//! Shares a database with [`AuthStorage`](crate::auth::AuthStorage) — pass
//! the same path to both. Currently the only setting is the default model.

use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::Result;

const MODEL_KEY: &str = "model";

/// Key-value settings store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// The persisted default model, if one was set.
    pub fn model(&self) -> Result<Option<String>> {
        self.get(MODEL_KEY)
    }

    /// Persist the default model.
    pub fn set_model(&self, model: &str) -> Result<()> {
        self.set(MODEL_KEY, model)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_defaults_to_none() {
        let config = Config::open(":memory:").unwrap();
        assert!(config.model().unwrap().is_none());
    }

    #[test]
    fn set_and_read_model() {
        let config = Config::open(":memory:").unwrap();
        config.set_model("claude-sonnet-4-20250514").unwrap();
        assert_eq!(
            config.model().unwrap().unwrap(),
            "claude-sonnet-4-20250514"
        );
    }

    #[test]
    fn setting_model_again_overwrites() {
        let config = Config::open(":memory:").unwrap();
        config.set_model("old-model").unwrap();
        config.set_model("new-model").unwrap();
        assert_eq!(config.model().unwrap().unwrap(), "new-model");
    }

    #[test]
    fn model_persists_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set_model("persisted-model").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.model().unwrap().unwrap(), "persisted-model");
        }
    }
}
