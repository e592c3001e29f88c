//! String key/value storage
//!
//! The persistence surface every other store writes through. Values are
//! opaque strings; JSON helpers sit on top for structured entries.

use std::path::Path;

use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{database::Database, unix_timestamp};

/// Key/value store backed by the `local_storage` table
pub struct LocalStorage {
    db: Database,
}

impl LocalStorage {
    /// Wrap an open database
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path` and wrap it
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::new(path)?))
    }

    /// Get reference to underlying database
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get a value. Only a missing row reads as `None`; query failures are errors.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .conn()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Set a value, replacing any previous one
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.conn().execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, unix_timestamp() as i64],
        )?;
        tracing::debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    /// Remove a value; absent keys are fine
    pub fn remove(&self, key: &str) -> Result<()> {
        self.db
            .conn()
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Whether a value exists for `key`
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Decode a JSON value. Absent or malformed entries read as `None`;
    /// malformed ones are logged. Storage failures are returned.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring malformed '{}' entry: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Encode a value as JSON and store it
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }

    /// All stored keys, most recently written first
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT key FROM local_storage ORDER BY updated_at DESC, key")?;
        let keys = stmt.query_map([], |row| row.get(0))?;
        keys.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    use super::LocalStorage;

    fn create_test_storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage =
            LocalStorage::open(&temp_dir.path().join("test.db")).expect("Failed to open storage");
        (storage, temp_dir)
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_get_set_remove() {
        let (storage, _temp) = create_test_storage();

        assert_eq!(storage.get("current_plan").unwrap(), None);
        storage.set("current_plan", "OMQ Plus").unwrap();
        assert_eq!(storage.get("current_plan").unwrap().as_deref(), Some("OMQ Plus"));

        storage.set("current_plan", "OMQ Premium").unwrap();
        assert_eq!(storage.get("current_plan").unwrap().as_deref(), Some("OMQ Premium"));

        storage.remove("current_plan").unwrap();
        assert!(!storage.contains("current_plan").unwrap());

        // Removing twice is fine
        storage.remove("current_plan").unwrap();
    }

    #[test]
    fn test_json_round_trip() {
        let (storage, _temp) = create_test_storage();
        let value = Sample {
            name: "menu".to_string(),
            count: 3,
        };

        storage.set_json("sample", &value).unwrap();
        assert_eq!(storage.get_json::<Sample>("sample").unwrap(), Some(value));
    }

    #[test]
    fn test_malformed_json_reads_as_none() {
        let (storage, _temp) = create_test_storage();
        storage.set("sample", "{not json").unwrap();

        assert_eq!(storage.get_json::<Sample>("sample").unwrap(), None);
        // The raw value is left alone
        assert_eq!(storage.get("sample").unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("test.db");

        {
            let storage = LocalStorage::open(&path).unwrap();
            storage.set("auth_token", "t-1").unwrap();
        }

        let storage = LocalStorage::open(&path).unwrap();
        assert_eq!(storage.get("auth_token").unwrap().as_deref(), Some("t-1"));
        assert_eq!(storage.keys().unwrap(), vec!["auth_token".to_string()]);
    }

    #[test]
    fn test_query_failure_is_not_absence() {
        let (storage, _temp) = create_test_storage();
        storage.set("dishes", "[]").unwrap();
        storage
            .db()
            .conn()
            .execute_batch("ALTER TABLE local_storage RENAME TO local_storage_moved")
            .unwrap();

        assert!(storage.get("dishes").is_err());
        assert!(storage.contains("dishes").is_err());
        assert!(storage.get_json::<Vec<String>>("dishes").is_err());
    }
}
