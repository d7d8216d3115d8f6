//! Durable key-value storage for client-local state.
//!
//! Values are JSON. [`FileStore`] keeps every key in one JSON object on disk
//! and rewrites the file on each [`set`](KeyValueStore::set), so the last
//! write wins.

use std::{
    collections::HashMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::{LedgerError, Result};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => parse_entries(&path, &content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(storage_error(&path, err)),
        };
        Ok(Self { path, entries })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| storage_error(&self.path, err))?;
        }
        let payload = serde_json::to_string_pretty(&self.entries)
            .map_err(|err| LedgerError::Storage(err.to_string()))?;
        fs::write(&self.path, payload).map_err(|err| storage_error(&self.path, err))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }
}

// A corrupt file is treated as empty so the client still starts.
fn parse_entries(path: &Path, content: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(entries)) => entries,
        Ok(_) | Err(_) => {
            tracing::warn!("ignoring unreadable state file {}", path.display());
            Map::new()
        }
    }
}

fn storage_error(path: &Path, err: io::Error) -> LedgerError {
    LedgerError::Storage(format!("{}: {err}", path.display()))
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn temp_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_state")
            .join(format!("state_{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_opens_empty() {
        let store = FileStore::open(temp_path()).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let path = temp_path();
        let mut store = FileStore::open(&path).unwrap();
        store.set("ledger_auth", json!({"username": "ameen"})).unwrap();
        store.set("ledger_locked_accounts", json!({"a1": true})).unwrap();
        store.set("ledger_auth", Value::Null).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("ledger_auth"), Some(Value::Null));
        assert_eq!(reopened.get("ledger_locked_accounts"), Some(json!({"a1": true})));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("ledger_auth"), None);
        fs::remove_file(path).unwrap();
    }
}
