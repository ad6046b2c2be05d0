//! Preset storage - named raw snapshots
//!
//! Stores hold raw snapshots. Every read goes back through
//! [`normalize`](crate::snapshot::normalize) before it reaches the
//! comparison context, so a store never has to validate what it returns.

mod json_file;

pub use json_file::{JsonFileStore, STORE_VERSION};

use crate::snapshot::RawSnapshot;
use log::info;
use std::collections::BTreeMap;
use thiserror::Error;

/// Preset storage error
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access preset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode presets: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No preset named '{0}'")]
    NotFound(String),
    #[error("A preset named '{0}' already exists")]
    AlreadyExists(String),
    #[error("Preset name must not be empty")]
    EmptyName,
}

/// Persistence collaborator for named snapshots
pub trait PresetStore {
    /// Stored snapshot, or `None` when no preset has that name
    fn load(&self, name: &str) -> Result<Option<RawSnapshot>, StorageError>;

    /// Insert or overwrite a preset
    fn save(&mut self, name: &str, snapshot: RawSnapshot) -> Result<(), StorageError>;

    /// Preset names, sorted
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Remove a preset. Deleting a missing name is a no-op.
    fn delete(&mut self, name: &str) -> Result<(), StorageError>;

    /// Move a preset to a new name. Fails if the old name is missing or the
    /// new name is taken by another preset.
    fn rename(&mut self, old: &str, new: &str) -> Result<(), StorageError>;

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.load(name)?.is_some())
    }
}

/// Trim a user-supplied preset name, rejecting blank names
pub fn clean_name(name: &str) -> Result<&str, StorageError> {
    let name = name.trim();
    if name.is_empty() {
        Err(StorageError::EmptyName)
    } else {
        Ok(name)
    }
}

/// Rename inside a map, shared by the store implementations
fn rename_entry(
    presets: &mut BTreeMap<String, RawSnapshot>,
    old: &str,
    new: &str,
) -> Result<(), StorageError> {
    let new = clean_name(new)?;
    if old == new {
        return if presets.contains_key(old) {
            Ok(())
        } else {
            Err(StorageError::NotFound(old.to_string()))
        };
    }
    if presets.contains_key(new) {
        return Err(StorageError::AlreadyExists(new.to_string()));
    }
    let snapshot = presets
        .remove(old)
        .ok_or_else(|| StorageError::NotFound(old.to_string()))?;
    presets.insert(new.to_string(), snapshot);
    info!("renamed preset '{}' to '{}'", old, new);
    Ok(())
}

/// In-memory store, for tests and sessions without a preset file
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    presets: BTreeMap<String, RawSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl PresetStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<RawSnapshot>, StorageError> {
        Ok(self.presets.get(name).cloned())
    }

    fn save(&mut self, name: &str, snapshot: RawSnapshot) -> Result<(), StorageError> {
        let name = clean_name(name)?;
        self.presets.insert(name.to_string(), snapshot);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.presets.keys().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.presets.remove(name);
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str) -> Result<(), StorageError> {
        rename_entry(&mut self.presets, old, new)
    }

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.presets.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_basic() {
        let mut store = MemoryStore::new();
        store.save("b", json!({ "baseAtk": 1 })).unwrap();
        store.save("a", json!({ "baseAtk": 2 })).unwrap();
        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
        assert_eq!(store.load("a").unwrap(), Some(json!({ "baseAtk": 2 })));
        assert_eq!(store.load("missing").unwrap(), None);
    }

    #[test]
    fn test_save_trims_and_rejects_blank_names() {
        let mut store = MemoryStore::new();
        store.save("  boss  ", json!({})).unwrap();
        assert!(store.contains("boss").unwrap());
        assert!(matches!(store.save("   ", json!({})), Err(StorageError::EmptyName)));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = MemoryStore::new();
        store.delete("ghost").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_rename() {
        let mut store = MemoryStore::new();
        store.save("old", json!({ "skillPct": 250 })).unwrap();
        store.save("taken", json!({})).unwrap();

        assert!(matches!(
            store.rename("old", "taken"),
            Err(StorageError::AlreadyExists(_))
        ));
        assert!(matches!(
            store.rename("nope", "fresh"),
            Err(StorageError::NotFound(_))
        ));

        store.rename("old", "new").unwrap();
        assert!(!store.contains("old").unwrap());
        assert_eq!(store.load("new").unwrap(), Some(json!({ "skillPct": 250 })));
        store.rename("new", "new").unwrap();
        assert_eq!(store.len(), 2);
    }
}
