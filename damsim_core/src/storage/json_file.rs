//! JSON preset file
//!
//! ```json
//! { "version": 1, "presets": { "boss": { "inputMode": "gear", ... } } }
//! ```
//!
//! Files written before the format was versioned hold the bare preset map;
//! they are migrated in memory on open and rewritten on the next change.

use super::{clean_name, rename_entry, PresetStore, StorageError};
use crate::snapshot::RawSnapshot;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Current preset file format version
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PresetFile {
    version: u32,
    #[serde(default)]
    presets: BTreeMap<String, RawSnapshot>,
}

#[derive(Serialize)]
struct PresetFileRef<'a> {
    version: u32,
    presets: &'a BTreeMap<String, RawSnapshot>,
}

/// Preset store backed by a single JSON file
///
/// The whole file is read on open and rewritten after every change. The
/// in-memory map only changes once the rewrite has succeeded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    presets: BTreeMap<String, RawSnapshot>,
}

impl JsonFileStore {
    /// Open a preset file. A missing file is an empty store; an unreadable
    /// or corrupt one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let presets = match fs::read_to_string(&path) {
            Ok(content) => parse_presets(&path, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(JsonFileStore { path, presets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `presets` to disk, then adopt them
    fn commit(&mut self, presets: BTreeMap<String, RawSnapshot>) -> Result<(), StorageError> {
        let file = PresetFileRef {
            version: STORE_VERSION,
            presets: &presets,
        };
        let content = serde_json::to_string_pretty(&file)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, content)?;
        self.presets = presets;
        Ok(())
    }
}

fn parse_presets(path: &Path, content: &str) -> BTreeMap<String, RawSnapshot> {
    if content.trim().is_empty() {
        return BTreeMap::new();
    }
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            warn!("preset file {} is corrupt ({}), starting empty", path.display(), e);
            return BTreeMap::new();
        }
    };
    let is_versioned = value.get("version").is_some_and(|v| v.is_number());
    if is_versioned {
        match serde_json::from_value::<PresetFile>(value) {
            Ok(file) => {
                if file.version > STORE_VERSION {
                    warn!(
                        "preset file {} has newer version {}, reading anyway",
                        path.display(),
                        file.version
                    );
                }
                file.presets
            }
            Err(e) => {
                warn!("preset file {} is malformed ({}), starting empty", path.display(), e);
                BTreeMap::new()
            }
        }
    } else {
        match value {
            serde_json::Value::Object(map) => {
                info!(
                    "migrating {} unversioned presets from {}",
                    map.len(),
                    path.display()
                );
                map.into_iter().collect()
            }
            _ => {
                warn!("preset file {} is not an object, starting empty", path.display());
                BTreeMap::new()
            }
        }
    }
}

impl PresetStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Option<RawSnapshot>, StorageError> {
        Ok(self.presets.get(name).cloned())
    }

    fn save(&mut self, name: &str, snapshot: RawSnapshot) -> Result<(), StorageError> {
        let name = clean_name(name)?;
        let mut presets = self.presets.clone();
        presets.insert(name.to_string(), snapshot);
        self.commit(presets)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.presets.keys().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        if !self.presets.contains_key(name) {
            return Ok(());
        }
        let mut presets = self.presets.clone();
        presets.remove(name);
        self.commit(presets)
    }

    fn rename(&mut self, old: &str, new: &str) -> Result<(), StorageError> {
        let mut presets = self.presets.clone();
        rename_entry(&mut presets, old, new)?;
        self.commit(presets)
    }

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.presets.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "damsim-store-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonFileStore::open(temp_path("missing")).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_persists_versioned_file() {
        let path = temp_path("persist");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.save("boss", json!({ "enemyDef": 800 })).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["version"], STORE_VERSION);
        assert_eq!(written["presets"]["boss"]["enemyDef"], 800);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.load("boss").unwrap(), Some(json!({ "enemyDef": 800 })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_migrates_unversioned_map() {
        let path = temp_path("legacy");
        fs::write(&path, r#"{ "old": { "baseAtk": 4200 } }"#).unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.list().unwrap(), vec!["old"]);

        store.rename("old", "renamed").unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["version"], STORE_VERSION);
        assert_eq!(written["presets"]["renamed"]["baseAtk"], 4200);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.list().unwrap().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let path = temp_path("blocked");
        let _ = fs::remove_dir(&path);
        let mut store = JsonFileStore::open(&path).unwrap();
        fs::create_dir_all(&path).unwrap();

        assert!(store.save("boss", json!({ "enemyDef": 800 })).is_err());
        assert!(store.list().unwrap().is_empty());
        assert!(!store.contains("boss").unwrap());
        let _ = fs::remove_dir(&path);
    }

    #[test]
    fn test_failed_rename_and_delete_keep_entries() {
        let path = temp_path("blocked-edit");
        let _ = fs::remove_dir(&path);
        let mut store = JsonFileStore::open(&path).unwrap();
        store.save("boss", json!({ "enemyDef": 800 })).unwrap();
        fs::remove_file(&path).unwrap();
        fs::create_dir_all(&path).unwrap();

        assert!(store.rename("boss", "tank").is_err());
        assert!(store.delete("boss").is_err());
        assert_eq!(store.list().unwrap(), vec!["boss"]);
        let _ = fs::remove_dir(&path);
    }

    #[test]
    fn test_migrated_preset_without_mode_evaluates_as_gear() {
        use crate::formula::evaluate;
        use crate::snapshot::normalize;
        use crate::types::InputMode;

        let path = temp_path("legacy-mode");
        fs::write(
            &path,
            r#"{ "old": { "baseAtk": 8000, "skillPct": 100, "critRate": 20, "critDmg": 50 } }"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let snapshot = normalize(&store.load("old").unwrap().unwrap());
        assert_eq!(snapshot.input_mode, InputMode::Gear);
        let r = evaluate(&snapshot);
        assert_eq!((r.no_crit, r.expected, r.on_crit), (8000, 8800, 12000));
        let _ = fs::remove_file(&path);
    }
}
