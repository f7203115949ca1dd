use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use eos_shell_core::utils::fs as shell_fs;

use crate::settings_store::errors::SettingsStoreError;
use crate::settings_store::events::SettingChangedEvent;
use crate::settings_store::schema::SettingsSchema;
use crate::settings_store::service::SettingsStore;
use crate::settings_store::DEFAULT_EVENT_CAPACITY;

/// A [`SettingsStore`] persisted as a single JSON object on disk.
///
/// Only keys that differ from their schema default are written. The file is
/// replaced atomically on every `set` and `reset`.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    schema: SettingsSchema,
    values: RwLock<BTreeMap<String, JsonValue>>,
    event_sender: broadcast::Sender<SettingChangedEvent>,
}

impl JsonFileSettingsStore {
    /// Opens the store at `path`.
    ///
    /// A missing file starts with all defaults. A file that cannot be parsed,
    /// or holds values of the wrong kind, is logged and ignored (entirely, or
    /// per key) so a damaged file never prevents the shell from starting.
    pub fn open(path: impl Into<PathBuf>, schema: SettingsSchema) -> Result<Self, SettingsStoreError> {
        let path = path.into();
        let values = Self::load_values(&path, &schema)?;
        let (event_sender, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Ok(Self {
            path,
            schema,
            values: RwLock::new(values),
            event_sender,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_values(path: &Path, schema: &SettingsSchema) -> Result<BTreeMap<String, JsonValue>, SettingsStoreError> {
        let content = match shell_fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                debug!("Settings file {:?} not found, using defaults", path);
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(SettingsStoreError::Persistence {
                    operation: "load".to_string(),
                    message: format!("Failed to read settings file {:?}", path),
                    source: Some(e),
                })
            }
        };

        let parsed: BTreeMap<String, JsonValue> = match serde_json::from_str(&content) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Settings file {:?} is corrupt, falling back to defaults: {}", path, e);
                return Ok(BTreeMap::new());
            }
        };

        let mut values = BTreeMap::new();
        for (key, value) in parsed {
            match schema.validate(&key, &value) {
                Ok(()) => {
                    values.insert(key, value);
                }
                Err(e) => warn!("Ignoring stored setting '{}': {}", key, e),
            }
        }
        Ok(values)
    }

    /// Persists `values` and only then commits them to memory.
    fn commit(&self, key: &str, values: BTreeMap<String, JsonValue>, operation: &str) -> Result<(), SettingsStoreError> {
        let serialized = serde_json::to_string_pretty(&values)?;
        shell_fs::write_string_to_file(&self.path, &serialized).map_err(|e| {
            warn!("Failed to write settings file {:?}: {}", self.path, e);
            SettingsStoreError::Persistence {
                operation: operation.to_string(),
                message: format!("Failed to write setting '{}'", key),
                source: Some(e),
            }
        })?;

        *self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = values;

        if self.event_sender.send(SettingChangedEvent::new(key)).is_err() {
            debug!("No subscribers for change of setting '{}'", key);
        }
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, JsonValue> {
        self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<JsonValue, SettingsStoreError> {
        let default_value = self.schema.default_value(key)?;
        let values = self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned().unwrap_or_else(|| default_value.clone()))
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), SettingsStoreError> {
        self.schema.validate(key, &value)?;
        let mut values = self.snapshot();
        if self.schema.default_value(key)? == &value {
            values.remove(key);
        } else {
            values.insert(key.to_string(), value);
        }
        self.commit(key, values, "set")
    }

    fn reset(&self, key: &str) -> Result<(), SettingsStoreError> {
        self.schema.default_value(key)?;
        let mut values = self.snapshot();
        values.remove(key);
        self.commit(key, values, "reset")
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingChangedEvent> {
        self.event_sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_with_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSettingsStore::open(dir.path().join("settings.json"), SettingsSchema::shell()).unwrap();
        assert_eq!(store.get("icon-grid-layout").unwrap(), json!({}));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_persists_and_reopens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonFileSettingsStore::open(&path, SettingsSchema::shell()).unwrap();
        store.set("icon-grid-layout", json!({"desktop": ["org.gnome.Maps.desktop"]})).unwrap();
        store.set("enable-coding-game", json!(true)).unwrap();

        let reopened = JsonFileSettingsStore::open(&path, SettingsSchema::shell()).unwrap();
        assert_eq!(reopened.get("icon-grid-layout").unwrap(), json!({"desktop": ["org.gnome.Maps.desktop"]}));
        assert!(reopened.get_bool("enable-coding-game").unwrap());
    }

    #[test]
    fn test_reset_removes_key_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonFileSettingsStore::open(&path, SettingsSchema::shell()).unwrap();
        store.set("enable-coding-game", json!(true)).unwrap();
        store.reset("enable-coding-game").unwrap();

        let on_disk: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, json!({}));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileSettingsStore::open(&path, SettingsSchema::shell()).unwrap();
        assert_eq!(store.get("enable-coding-game").unwrap(), json!(false));
    }

    #[test]
    fn test_wrongly_typed_entry_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"enable-coding-game": "yes", "icon-grid-layout": {"desktop": []}}"#).unwrap();
        let store = JsonFileSettingsStore::open(&path, SettingsSchema::shell()).unwrap();
        assert_eq!(store.get("enable-coding-game").unwrap(), json!(false));
        assert_eq!(store.get("icon-grid-layout").unwrap(), json!({"desktop": []}));
    }

    #[test]
    fn test_set_emits_change_event() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileSettingsStore::open(dir.path().join("settings.json"), SettingsSchema::shell()).unwrap();
        let mut receiver = store.subscribe();
        store.set("icon-grid-layout", json!({"desktop": []})).unwrap();
        assert_eq!(receiver.try_recv().unwrap(), SettingChangedEvent::new("icon-grid-layout"));
    }
}
