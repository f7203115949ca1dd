use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::settings_store::errors::SettingsStoreError;
use crate::settings_store::events::SettingChangedEvent;
use crate::settings_store::schema::SettingsSchema;
use crate::settings_store::service::SettingsStore;
use crate::settings_store::DEFAULT_EVENT_CAPACITY;

/// A [`SettingsStore`] that keeps values in memory only.
pub struct MemorySettingsStore {
    schema: SettingsSchema,
    values: RwLock<HashMap<String, JsonValue>>,
    event_sender: broadcast::Sender<SettingChangedEvent>,
}

impl MemorySettingsStore {
    pub fn new(schema: SettingsSchema) -> Self {
        let (event_sender, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            schema,
            values: RwLock::new(HashMap::new()),
            event_sender,
        }
    }

    fn notify(&self, key: &str) {
        if self.event_sender.send(SettingChangedEvent::new(key)).is_err() {
            debug!("No subscribers for change of setting '{}'", key);
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new(SettingsSchema::shell())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<JsonValue, SettingsStoreError> {
        let default_value = self.schema.default_value(key)?;
        let values = self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned().unwrap_or_else(|| default_value.clone()))
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<(), SettingsStoreError> {
        self.schema.validate(key, &value)?;
        {
            let mut values = self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            values.insert(key.to_string(), value);
        }
        self.notify(key);
        Ok(())
    }

    fn reset(&self, key: &str) -> Result<(), SettingsStoreError> {
        self.schema.default_value(key)?;
        {
            let mut values = self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            values.remove(key);
        }
        self.notify(key);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingChangedEvent> {
        self.event_sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_returns_default_until_set() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.get("icon-grid-layout").unwrap(), json!({}));
        store.set("icon-grid-layout", json!({"desktop": ["a.desktop"]})).unwrap();
        assert_eq!(store.get("icon-grid-layout").unwrap(), json!({"desktop": ["a.desktop"]}));
    }

    #[test]
    fn test_reset_restores_default_and_notifies() {
        let store = MemorySettingsStore::default();
        let mut receiver = store.subscribe();
        store.set("enable-coding-game", json!(true)).unwrap();
        assert!(store.get_bool("enable-coding-game").unwrap());
        store.reset("enable-coding-game").unwrap();
        assert!(!store.get_bool("enable-coding-game").unwrap());

        assert_eq!(receiver.try_recv().unwrap().key, "enable-coding-game");
        assert_eq!(receiver.try_recv().unwrap().key, "enable-coding-game");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let store = MemorySettingsStore::default();
        assert!(matches!(store.get("missing"), Err(SettingsStoreError::UnknownKey { .. })));
        assert!(matches!(store.set("missing", json!(1)), Err(SettingsStoreError::UnknownKey { .. })));
        assert!(matches!(store.reset("missing"), Err(SettingsStoreError::UnknownKey { .. })));
    }

    #[test]
    fn test_get_bool_on_object_is_type_mismatch() {
        let store = MemorySettingsStore::default();
        assert!(matches!(
            store.get_bool("icon-grid-layout"),
            Err(SettingsStoreError::TypeMismatch { .. })
        ));
    }
}
