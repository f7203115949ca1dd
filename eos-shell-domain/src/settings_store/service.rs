use serde_json::Value as JsonValue;
use tokio::sync::broadcast;

use super::errors::SettingsStoreError;
use super::events::SettingChangedEvent;

/// A persisted key-value store with change notification.
///
/// Operations are synchronous: the backing store is local and either
/// completes or fails immediately. Every successful `set` or `reset` is
/// followed by a [`SettingChangedEvent`] on the channel returned by
/// `subscribe`; dropping the receiver unsubscribes.
pub trait SettingsStore: Send + Sync {
    /// Returns the stored value, or the schema default when unset.
    fn get(&self, key: &str) -> Result<JsonValue, SettingsStoreError>;

    fn set(&self, key: &str, value: JsonValue) -> Result<(), SettingsStoreError>;

    /// Restores the schema default.
    fn reset(&self, key: &str) -> Result<(), SettingsStoreError>;

    fn subscribe(&self) -> broadcast::Receiver<SettingChangedEvent>;

    fn get_bool(&self, key: &str) -> Result<bool, SettingsStoreError> {
        match self.get(key)? {
            JsonValue::Bool(value) => Ok(value),
            other => Err(SettingsStoreError::type_mismatch(key, "bool", &other)),
        }
    }
}
