//! Key schema for the persisted settings store.
//!
//! A schema lists every key a store accepts together with its factory
//! default. `reset` restores that default and `set` only accepts values of
//! the same JSON kind.

use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;

use eos_shell_core::config::CoreConfig;

use super::errors::SettingsStoreError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsSchema {
    defaults: BTreeMap<String, JsonValue>,
}

impl SettingsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// The keys the shell reads under their default names.
    pub fn shell() -> Self {
        Self::for_config(&CoreConfig::default())
    }

    /// The keys the shell reads, named as `config` configures them.
    pub fn for_config(config: &CoreConfig) -> Self {
        Self::new()
            .with_key(config.icon_grid.settings_key.clone(), json!({}))
            .with_key(config.session.coding_toggle_key.clone(), JsonValue::Bool(false))
    }

    pub fn with_key(mut self, key: impl Into<String>, default_value: JsonValue) -> Self {
        self.defaults.insert(key.into(), default_value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defaults.contains_key(key)
    }

    pub fn default_value(&self, key: &str) -> Result<&JsonValue, SettingsStoreError> {
        self.defaults
            .get(key)
            .ok_or_else(|| SettingsStoreError::UnknownKey { key: key.to_string() })
    }

    /// Checks that `value` has the same JSON kind as the key's default.
    pub fn validate(&self, key: &str, value: &JsonValue) -> Result<(), SettingsStoreError> {
        let default_value = self.default_value(key)?;
        let expected = kind_name(default_value);
        if expected == kind_name(value) {
            Ok(())
        } else {
            Err(SettingsStoreError::type_mismatch(key, expected, value))
        }
    }
}

pub(crate) fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
