use eos_shell_core::error::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsStoreError {
    #[error("Unknown settings key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid value type for setting '{key}'. Expected type: {expected_type}, actual value preview: '{actual_value_preview}'")]
    TypeMismatch {
        key: String,
        expected_type: String,
        actual_value_preview: String,
    },

    #[error("Persistence error during operation '{operation}': {message}")]
    Persistence {
        operation: String,
        message: String,
        #[source]
        source: Option<CoreError>,
    },

    #[error("Serialization error for settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SettingsStoreError {
    pub(crate) fn type_mismatch(key: &str, expected_type: &str, value: &serde_json::Value) -> Self {
        SettingsStoreError::TypeMismatch {
            key: key.to_string(),
            expected_type: expected_type.to_string(),
            actual_value_preview: format!("{:.50}", value.to_string()),
        }
    }
}
