use serde::{Deserialize, Serialize};

/// Sent after a key was written or reset.
///
/// Carries only the key; receivers re-read the value they care about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingChangedEvent {
    pub key: String,
}

impl SettingChangedEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
