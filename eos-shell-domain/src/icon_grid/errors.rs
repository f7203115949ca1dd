use thiserror::Error;

use crate::settings_store::SettingsStoreError;

#[derive(Error, Debug)]
pub enum IconGridError {
    /// Reading, writing or resetting the persisted layout failed.
    #[error("Icon grid layout store error: {0}")]
    Store(#[from] SettingsStoreError),

    #[error("Failed to serialize the icon tree: {0}")]
    Serialization(#[from] serde_json::Error),
}
