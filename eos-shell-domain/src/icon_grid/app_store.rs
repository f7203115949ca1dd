//! Command surface used by the app store to manage the desktop.
//!
//! Each command checks that the identifier is of the expected kind before
//! touching the layout; a mismatched kind is ignored.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use super::errors::IconGridError;
use super::events::IconGridChangedEvent;
use super::service::IconGridLayout;
use super::types::{is_folder, DESKTOP_GRID_ID};

#[derive(Clone)]
pub struct AppStoreService {
    layout: Arc<IconGridLayout>,
}

impl AppStoreService {
    pub fn new(layout: Arc<IconGridLayout>) -> Self {
        Self { layout }
    }

    /// Adds an application at the end of the desktop.
    pub fn add_application(&self, id: &str) -> Result<bool, IconGridError> {
        if is_folder(id) {
            debug!("Refusing to add folder '{}' as an application", id);
            return Ok(false);
        }
        self.layout.append_icon(id, DESKTOP_GRID_ID)
    }

    pub fn remove_application(&self, id: &str) -> Result<bool, IconGridError> {
        if is_folder(id) {
            return Ok(false);
        }
        self.layout.remove_icon(id, false)
    }

    /// Adds a folder at the end of the desktop.
    pub fn add_folder(&self, id: &str) -> Result<bool, IconGridError> {
        if !is_folder(id) {
            debug!("Refusing to add application '{}' as a folder", id);
            return Ok(false);
        }
        self.layout.append_icon(id, DESKTOP_GRID_ID)
    }

    pub fn remove_folder(&self, id: &str) -> Result<bool, IconGridError> {
        if !is_folder(id) {
            return Ok(false);
        }
        self.layout.remove_icon(id, false)
    }

    pub fn reset_desktop(&self) -> Result<(), IconGridError> {
        self.layout.reset_desktop()
    }

    pub fn list_applications(&self) -> Vec<String> {
        self.layout.list_applications()
    }

    /// Each event carries the application list after the change.
    pub fn subscribe_applications_changed(&self) -> broadcast::Receiver<IconGridChangedEvent> {
        self.layout.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings_store::{MemorySettingsStore, SettingsStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service() -> AppStoreService {
        let store = Arc::new(MemorySettingsStore::default());
        store.set("icon-grid-layout", json!({"desktop": ["a.desktop"]})).unwrap();
        AppStoreService::new(IconGridLayout::builder(store).build())
    }

    #[test]
    fn test_add_application_rejects_folder_ids() {
        let service = service();
        assert!(!service.add_application("games.directory").unwrap());
        assert!(service.add_application("b.desktop").unwrap());
        assert_eq!(service.list_applications(), vec!["a.desktop", "b.desktop"]);
    }

    #[test]
    fn test_folder_commands_reject_application_ids() {
        let service = service();
        assert!(!service.add_folder("b.desktop").unwrap());
        assert!(!service.remove_folder("a.desktop").unwrap());
        assert!(service.add_folder("games.directory").unwrap());
        assert!(service.remove_folder("games.directory").unwrap());
        assert_eq!(service.list_applications(), vec!["a.desktop"]);
    }

    #[test]
    fn test_changes_carry_application_list() {
        let service = service();
        let mut receiver = service.subscribe_applications_changed();
        service.remove_application("a.desktop").unwrap();
        assert_eq!(receiver.try_recv().unwrap().applications, Vec::<String>::new());
    }
}
