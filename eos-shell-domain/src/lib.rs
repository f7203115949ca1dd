//! Domain layer of the eos-shell workspace.
//!
//! - [`settings_store`]: persisted key/value settings with change
//!   notifications.
//! - [`icon_grid`]: the desktop icon grid layout and the app store facade
//!   over it.
//! - [`session_mode`]: the session mode stack and the parameters it
//!   resolves to.

// Re-export core module
pub use eos_shell_core as core;

pub mod error;
pub mod icon_grid;
pub mod session_mode;
pub mod settings_store;

pub use error::{DomainError, DomainResult};
pub use icon_grid::{
    AppStoreService, IconGridChangedEvent, IconGridError, IconGridLayout, IdentifierResolver, IdentityResolver,
    PendingRemoval, RemovalNotifier, DESKTOP_GRID_ID,
};
pub use session_mode::{SessionMode, SessionModeError, SessionModeEvent, SessionParameters};
pub use settings_store::{
    JsonFileSettingsStore, MemorySettingsStore, SettingChangedEvent, SettingsSchema, SettingsStore, SettingsStoreError,
};

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use eos_shell_core::utils::paths::get_app_config_dir;
use eos_shell_core::CoreConfig;

/// File name of the settings store inside the application config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Opens the JSON settings store in the user's config directory, accepting
/// the keys `config` names.
pub fn open_default_settings_store(config: &CoreConfig) -> DomainResult<JsonFileSettingsStore> {
    let path = get_app_config_dir()?.join(SETTINGS_FILE_NAME);
    Ok(JsonFileSettingsStore::open(path, SettingsSchema::for_config(config))?)
}

/// The domain services of a running shell, wired together.
///
/// Dropping it stops the store watcher.
pub struct ShellServices {
    pub settings: Arc<dyn SettingsStore>,
    pub icon_grid: Arc<IconGridLayout>,
    pub app_store: AppStoreService,
    pub session_mode: SessionMode,
    store_watcher: JoinHandle<()>,
}

impl ShellServices {
    /// Builds the icon grid layout and session mode from `config`, starts
    /// watching the store for layout changes and enters the initial mode.
    ///
    /// Fails with [`SettingsStoreError::UnknownKey`] if `settings` does not
    /// accept the keys `config` names; see [`SettingsSchema::for_config`].
    /// Must be called from within a tokio runtime.
    pub async fn initialize(
        config: &CoreConfig,
        settings: Arc<dyn SettingsStore>,
        resolver: Arc<dyn IdentifierResolver>,
        host_mode: Option<&str>,
    ) -> DomainResult<Self> {
        settings.get(&config.icon_grid.settings_key)?;
        settings.get(&config.session.coding_toggle_key)?;

        let icon_grid = IconGridLayout::from_config(&config.icon_grid, settings.clone(), resolver).await;
        let store_watcher = icon_grid.spawn_store_watcher();
        let app_store = AppStoreService::new(icon_grid.clone());

        let mut session_mode = SessionMode::from_config(&config.session);
        session_mode.init(host_mode, settings.as_ref()).await?;

        info!(
            "Shell domain services initialised in mode '{}'",
            session_mode.current_mode().unwrap_or_default()
        );
        Ok(Self {
            settings,
            icon_grid,
            app_store,
            session_mode,
            store_watcher,
        })
    }

    /// Stops the store watcher.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for ShellServices {
    fn drop(&mut self) {
        self.store_watcher.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(DomainError: Send, Sync, std::error::Error);
    assert_impl_all!(IconGridLayout: Send, Sync);
    assert_impl_all!(SessionMode: Send);
}
