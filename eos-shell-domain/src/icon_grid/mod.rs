//! The icon grid layout: which applications, links and folders are shown on
//! the desktop and inside each folder, in order.
//!
//! [`IconGridLayout`] is the single owner of the tree. It loads from a
//! [`crate::settings_store::SettingsStore`], falls back to the merged factory
//! layers from [`defaults`] when the store is empty, and writes every edit
//! back to the store.

pub mod app_store;
pub mod defaults;
pub mod errors;
pub mod events;
pub mod removal;
pub mod resolver;
pub mod service;
pub mod types;

pub use self::app_store::AppStoreService;
pub use self::defaults::{
    load_default_icons, merge_default_layers, DefaultLayer, FilesystemDefaultsProvider, LayoutDefaultsProvider,
};
pub use self::errors::IconGridError;
pub use self::events::IconGridChangedEvent;
pub use self::removal::{
    IconFileRemover, NoopFileRemover, PendingRemoval, RemovalNotifier, UserDirectoryFileRemover,
};
pub use self::resolver::{AliasTableResolver, IdentifierResolver, IdentityResolver};
pub use self::service::{IconGridLayout, IconGridLayoutBuilder};
pub use self::types::{is_folder, IconPosition, IconTree, DESKTOP_GRID_ID, FOLDER_SUFFIX};
