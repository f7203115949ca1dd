use serde_json::Value as JsonValue;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use eos_shell_core::config::IconGridConfig;
use eos_shell_core::utils::spawn_task;

use crate::settings_store::{SettingsStore, DEFAULT_EVENT_CAPACITY};

use super::defaults::{load_default_icons, FilesystemDefaultsProvider};
use super::errors::IconGridError;
use super::events::IconGridChangedEvent;
use super::removal::{IconFileRemover, NoopFileRemover, PendingRemoval, RemovalNotifier, UserDirectoryFileRemover};
use super::resolver::{IdentifierResolver, IdentityResolver};
use super::types::{is_folder, locate, IconTree, DESKTOP_GRID_ID};

/// Owner of the icon tree: which identifiers are shown in which folder, and
/// in what order.
///
/// The tree is rebuilt from the settings store on construction and whenever
/// the layout key changes. Mutations edit a copy, write the whole tree back
/// to the store and only then replace the in-memory tree, so a failed write
/// leaves everything as it was.
pub struct IconGridLayout {
    store: Arc<dyn SettingsStore>,
    settings_key: String,
    resolver: Arc<dyn IdentifierResolver>,
    default_icons: IconTree,
    file_remover: Arc<dyn IconFileRemover>,
    removal_notifier: Option<Arc<dyn RemovalNotifier>>,
    icon_tree: RwLock<IconTree>,
    event_sender: broadcast::Sender<IconGridChangedEvent>,
}

/// Assembles an [`IconGridLayout`].
pub struct IconGridLayoutBuilder {
    store: Arc<dyn SettingsStore>,
    settings_key: String,
    resolver: Arc<dyn IdentifierResolver>,
    default_icons: Option<IconTree>,
    file_remover: Arc<dyn IconFileRemover>,
    removal_notifier: Option<Arc<dyn RemovalNotifier>>,
}

impl IconGridLayoutBuilder {
    pub fn settings_key(mut self, key: impl Into<String>) -> Self {
        self.settings_key = key.into();
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn IdentifierResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The merged factory layout, usually from
    /// [`super::defaults::load_default_icons`]. A missing desktop folder is
    /// added.
    pub fn default_icons(mut self, icons: IconTree) -> Self {
        self.default_icons = Some(icons);
        self
    }

    pub fn file_remover(mut self, remover: Arc<dyn IconFileRemover>) -> Self {
        self.file_remover = remover;
        self
    }

    pub fn removal_notifier(mut self, notifier: Arc<dyn RemovalNotifier>) -> Self {
        self.removal_notifier = Some(notifier);
        self
    }

    /// Builds the layout and loads the tree from the store.
    pub fn build(self) -> Arc<IconGridLayout> {
        let mut default_icons = self.default_icons.unwrap_or_default();
        default_icons.entry(DESKTOP_GRID_ID.to_string()).or_default();
        let (event_sender, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        let layout = Arc::new(IconGridLayout {
            store: self.store,
            settings_key: self.settings_key,
            resolver: self.resolver,
            default_icons,
            file_remover: self.file_remover,
            removal_notifier: self.removal_notifier,
            icon_tree: RwLock::new(IconTree::new()),
            event_sender,
        });
        layout.rebuild();
        layout
    }
}

impl IconGridLayout {
    pub fn builder(store: Arc<dyn SettingsStore>) -> IconGridLayoutBuilder {
        IconGridLayoutBuilder {
            store,
            settings_key: eos_shell_core::config::defaults::DEFAULT_ICON_GRID_SETTINGS_KEY.to_string(),
            resolver: Arc::new(IdentityResolver),
            default_icons: None,
            file_remover: Arc::new(NoopFileRemover),
            removal_notifier: None,
        }
    }

    /// Builds a layout wired to the filesystem as described by `config`.
    ///
    /// Default layers are read asynchronously before the first rebuild.
    pub async fn from_config(
        config: &IconGridConfig,
        store: Arc<dyn SettingsStore>,
        resolver: Arc<dyn IdentifierResolver>,
    ) -> Arc<Self> {
        let provider = FilesystemDefaultsProvider::from_config(config);
        let default_icons = load_default_icons(&provider).await;
        let mut builder = Self::builder(store)
            .settings_key(config.settings_key.clone())
            .resolver(resolver)
            .default_icons(default_icons);
        if let Some(remover) = UserDirectoryFileRemover::from_config(config.user_directories_dir.as_ref()) {
            builder = builder.file_remover(Arc::new(remover));
        }
        builder.build()
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, IconTree> {
        self.icon_tree.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, IconTree> {
        self.icon_tree.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IconGridChangedEvent> {
        self.event_sender.subscribe()
    }

    /// A copy of the whole tree.
    pub fn icon_tree(&self) -> IconTree {
        self.read_tree().clone()
    }

    pub fn settings_key(&self) -> &str {
        &self.settings_key
    }

    /// Returns `true` if `id` is a member of any folder.
    pub fn has_icon(&self, id: &str) -> bool {
        self.read_tree().values().any(|icons| icons.iter().any(|icon| icon == id))
    }

    /// The contents of `folder_id`, empty for an unknown folder.
    pub fn get_icons(&self, folder_id: &str) -> Vec<String> {
        self.read_tree().get(folder_id).cloned().unwrap_or_default()
    }

    pub fn icon_is_folder(&self, id: &str) -> bool {
        is_folder(id)
    }

    /// Every non-folder identifier, folder by folder.
    pub fn list_applications(&self) -> Vec<String> {
        Self::applications_of(&self.read_tree())
    }

    fn applications_of(tree: &IconTree) -> Vec<String> {
        tree.values()
            .flat_map(|icons| icons.iter())
            .filter(|icon| !is_folder(icon))
            .cloned()
            .collect()
    }

    /// Appends `id` at the end of `folder_id`.
    pub fn append_icon(&self, id: &str, folder_id: &str) -> Result<bool, IconGridError> {
        self.reposition_icon(id, None, Some(folder_id))
    }

    /// Moves `id` into `new_folder_id`, before `insert_before_id` when that is
    /// a member of the target folder and at the end otherwise.
    ///
    /// With no target folder the icon is removed; removing a folder drops its
    /// entry and contents. Returns `Ok(false)` without touching anything when
    /// the target folder does not exist, when a folder would be put inside
    /// itself, or when removing an identifier the tree does not contain.
    pub fn reposition_icon(
        &self,
        id: &str,
        insert_before_id: Option<&str>,
        new_folder_id: Option<&str>,
    ) -> Result<bool, IconGridError> {
        let mut tree_guard = self.write_tree();

        if let Some(folder_id) = new_folder_id {
            if !tree_guard.contains_key(folder_id) {
                debug!("Cannot move '{}' into unknown folder '{}'", id, folder_id);
                return Ok(false);
            }
            if folder_id == id {
                debug!("Cannot move folder '{}' into itself", id);
                return Ok(false);
            }
        }

        let mut new_tree = tree_guard.clone();
        let mut found = false;
        for icons in new_tree.values_mut() {
            let before = icons.len();
            icons.retain(|icon| icon != id);
            found |= icons.len() != before;
        }

        match new_folder_id {
            Some(folder_id) => {
                if let Some(icons) = new_tree.get_mut(folder_id) {
                    let index = insert_before_id
                        .and_then(|before| icons.iter().position(|icon| icon == before))
                        .unwrap_or(icons.len());
                    icons.insert(index, id.to_string());
                }
                if is_folder(id) {
                    new_tree.entry(id.to_string()).or_default();
                }
            }
            None => {
                let removed_key = is_folder(id) && new_tree.remove(id).is_some();
                if !found && !removed_key {
                    debug!("Nothing to remove for '{}'", id);
                    return Ok(false);
                }
            }
        }

        self.persist(&new_tree)?;
        *tree_guard = new_tree;
        let applications = Self::applications_of(&tree_guard);
        drop(tree_guard);

        self.emit_changed(applications);
        Ok(true)
    }

    /// Removes `id`, keeping enough state to undo it.
    ///
    /// Interactive removals go to the removal notifier, which decides whether
    /// they are undone or made final. Without a notifier, or when not
    /// interactive, the removal is final immediately.
    pub fn remove_icon(self: &Arc<Self>, id: &str, interactive: bool) -> Result<bool, IconGridError> {
        let position = locate(&self.read_tree(), id);
        if !self.reposition_icon(id, None, None)? {
            return Ok(false);
        }

        let removal = Arc::new(PendingRemoval::new(Arc::downgrade(self), id.to_string(), position));
        match (&self.removal_notifier, interactive) {
            (Some(notifier), true) => notifier.icon_removed(removal),
            _ => removal.dismiss(),
        }
        Ok(true)
    }

    pub(crate) fn finalize_removal(&self, id: &str) {
        info!("Removal of '{}' is final", id);
        self.file_remover.remove_icon_files(id);
    }

    /// Restores the factory layout and deletes files of the identifiers it
    /// no longer contains.
    pub fn reset_desktop(&self) -> Result<(), IconGridError> {
        let before = self.all_identifiers();
        self.store.reset(&self.settings_key)?;
        self.rebuild_tree(false);

        let after = self.all_identifiers();
        for id in before.iter().filter(|id| !after.contains(id)) {
            self.file_remover.remove_icon_files(id);
        }
        Ok(())
    }

    fn all_identifiers(&self) -> Vec<String> {
        let tree = self.read_tree();
        tree.keys().chain(tree.values().flatten()).cloned().collect()
    }

    /// Recomputes the tree from the store.
    ///
    /// Emits a change event only if the result differs from the current
    /// tree, so the echo of this layout's own writes is absorbed.
    pub fn rebuild(&self) {
        self.rebuild_tree(true);
    }

    fn rebuild_tree(&self, allow_reset: bool) {
        let loaded = match self.store.get(&self.settings_key) {
            Ok(value) => self.parse_stored(value),
            Err(e) => {
                warn!("Failed to read icon grid layout '{}': {}", self.settings_key, e);
                Some(IconTree::new())
            }
        };

        let tree = match loaded {
            Some(tree) if tree.is_empty() => self.resolved(self.default_icons.clone()),
            Some(tree) if tree.contains_key(DESKTOP_GRID_ID) => tree,
            _ if allow_reset => {
                warn!("Stored icon grid layout is corrupt, resetting to defaults");
                if let Err(e) = self.reset_desktop() {
                    warn!("Failed to reset icon grid layout: {}", e);
                }
                return;
            }
            _ => self.resolved(self.default_icons.clone()),
        };

        let mut tree_guard = self.write_tree();
        if *tree_guard == tree {
            return;
        }
        *tree_guard = tree;
        let applications = Self::applications_of(&tree_guard);
        drop(tree_guard);
        self.emit_changed(applications);
    }

    /// `None` when the stored value is not an object of string arrays.
    fn parse_stored(&self, value: JsonValue) -> Option<IconTree> {
        match serde_json::from_value::<IconTree>(value) {
            Ok(tree) => Some(self.resolved(tree)),
            Err(e) => {
                warn!("Unparsable icon grid layout: {}", e);
                None
            }
        }
    }

    fn resolved(&self, tree: IconTree) -> IconTree {
        tree.into_iter()
            .map(|(folder, icons)| {
                let icons = icons.iter().map(|icon| self.resolver.resolve(icon)).collect();
                (folder, icons)
            })
            .collect()
    }

    fn persist(&self, tree: &IconTree) -> Result<(), IconGridError> {
        let value = serde_json::to_value(tree)?;
        self.store.set(&self.settings_key, value)?;
        Ok(())
    }

    fn emit_changed(&self, applications: Vec<String>) {
        if self.event_sender.send(IconGridChangedEvent { applications }).is_err() {
            debug!("Icon grid changed with no subscribers");
        }
    }

    /// Rebuilds the tree whenever the store reports a change of the layout
    /// key. The task ends once the layout is dropped or the store closes its
    /// channel.
    pub fn spawn_store_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let mut receiver = self.store.subscribe();
        let layout = Arc::downgrade(self);
        let key = self.settings_key.clone();
        spawn_task(async move {
            loop {
                let rebuild = match receiver.recv().await {
                    Ok(event) => event.key == key,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Icon grid watcher missed {} setting changes", skipped);
                        true
                    }
                    Err(RecvError::Closed) => break,
                };
                if !rebuild {
                    continue;
                }
                match layout.upgrade() {
                    Some(layout) => layout.rebuild(),
                    None => break,
                }
            }
            debug!("Icon grid store watcher stopped");
        })
    }
}
