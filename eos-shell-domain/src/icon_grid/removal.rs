//! Undoable removal of grid icons.
//!
//! An interactive removal is handed to a [`RemovalNotifier`] as a
//! [`PendingRemoval`]. The notifier shows whatever UI it likes and later
//! calls either [`PendingRemoval::undo`] or [`PendingRemoval::dismiss`]. Only
//! the first of the two has any effect.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use eos_shell_core::utils::fs::remove_file_if_exists;
use eos_shell_core::utils::paths::get_data_home;

use super::errors::IconGridError;
use super::service::IconGridLayout;
use super::types::IconPosition;

/// Receives interactive removals.
pub trait RemovalNotifier: Send + Sync {
    fn icon_removed(&self, removal: Arc<PendingRemoval>);
}

/// Deletes files backing an identifier once its removal is final.
pub trait IconFileRemover: Send + Sync {
    fn remove_icon_files(&self, id: &str);
}

/// Leaves the filesystem alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFileRemover;

impl IconFileRemover for NoopFileRemover {
    fn remove_icon_files(&self, _id: &str) {}
}

/// Prefix of folder files created by the user rather than shipped defaults.
pub const USER_DIRECTORY_PREFIX: &str = "userdir-";

/// Default subdirectory of the data home holding user folder files.
pub const USER_DIRECTORIES_SUBDIR: &str = "desktop-directories";

/// Deletes user-authored folder files (`userdir-<name>-XXXXXX.directory`).
///
/// Identifiers without the user prefix belong to the system and are never
/// touched.
#[derive(Debug, Clone)]
pub struct UserDirectoryFileRemover {
    directory: PathBuf,
}

impl UserDirectoryFileRemover {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Uses `configured` if set, otherwise the data home's
    /// `desktop-directories`. Returns `None` when neither can be resolved.
    pub fn from_config(configured: Option<&PathBuf>) -> Option<Self> {
        match configured {
            Some(dir) => Some(Self::new(dir.clone())),
            None => get_data_home()
                .ok()
                .map(|home| Self::new(home.join(USER_DIRECTORIES_SUBDIR))),
        }
    }
}

impl IconFileRemover for UserDirectoryFileRemover {
    fn remove_icon_files(&self, id: &str) {
        if !id.starts_with(USER_DIRECTORY_PREFIX) || id.contains('/') {
            return;
        }
        let path = self.directory.join(id);
        match remove_file_if_exists(&path) {
            Ok(true) => debug!("Deleted user folder file {:?}", path),
            Ok(false) => {}
            Err(e) => warn!("Failed to delete user folder file {:?}: {}", path, e),
        }
    }
}

/// A removal that may still be undone.
pub struct PendingRemoval {
    layout: Weak<IconGridLayout>,
    id: String,
    position: Option<IconPosition>,
    settled: AtomicBool,
}

impl PendingRemoval {
    pub(crate) fn new(layout: Weak<IconGridLayout>, id: String, position: Option<IconPosition>) -> Self {
        Self {
            layout,
            id,
            position,
            settled: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where the icon was before it was removed.
    pub fn position(&self) -> Option<&IconPosition> {
        self.position.as_ref()
    }

    /// Puts the icon back in its old folder, before its old next sibling.
    ///
    /// Returns `Ok(false)` if the removal was already settled, the layout is
    /// gone, or the icon had no folder to return to.
    pub fn undo(&self) -> Result<bool, IconGridError> {
        if self.settled.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        let (Some(layout), Some(position)) = (self.layout.upgrade(), self.position.as_ref()) else {
            return Ok(false);
        };
        debug!("Undoing removal of '{}'", self.id);
        layout.reposition_icon(&self.id, position.next_sibling.as_deref(), Some(&position.folder))
    }

    /// Makes the removal final and deletes any backing files.
    pub fn dismiss(&self) {
        if self.settled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(layout) = self.layout.upgrade() {
            layout.finalize_removal(&self.id);
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for PendingRemoval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRemoval")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("settled", &self.is_settled())
            .finish()
    }
}
