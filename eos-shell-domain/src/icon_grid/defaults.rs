//! Factory default layout.
//!
//! The default tree is assembled from three independent layers: the base
//! layout plus optional "prepend" and "append" layers, typically shipped by
//! different packages. Each layer is a JSON object mapping folder ids to
//! identifier arrays, localized by file name (`icon-grid-<lang>.json`,
//! `icon-grid-prepend-<lang>.json`, `icon-grid-append-<lang>.json`).

use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use eos_shell_core::config::IconGridConfig;
use eos_shell_core::utils::fs::read_to_string_async;
use eos_shell_core::utils::paths::{data_dirs_with_subdir, language_names};

use super::types::{IconTree, DESKTOP_GRID_ID};

/// Data subdirectory searched when no explicit directories are configured.
pub const DEFAULT_LAYOUT_SUBDIR: &str = "eos-shell/icon-grid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultLayer {
    Base,
    Prepend,
    Append,
}

impl DefaultLayer {
    pub fn file_prefix(self) -> &'static str {
        match self {
            DefaultLayer::Base => "icon-grid",
            DefaultLayer::Prepend => "icon-grid-prepend",
            DefaultLayer::Append => "icon-grid-append",
        }
    }
}

/// Source of the localized default layers.
#[async_trait]
pub trait LayoutDefaultsProvider: Send + Sync {
    /// Returns the best-matching localized document for `layer`, or `None`
    /// when no candidate exists or parses.
    async fn load_layer(&self, layer: DefaultLayer) -> Option<IconTree>;
}

/// Reads the layers from directories on disk.
#[derive(Debug, Clone, Default)]
pub struct FilesystemDefaultsProvider {
    base_dirs: Vec<PathBuf>,
    prepend_dirs: Vec<PathBuf>,
    append_dirs: Vec<PathBuf>,
    languages: Vec<String>,
}

impl FilesystemDefaultsProvider {
    pub fn new(
        base_dirs: Vec<PathBuf>,
        prepend_dirs: Vec<PathBuf>,
        append_dirs: Vec<PathBuf>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            base_dirs,
            prepend_dirs,
            append_dirs,
            languages,
        }
    }

    /// Empty directory lists fall back to the XDG data directories and an
    /// empty language list to the environment's locale preferences.
    pub fn from_config(config: &IconGridConfig) -> Self {
        let or_data_dirs = |dirs: &Vec<PathBuf>| {
            if dirs.is_empty() {
                data_dirs_with_subdir(DEFAULT_LAYOUT_SUBDIR)
            } else {
                dirs.clone()
            }
        };
        let languages = if config.languages.is_empty() {
            language_names()
        } else {
            config.languages.clone()
        };
        Self::new(
            or_data_dirs(&config.default_dirs),
            or_data_dirs(&config.prepend_dirs),
            or_data_dirs(&config.append_dirs),
            languages,
        )
    }

    fn dirs_for(&self, layer: DefaultLayer) -> &[PathBuf] {
        match layer {
            DefaultLayer::Base => &self.base_dirs,
            DefaultLayer::Prepend => &self.prepend_dirs,
            DefaultLayer::Append => &self.append_dirs,
        }
    }

    /// Candidate files, most preferred first: languages outer, dirs inner.
    fn candidates(&self, layer: DefaultLayer) -> Vec<PathBuf> {
        let prefix = layer.file_prefix();
        self.languages
            .iter()
            .flat_map(|lang| {
                self.dirs_for(layer)
                    .iter()
                    .map(move |dir| dir.join(format!("{}-{}.json", prefix, lang)))
            })
            .collect()
    }
}

async fn read_layer_file(path: &Path) -> Option<IconTree> {
    let content = match read_to_string_async(path).await {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return None,
        Err(e) => {
            warn!("Could not read default layout {:?}: {}", path, e);
            return None;
        }
    };
    match serde_json::from_str::<IconTree>(&content) {
        Ok(tree) => Some(tree),
        Err(e) => {
            warn!("Ignoring unparsable default layout {:?}: {}", path, e);
            None
        }
    }
}

#[async_trait]
impl LayoutDefaultsProvider for FilesystemDefaultsProvider {
    async fn load_layer(&self, layer: DefaultLayer) -> Option<IconTree> {
        let candidates = self.candidates(layer);
        let results = join_all(candidates.iter().map(|path| read_layer_file(path))).await;
        let (path, tree) = candidates
            .iter()
            .zip(results)
            .find_map(|(path, tree)| tree.map(|tree| (path, tree)))?;
        debug!("Using {:?} for the {:?} default layout layer", path, layer);
        Some(tree)
    }
}

/// Merges the three layers into the default tree.
///
/// For every folder of `base` the result is the prepend entries, then the
/// base entries, then the append entries. Folders that appear only in the
/// prepend or append layer are dropped. The result always has a desktop
/// folder: a missing base layer yields a tree with an empty desktop, and a
/// base layer without one gets an empty one added.
pub fn merge_default_layers(base: Option<IconTree>, prepend: Option<IconTree>, append: Option<IconTree>) -> IconTree {
    let Some(base) = base else {
        let mut tree = IconTree::new();
        tree.insert(DESKTOP_GRID_ID.to_string(), Vec::new());
        return tree;
    };
    let prepend = prepend.unwrap_or_default();
    let append = append.unwrap_or_default();

    let mut tree: IconTree = base
        .into_iter()
        .map(|(folder, icons)| {
            let mut merged = prepend.get(&folder).cloned().unwrap_or_default();
            merged.extend(icons);
            if let Some(tail) = append.get(&folder) {
                merged.extend(tail.iter().cloned());
            }
            (folder, merged)
        })
        .collect();
    if !tree.contains_key(DESKTOP_GRID_ID) {
        warn!("Default icon grid layout has no '{}' folder; adding an empty one", DESKTOP_GRID_ID);
        tree.insert(DESKTOP_GRID_ID.to_string(), Vec::new());
    }
    tree
}

/// Loads all three layers concurrently and merges them.
pub async fn load_default_icons(provider: &dyn LayoutDefaultsProvider) -> IconTree {
    let (base, prepend, append) = futures::join!(
        provider.load_layer(DefaultLayer::Base),
        provider.load_layer(DefaultLayer::Prepend),
        provider.load_layer(DefaultLayer::Append),
    );
    if base.is_none() {
        warn!("No default icon grid layout found; starting with an empty desktop");
    }
    merge_default_layers(base, prepend, append)
}
