//! Discovery of mode definitions shipped as `<mode>.json` files.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use eos_shell_core::config::SessionConfig;
use eos_shell_core::utils::fs::{list_files_async, read_to_string_async};
use eos_shell_core::utils::paths::data_dirs_with_subdir;

use super::errors::SessionModeError;
use super::types::{ModeDefinition, ModeField};

/// Data subdirectory searched when no explicit directories are configured.
pub const DEFAULT_MODES_SUBDIR: &str = "eos-shell/modes";

/// Supplies externally defined modes.
#[async_trait]
pub trait ModeDefinitionSource: Send + Sync {
    /// Loaded modes, highest priority first. Names may repeat; the first
    /// occurrence wins.
    async fn load_modes(&self) -> Vec<(String, ModeDefinition)>;
}

/// Reads `*.json` files from a list of directories.
#[derive(Debug, Clone, Default)]
pub struct FilesystemModeSource {
    dirs: Vec<PathBuf>,
}

impl FilesystemModeSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        if config.mode_dirs.is_empty() {
            Self::new(data_dirs_with_subdir(DEFAULT_MODES_SUBDIR))
        } else {
            Self::new(config.mode_dirs.clone())
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

fn mode_name(path: &Path) -> Option<String> {
    path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
}

/// Parses one mode file. File-defined modes are always primary.
pub async fn load_mode_file(path: &Path) -> Result<ModeDefinition, SessionModeError> {
    let mode_file_error = |reason: String| SessionModeError::ModeFile {
        path: path.to_path_buf(),
        reason,
    };
    let content = read_to_string_async(path)
        .await
        .map_err(|e| mode_file_error(e.to_string()))?;
    let document: serde_json::Value = serde_json::from_str(&content).map_err(|e| mode_file_error(e.to_string()))?;
    let object = document
        .as_object()
        .ok_or_else(|| mode_file_error("top-level value is not an object".to_string()))?;
    let mut definition = ModeDefinition::from_json_object(object).map_err(|e| mode_file_error(e.to_string()))?;
    definition.is_primary = ModeField::Set(true);
    Ok(definition)
}

#[async_trait]
impl ModeDefinitionSource for FilesystemModeSource {
    async fn load_modes(&self) -> Vec<(String, ModeDefinition)> {
        let listings = join_all(self.dirs.iter().map(|dir| list_files_async(dir, "json"))).await;

        let mut paths = Vec::new();
        for (dir, listing) in self.dirs.iter().zip(listings) {
            match listing {
                Ok(files) => paths.extend(files),
                Err(e) => warn!("Could not list mode directory {:?}: {}", dir, e),
            }
        }

        let parsed = join_all(paths.iter().map(|path| load_mode_file(path))).await;

        let mut seen = HashSet::new();
        let mut modes = Vec::new();
        for (path, result) in paths.iter().zip(parsed) {
            let Some(name) = mode_name(path) else {
                continue;
            };
            match result {
                Ok(definition) => {
                    if seen.insert(name.clone()) {
                        debug!("Loaded session mode '{}' from {:?}", name, path);
                        modes.push((name, definition));
                    } else {
                        debug!("Session mode '{}' from {:?} is shadowed", name, path);
                    }
                }
                Err(e) => warn!("Skipping session mode file: {}", e),
            }
        }
        modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_mode_file_forces_primary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kiosk.json");
        fs::write(&path, r#"{"parentMode": "user", "isPrimary": false, "hasRunDialog": false}"#).unwrap();
        let definition = load_mode_file(&path).await.unwrap();
        assert_eq!(definition.is_primary, ModeField::Set(true));
        assert_eq!(definition.has_run_dialog, ModeField::Set(false));
        assert_eq!(definition.parent_mode.as_deref(), Some("user"));
    }

    #[tokio::test]
    async fn test_malformed_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("list.json"), "[1, 2]").unwrap();
        fs::write(dir.path().join("mistyped.json"), r#"{"hasOverview": 3}"#).unwrap();
        fs::write(dir.path().join("good.json"), r#"{"hasOverview": true}"#).unwrap();

        let modes = FilesystemModeSource::new(vec![dir.path().to_path_buf()]).load_modes().await;
        let names: Vec<&str> = modes.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[tokio::test]
    async fn test_first_directory_wins() {
        let user_dir = TempDir::new().unwrap();
        let system_dir = TempDir::new().unwrap();
        fs::write(user_dir.path().join("kiosk.json"), r#"{"hasOverview": true}"#).unwrap();
        fs::write(system_dir.path().join("kiosk.json"), r#"{"hasOverview": false}"#).unwrap();
        fs::write(system_dir.path().join("classroom.json"), r#"{}"#).unwrap();

        let source = FilesystemModeSource::new(vec![
            user_dir.path().to_path_buf(),
            user_dir.path().join("missing"),
            system_dir.path().to_path_buf(),
        ]);
        let modes = source.load_modes().await;
        assert_eq!(modes.len(), 2);
        let kiosk = modes.iter().find(|(name, _)| name == "kiosk").unwrap();
        assert_eq!(kiosk.1.has_overview, ModeField::Set(true));
    }
}
