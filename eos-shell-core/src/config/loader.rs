//! Configuration Loading for the shell core.
//!
//! [`ConfigLoader`] locates the system and user configuration files, merges
//! them (user values override system values, tables merge recursively),
//! deserializes the result into [`CoreConfig`] and validates it.
//!
//! ## Validation
//!
//! - Log levels and formats are normalised to lowercase and checked.
//! - Relative log file paths are resolved against the application state
//!   directory; the parent directory is created if needed.
//! - Settings keys used by the domain layer must not be empty.

use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;
use tracing::debug;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as shell_fs;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir, get_system_config_path};

/// `ConfigLoader` provides static methods to load and validate `CoreConfig`.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the `CoreConfig` for the application.
    ///
    /// # Errors
    ///
    /// Returns a `CoreError` if a configuration directory cannot be resolved, a
    /// present file cannot be read or parsed, or validation fails. Missing files
    /// are not errors; defaults are used instead.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let system_config_path = get_system_config_path();
        let user_config_path = get_app_config_dir()?.join("config.toml");
        Self::load_from_paths(&system_config_path, &user_config_path)
    }

    /// Same pipeline as [`ConfigLoader::load`] with explicit file locations.
    pub fn load_from_paths(system_path: &Path, user_path: &Path) -> Result<CoreConfig, CoreError> {
        let system_toml_value = Self::read_toml_table(system_path)?;
        let user_toml_value = Self::read_toml_table(user_path)?;

        let merged_toml = Self::merge_toml_values(system_toml_value, user_toml_value);

        let mut final_config: CoreConfig = match merged_toml {
            Some(value) => value
                .try_into()
                .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?,
            None => {
                debug!("No configuration files found, using defaults");
                CoreConfig::default()
            }
        };

        Self::validate_config(&mut final_config)?;
        Ok(final_config)
    }

    fn read_toml_table(path: &Path) -> Result<Option<Value>, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                if content.trim().is_empty() {
                    Ok(None)
                } else {
                    debug!("Read configuration file {:?}", path);
                    let table: toml::Table = content
                        .parse()
                        .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?;
                    Ok(Some(Value::Table(table)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Merges two optional TOML values. `override_val` takes precedence.
    fn merge_toml_values(base: Option<Value>, override_val: Option<Value>) -> Option<Value> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(Value::Table(mut base_table)), Some(Value::Table(override_table))) => {
                Self::merge_toml_tables(&mut base_table, &override_table);
                Some(Value::Table(base_table))
            }
            (_, Some(o)) => Some(o),
        }
    }

    /// Recursively merges `override_table` into `base_table`.
    fn merge_toml_tables(base_table: &mut toml::map::Map<String, Value>, override_table: &toml::map::Map<String, Value>) {
        for (key, override_item) in override_table {
            match base_table.get_mut(key) {
                Some(base_item) => {
                    if let (Value::Table(bt), Value::Table(ot)) = (&mut *base_item, override_item) {
                        Self::merge_toml_tables(bt, ot);
                    } else {
                        *base_item = override_item.clone();
                    }
                }
                None => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                config.logging.level = level_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => {
                config.logging.format = format_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(configured_path) = config.logging.file_path.clone() {
            let absolute_path: PathBuf = if configured_path.is_absolute() {
                configured_path
            } else {
                get_app_state_dir()?.join(configured_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    shell_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        if config.icon_grid.settings_key.trim().is_empty() {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "icon_grid.settings_key must not be empty".to_string(),
            )));
        }
        if config.session.coding_toggle_key.trim().is_empty() {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "session.coding_toggle_key must not be empty".to_string(),
            )));
        }

        Ok(())
    }
}
