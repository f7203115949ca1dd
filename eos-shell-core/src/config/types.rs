//! Configuration Data Structures for the shell core.
//!
//! This module defines the structures used to represent the configuration of
//! the shell layers. They are populated by deserializing a TOML file.
//!
//! # Key Structs
//! - [`CoreConfig`]: The root configuration structure.
//! - [`LoggingConfig`]: Configuration specific to the logging subsystem.
//! - [`IconGridConfig`]: Where the icon grid finds its layered defaults.
//! - [`SessionConfig`]: Where session mode definitions are discovered.
//!
//! Missing fields take their values from [`super::defaults`]; unknown fields are
//! rejected via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use eos_shell_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/eos-shell.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/eos-shell.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// The minimum log level to record.
    /// Valid values (case-insensitive): "trace", "debug", "info", "warn", "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional path to a file where logs should be written.
    /// Relative paths are resolved against the application's state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// The format for log messages: "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_core_logging_config()
    }
}

/// Locations and locale preferences for the icon grid's default layers.
///
/// Each `*_dirs` list is searched in order; an empty list means "derive from the
/// XDG data directories" (see [`crate::utils::paths::data_dirs_with_subdir`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconGridConfig {
    /// Settings store key holding the persisted icon tree.
    #[serde(default = "defaults::default_icon_grid_settings_key")]
    pub settings_key: String,
    /// Directories holding the base `icon-grid-<lang>.json` files.
    #[serde(default)]
    pub default_dirs: Vec<PathBuf>,
    /// Directories holding `icon-grid-prepend-<lang>.json` files.
    #[serde(default)]
    pub prepend_dirs: Vec<PathBuf>,
    /// Directories holding `icon-grid-append-<lang>.json` files.
    #[serde(default)]
    pub append_dirs: Vec<PathBuf>,
    /// Locale preference order. Empty means "ask the environment".
    #[serde(default)]
    pub languages: Vec<String>,
    /// Directory holding user-authored folder and link files.
    #[serde(default)]
    pub user_directories_dir: Option<PathBuf>,
}

impl Default for IconGridConfig {
    fn default() -> Self {
        defaults::default_icon_grid_config()
    }
}

/// Session mode discovery settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Directories scanned for `<mode>.json` files, highest priority first.
    #[serde(default)]
    pub mode_dirs: Vec<PathBuf>,
    /// Boolean settings key that selects the `user-coding` fallback mode.
    #[serde(default = "defaults::default_coding_toggle_key")]
    pub coding_toggle_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        defaults::default_session_config()
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use eos_shell_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [session]
/// mode_dirs = ["/usr/share/eos-shell/modes"]
/// "#;
/// let loaded_config: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded_config.logging.level, "warn");
/// assert_eq!(loaded_config.session.mode_dirs.len(), 1);
/// assert_eq!(loaded_config.icon_grid.settings_key, "icon-grid-layout");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_core_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_icon_grid_config")]
    pub icon_grid: IconGridConfig,
    #[serde(default = "defaults::default_session_config")]
    pub session: SessionConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_core_logging_config(),
            icon_grid: defaults::default_icon_grid_config(),
            session: defaults::default_session_config(),
        }
    }
}
