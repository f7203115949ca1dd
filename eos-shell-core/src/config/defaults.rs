//! Default configuration values for the shell core.
//!
//! These functions are used by `serde`'s `default` attribute in the configuration
//! structures to provide sensible default values when they are not specified in
//! the configuration file.

use crate::config::{IconGridConfig, LoggingConfig, SessionConfig};
use std::path::PathBuf;

/// Settings key under which the icon tree is persisted.
pub const DEFAULT_ICON_GRID_SETTINGS_KEY: &str = "icon-grid-layout";

/// Boolean settings key that turns the `user` session mode into `user-coding`.
pub const DEFAULT_CODING_TOGGLE_KEY: &str = "enable-coding-game";

/// Returns the default `LoggingConfig`.
///
/// Used by `CoreConfig` if the `logging` section is missing from `config.toml`.
pub(super) fn default_core_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Returns the default log level string (`"info"`).
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the default log file path (`None`, no log file).
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// Returns the default log format string (`"text"`).
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

pub(super) fn default_icon_grid_config() -> IconGridConfig {
    IconGridConfig {
        settings_key: default_icon_grid_settings_key(),
        default_dirs: Vec::new(),
        prepend_dirs: Vec::new(),
        append_dirs: Vec::new(),
        languages: Vec::new(),
        user_directories_dir: None,
    }
}

pub(super) fn default_icon_grid_settings_key() -> String {
    DEFAULT_ICON_GRID_SETTINGS_KEY.to_string()
}

pub(super) fn default_session_config() -> SessionConfig {
    SessionConfig {
        mode_dirs: Vec::new(),
        coding_toggle_key: default_coding_toggle_key(),
    }
}

pub(super) fn default_coding_toggle_key() -> String {
    DEFAULT_CODING_TOGGLE_KEY.to_string()
}
