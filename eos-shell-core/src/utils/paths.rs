//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Resolves the directories the shell reads from and writes to, following the
//! XDG Base Directory Specification through the `directories-next` crate, and
//! derives the locale preference list used to pick localized data files.
//!
//! # Key Functions
//!
//! - [`get_app_config_dir()`]: e.g. `~/.config/eos-shell`.
//! - [`get_app_state_dir()`]: e.g. `~/.local/state/eos-shell`.
//! - [`get_data_home()`]: `$XDG_DATA_HOME` (e.g. `~/.local/share`).
//! - [`data_dirs_with_subdir()`]: the data home followed by every entry of
//!   `$XDG_DATA_DIRS`, each joined with a subdirectory.
//! - [`get_system_config_path()`]: `/etc/eos-shell/config.toml` unless
//!   `EOS_SHELL_SYSTEM_CONFIG` points elsewhere.
//! - [`language_names()`]: locale preference order, always ending with `C`.

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::env;
use std::path::PathBuf;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "Endless";
const APPLICATION: &str = "eos-shell";

const SYSTEM_CONFIG_ENV: &str = "EOS_SHELL_SYSTEM_CONFIG";
const DEFAULT_SYSTEM_CONFIG: &str = "/etc/eos-shell/config.toml";
const DEFAULT_XDG_DATA_DIRS: &str = "/usr/local/share:/usr/share";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable {
        dir_type: dir_type.to_string(),
    })
}

/// Returns the application-specific configuration directory.
///
/// # Errors
/// Returns [`CoreError::Config`] with [`ConfigError::DirectoryUnavailable`] if
/// no home directory can be determined.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("App Config"))
}

/// Returns the user's base state directory (`$XDG_STATE_HOME` or
/// `~/.local/state`).
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| match env::var("XDG_STATE_HOME") {
            Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
            _ => dirs.home_dir().join(".local/state"),
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Returns the application-specific state directory, used for log files.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    Ok(get_state_base_dir()?.join(APPLICATION))
}

/// Returns the user's data home (`$XDG_DATA_HOME`).
pub fn get_data_home() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| unavailable("Data Base"))
}

/// Returns the system data directories from `$XDG_DATA_DIRS`.
pub fn get_system_data_dirs() -> Vec<PathBuf> {
    let raw = match env::var("XDG_DATA_DIRS") {
        Ok(value) if !value.is_empty() => value,
        _ => DEFAULT_XDG_DATA_DIRS.to_string(),
    };
    raw.split(':')
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Joins `subdir` onto the data home and every system data directory.
///
/// The data home comes first so user-provided files shadow system ones. A
/// missing data home is skipped rather than failing the whole lookup.
pub fn data_dirs_with_subdir(subdir: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(home) = get_data_home() {
        dirs.push(home.join(subdir));
    }
    for dir in get_system_data_dirs() {
        let candidate = dir.join(subdir);
        if !dirs.contains(&candidate) {
            dirs.push(candidate);
        }
    }
    dirs
}

/// Location of the system-wide configuration file.
pub fn get_system_config_path() -> PathBuf {
    match env::var(SYSTEM_CONFIG_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_SYSTEM_CONFIG),
    }
}

/// Returns the locale names to try, most preferred first.
///
/// Reads the first non-empty of `LANGUAGE`, `LC_ALL`, `LC_MESSAGES` and `LANG`.
pub fn language_names() -> Vec<String> {
    let value = ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty());
    language_names_from(value.as_deref())
}

/// Expands a colon-separated locale list the way GLib's
/// `g_get_language_names` does.
///
/// `pt_BR.UTF-8@euro` expands to `pt_BR.UTF-8@euro`, `pt_BR@euro`,
/// `pt_BR.UTF-8`, `pt_BR`, `pt.UTF-8@euro`, `pt@euro`, `pt.UTF-8`, `pt`.
/// Duplicates are dropped and the list always ends with `C`.
pub fn language_names_from(value: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in value.unwrap_or_default().split(':') {
        if entry.is_empty() || entry == "C" || entry == "POSIX" {
            continue;
        }
        for variant in locale_variants(entry) {
            if !names.contains(&variant) {
                names.push(variant);
            }
        }
    }
    names.push("C".to_string());
    names
}

fn locale_variants(locale: &str) -> Vec<String> {
    let (rest, modifier) = match locale.split_once('@') {
        Some((rest, modifier)) => (rest, Some(modifier)),
        None => (locale, None),
    };
    let (rest, codeset) = match rest.split_once('.') {
        Some((rest, codeset)) => (rest, Some(codeset)),
        None => (rest, None),
    };
    let (language, territory) = match rest.split_once('_') {
        Some((language, territory)) => (language, Some(territory)),
        None => (rest, None),
    };

    let mut variants = Vec::new();
    // Masks run from most to least specific: territory, codeset, modifier.
    for mask in (0u8..8).rev() {
        let use_territory = mask & 0b100 != 0;
        let use_codeset = mask & 0b010 != 0;
        let use_modifier = mask & 0b001 != 0;
        if (use_territory && territory.is_none())
            || (use_codeset && codeset.is_none())
            || (use_modifier && modifier.is_none())
        {
            continue;
        }
        let mut name = language.to_string();
        if let (true, Some(t)) = (use_territory, territory) {
            name.push('_');
            name.push_str(t);
        }
        if let (true, Some(c)) = (use_codeset, codeset) {
            name.push('.');
            name.push_str(c);
        }
        if let (true, Some(m)) = (use_modifier, modifier) {
            name.push('@');
            name.push_str(m);
        }
        variants.push(name);
    }
    variants
}
