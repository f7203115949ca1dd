//! Canonicalisation of grid identifiers.
//!
//! Identifiers read from the persisted layout or the default files may use a
//! legacy prefix or an old application name. A resolver maps them onto the
//! identifier the application is currently installed under.

use std::collections::{HashMap, HashSet};

use super::types::is_folder;

/// Prefix carried by identifiers written by older releases.
pub const LEGACY_APP_PREFIX: &str = "eos-app-";

pub trait IdentifierResolver: Send + Sync {
    fn resolve(&self, id: &str) -> String;
}

/// Returns every identifier unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl IdentifierResolver for IdentityResolver {
    fn resolve(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Resolves identifiers against the known applications and an alias table.
///
/// Folders are never rewritten. For anything else the legacy prefix is
/// stripped; a known application id resolves to itself, otherwise the alias
/// table is consulted, otherwise the stripped id is returned.
#[derive(Debug, Clone, Default)]
pub struct AliasTableResolver {
    known_ids: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl AliasTableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known_id(mut self, id: impl Into<String>) -> Self {
        self.known_ids.insert(id.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, id: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), id.into());
        self
    }
}

impl IdentifierResolver for AliasTableResolver {
    fn resolve(&self, id: &str) -> String {
        if is_folder(id) {
            return id.to_string();
        }
        let stripped = id.strip_prefix(LEGACY_APP_PREFIX).unwrap_or(id);
        if self.known_ids.contains(stripped) {
            return stripped.to_string();
        }
        match self.aliases.get(stripped) {
            Some(canonical) => canonical.clone(),
            None => stripped.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn resolver() -> AliasTableResolver {
        AliasTableResolver::new()
            .with_known_id("org.gnome.Maps.desktop")
            .with_known_id("chromium-browser.desktop")
            .with_alias("chromium-browser.desktop", "google-chrome.desktop")
            .with_alias("maps.desktop", "org.gnome.Maps.desktop")
    }

    #[rstest]
    #[case("org.gnome.Maps.desktop", "org.gnome.Maps.desktop")]
    #[case("eos-app-org.gnome.Maps.desktop", "org.gnome.Maps.desktop")]
    #[case("maps.desktop", "org.gnome.Maps.desktop")]
    #[case("eos-app-maps.desktop", "org.gnome.Maps.desktop")]
    #[case("unknown.desktop", "unknown.desktop")]
    #[case("eos-folder-curiosity.directory", "eos-folder-curiosity.directory")]
    fn test_alias_table_resolution(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolver().resolve(input), expected);
    }

    #[test]
    fn test_known_id_wins_over_alias() {
        assert_eq!(resolver().resolve("chromium-browser.desktop"), "chromium-browser.desktop");
    }
}
