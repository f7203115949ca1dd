use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use eos_shell_core::config::SessionConfig;
use eos_shell_core::utils::insert_sorted;

use crate::settings_store::{SettingsStore, DEFAULT_EVENT_CAPACITY};

use super::builtin::{builtin_modes, CODING_MODE, DEFAULT_MODE, FALLBACK_MODE};
use super::errors::SessionModeError;
use super::events::SessionModeEvent;
use super::loader::{FilesystemModeSource, ModeDefinitionSource};
use super::types::{ModeDefinition, SessionParameters};

/// The stack of active session modes and the parameters they resolve to.
///
/// Mode names on the stack always refer to entries of the mode table; the
/// stack holds exactly one entry after [`SessionMode::init`] and never
/// becomes empty afterwards.
pub struct SessionMode {
    modes: HashMap<String, ModeDefinition>,
    source: Arc<dyn ModeDefinitionSource>,
    coding_toggle_key: String,
    mode_stack: Vec<String>,
    parameters: SessionParameters,
    event_sender: broadcast::Sender<SessionModeEvent>,
}

impl SessionMode {
    /// Starts from the built-in modes.
    pub fn new(source: Arc<dyn ModeDefinitionSource>, coding_toggle_key: impl Into<String>) -> Self {
        Self::with_mode_table(builtin_modes(), source, coding_toggle_key)
    }

    /// Starts from an explicit mode table instead of the built-in one.
    pub fn with_mode_table(
        modes: HashMap<String, ModeDefinition>,
        source: Arc<dyn ModeDefinitionSource>,
        coding_toggle_key: impl Into<String>,
    ) -> Self {
        let (event_sender, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            modes,
            source,
            coding_toggle_key: coding_toggle_key.into(),
            mode_stack: Vec::new(),
            parameters: SessionParameters::default(),
            event_sender,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            Arc::new(FilesystemModeSource::from_config(config)),
            config.coding_toggle_key.clone(),
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionModeEvent> {
        self.event_sender.subscribe()
    }

    /// Loads external modes, picks the initial mode and computes its
    /// parameters.
    ///
    /// `host_mode` is used when it names a primary mode. Otherwise the
    /// session starts in `user`, or `user-coding` when the coding toggle is
    /// on in `store`.
    pub async fn init(&mut self, host_mode: Option<&str>, store: &dyn SettingsStore) -> Result<(), SessionModeError> {
        for (name, definition) in self.source.load_modes().await {
            let merged = match self.modes.get(&name) {
                Some(existing) => {
                    debug!("Mode file overrides built-in mode '{}'", name);
                    definition.layered_over(existing)
                }
                None => definition,
            };
            self.modes.insert(name, merged);
        }

        let mode = self.initial_mode(host_mode, store);
        if !self.modes.contains_key(&mode) {
            return Err(SessionModeError::UnknownMode { name: mode });
        }
        info!("Starting session in mode '{}'", mode);

        self.mode_stack = vec![mode.clone()];
        self.sync()?;
        self.emit(SessionModeEvent::SessionsLoaded { mode });
        Ok(())
    }

    fn initial_mode(&self, host_mode: Option<&str>, store: &dyn SettingsStore) -> String {
        if let Some(name) = host_mode {
            if self.is_primary(name) {
                return name.to_string();
            }
            debug!("Host mode '{}' is not a primary mode", name);
        }

        let coding = store.get_bool(&self.coding_toggle_key).unwrap_or_else(|e| {
            warn!("Could not read '{}': {}", self.coding_toggle_key, e);
            false
        });
        if coding {
            CODING_MODE.to_string()
        } else {
            FALLBACK_MODE.to_string()
        }
    }

    fn is_primary(&self, name: &str) -> bool {
        self.modes
            .get(name)
            .and_then(|definition| definition.is_primary.value().copied())
            .unwrap_or(false)
    }

    fn require_initialized(&self) -> Result<(), SessionModeError> {
        if self.mode_stack.is_empty() {
            Err(SessionModeError::NotInitialized)
        } else {
            Ok(())
        }
    }

    fn require_known(&self, name: &str) -> Result<(), SessionModeError> {
        if self.modes.contains_key(name) {
            Ok(())
        } else {
            Err(SessionModeError::UnknownMode { name: name.to_string() })
        }
    }

    pub fn push_mode(&mut self, name: &str) -> Result<(), SessionModeError> {
        self.require_initialized()?;
        self.require_known(name)?;
        debug!("Pushing session mode '{}'", name);
        self.mode_stack.push(name.to_string());
        self.sync()
    }

    /// Pops `name`, which must be the current mode and not the only one.
    pub fn pop_mode(&mut self, name: &str) -> Result<(), SessionModeError> {
        self.require_initialized()?;
        let current = self.current_mode().unwrap_or_default().to_string();
        if current != name || self.mode_stack.len() == 1 {
            return Err(SessionModeError::InvalidPop {
                requested: name.to_string(),
                current,
                depth: self.mode_stack.len(),
            });
        }
        debug!("Popping session mode '{}'", name);
        self.mode_stack.pop();
        self.sync()
    }

    /// Replaces the current mode with `name`.
    pub fn switch_mode(&mut self, name: &str) -> Result<(), SessionModeError> {
        self.require_initialized()?;
        if self.current_mode() == Some(name) {
            return Ok(());
        }
        self.require_known(name)?;
        debug!("Switching session mode to '{}'", name);
        if let Some(top) = self.mode_stack.last_mut() {
            *top = name.to_string();
        }
        self.sync()
    }

    pub fn current_mode(&self) -> Option<&str> {
        self.mode_stack.last().map(String::as_str)
    }

    pub fn mode_stack(&self) -> &[String] {
        &self.mode_stack
    }

    pub fn parameters(&self) -> &SessionParameters {
        &self.parameters
    }

    pub fn mode_definition(&self, name: &str) -> Option<&ModeDefinition> {
        self.modes.get(name)
    }

    /// Names of the modes a session can start in, sorted.
    pub fn list_primary_modes(&self) -> Vec<String> {
        let mut names = Vec::new();
        for name in self.modes.keys().filter(|name| self.is_primary(name)) {
            insert_sorted(&mut names, name.clone(), |a: &String, b: &String| a.cmp(b));
        }
        names
    }

    /// Resolves the current mode against its parent and the default mode
    /// and copies the result onto the live parameters.
    fn sync(&mut self) -> Result<(), SessionModeError> {
        let current = self.current_mode().ok_or(SessionModeError::NotInitialized)?.to_string();
        let definition = self
            .modes
            .get(&current)
            .ok_or_else(|| SessionModeError::UnknownMode { name: current.clone() })?;
        let restrictive = self.modes.get(DEFAULT_MODE).cloned().unwrap_or_default();

        let defaults = match definition.parent_mode.as_deref() {
            Some(parent_name) => match self.modes.get(parent_name) {
                Some(parent) => parent.layered_over(&restrictive),
                None => {
                    warn!("Mode '{}' names unknown parent '{}'", current, parent_name);
                    restrictive
                }
            },
            None => restrictive,
        };

        definition.layered_over(&defaults).apply_to(&mut self.parameters);
        self.emit(SessionModeEvent::Updated { mode: current });
        Ok(())
    }

    fn emit(&self, event: SessionModeEvent) {
        if self.event_sender.send(event).is_err() {
            debug!("Session mode event with no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_mode::types::ModeField;
    use crate::settings_store::MemorySettingsStore;
    use pretty_assertions::assert_eq;

    fn no_files() -> Arc<dyn ModeDefinitionSource> {
        Arc::new(FilesystemModeSource::new(Vec::new()))
    }

    #[test]
    fn test_operations_before_init_fail() {
        let mut session = SessionMode::new(no_files(), "enable-coding-game");
        assert_eq!(session.push_mode("gdm"), Err(SessionModeError::NotInitialized));
        assert_eq!(session.switch_mode("gdm"), Err(SessionModeError::NotInitialized));
        assert_eq!(session.current_mode(), None);
    }

    #[tokio::test]
    async fn test_unknown_mode_leaves_stack_untouched() {
        let mut session = SessionMode::new(no_files(), "enable-coding-game");
        session.init(None, &MemorySettingsStore::default()).await.unwrap();
        assert_eq!(
            session.push_mode("nonexistent"),
            Err(SessionModeError::UnknownMode { name: "nonexistent".into() })
        );
        assert_eq!(session.mode_stack(), &["user".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_parent_falls_back_to_default_mode() {
        let mut modes = builtin_modes();
        modes.insert(
            "orphan".into(),
            ModeDefinition {
                parent_mode: Some("missing".into()),
                is_primary: ModeField::Set(true),
                ..ModeDefinition::default()
            },
        );
        let mut session = SessionMode::with_mode_table(modes, no_files(), "enable-coding-game");
        session.init(Some("orphan"), &MemorySettingsStore::default()).await.unwrap();
        assert!(!session.parameters().has_overview);
        assert_eq!(session.parameters().stylesheet_name, "gnome-shell.css");
    }

    #[test]
    fn test_list_primary_modes_is_sorted() {
        let session = SessionMode::new(no_files(), "enable-coding-game");
        assert_eq!(
            session.list_primary_modes(),
            vec!["gdm", "initial-setup", "user", "user-coding"]
        );
    }
}
