use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use eos_shell_domain::core::config::{CoreConfig, SessionConfig};
use eos_shell_domain::core::utils::async_utils::timeout;
use eos_shell_domain::icon_grid::IdentityResolver;
use eos_shell_domain::session_mode::{
    FilesystemModeSource, ModeDefinition, ModeDefinitionSource, ModeField, SessionMode, SessionModeError,
    SessionModeEvent, UnlockDialogKind,
};
use eos_shell_domain::settings_store::{MemorySettingsStore, SettingsSchema, SettingsStore, SettingsStoreError};
use eos_shell_domain::{DomainError, ShellServices};

const CODING_KEY: &str = "enable-coding-game";

/// Serves a fixed list of modes.
struct StaticModes(Vec<(String, ModeDefinition)>);

#[async_trait]
impl ModeDefinitionSource for StaticModes {
    async fn load_modes(&self) -> Vec<(String, ModeDefinition)> {
        self.0.clone()
    }
}

fn no_modes() -> Arc<dyn ModeDefinitionSource> {
    Arc::new(StaticModes(Vec::new()))
}

async fn started(host_mode: Option<&str>) -> SessionMode {
    let mut session = SessionMode::new(no_modes(), CODING_KEY);
    session.init(host_mode, &MemorySettingsStore::default()).await.unwrap();
    session
}

#[tokio::test]
async fn test_defined_field_beats_default_mode() {
    let modes = HashMap::from([
        (
            "restrictive".to_string(),
            ModeDefinition {
                has_overview: ModeField::Set(false),
                ..ModeDefinition::default()
            },
        ),
        (
            "user".to_string(),
            ModeDefinition {
                has_overview: ModeField::Set(true),
                is_primary: ModeField::Set(true),
                ..ModeDefinition::default()
            },
        ),
    ]);
    let mut session = SessionMode::with_mode_table(modes, no_modes(), CODING_KEY);
    session.init(None, &MemorySettingsStore::default()).await.unwrap();

    assert_eq!(session.current_mode(), Some("user"));
    assert!(session.parameters().has_overview);
}

#[tokio::test]
async fn test_parent_fills_fields_the_mode_leaves_undefined() {
    let modes = HashMap::from([
        (
            "restrictive".to_string(),
            ModeDefinition {
                has_overview: ModeField::Set(false),
                has_workspaces: ModeField::Set(false),
                has_windows: ModeField::Set(false),
                ..ModeDefinition::default()
            },
        ),
        (
            "parent".to_string(),
            ModeDefinition {
                has_workspaces: ModeField::Set(true),
                ..ModeDefinition::default()
            },
        ),
        (
            "child".to_string(),
            ModeDefinition {
                parent_mode: Some("parent".to_string()),
                has_overview: ModeField::Set(true),
                is_primary: ModeField::Set(true),
                ..ModeDefinition::default()
            },
        ),
    ]);
    let mut session = SessionMode::with_mode_table(modes, no_modes(), CODING_KEY);
    session.init(Some("child"), &MemorySettingsStore::default()).await.unwrap();

    let params = session.parameters();
    assert!(params.has_overview);
    assert!(params.has_workspaces);
    assert!(!params.has_windows);
}

#[tokio::test]
async fn test_pop_requires_matching_top_and_depth() {
    let mut session = started(None).await;

    assert_eq!(
        session.pop_mode("user"),
        Err(SessionModeError::InvalidPop {
            requested: "user".into(),
            current: "user".into(),
            depth: 1,
        })
    );

    session.push_mode("unlock-dialog").unwrap();
    assert!(matches!(session.pop_mode("user"), Err(SessionModeError::InvalidPop { .. })));
    assert_eq!(session.mode_stack(), &["user".to_string(), "unlock-dialog".to_string()]);
}

#[tokio::test]
async fn test_push_then_pop_restores_state() {
    let mut session = started(None).await;
    let stack_before = session.mode_stack().to_vec();
    let params_before = session.parameters().clone();

    session.push_mode("unlock-dialog").unwrap();
    assert_eq!(session.current_mode(), Some("unlock-dialog"));
    assert!(session.parameters().is_locked);
    assert!(!session.parameters().has_overview);

    session.pop_mode("unlock-dialog").unwrap();
    assert_eq!(session.mode_stack(), &stack_before[..]);
    assert_eq!(session.parameters(), &params_before);
}

#[tokio::test]
async fn test_unlock_dialog_keeps_current_dialog() {
    let mut session = started(Some("gdm")).await;
    assert_eq!(session.parameters().unlock_dialog, Some(UnlockDialogKind::Login));

    session.push_mode("unlock-dialog").unwrap();
    assert_eq!(session.parameters().unlock_dialog, Some(UnlockDialogKind::Login));
    assert_eq!(session.parameters().panel_style.as_deref(), Some("unlock-screen"));

    session.switch_mode("user").unwrap();
    assert_eq!(session.parameters().unlock_dialog, Some(UnlockDialogKind::Unlock));
}

#[tokio::test]
async fn test_switch_replaces_top() {
    let mut session = started(None).await;
    let mut events = session.subscribe();

    session.switch_mode("user").unwrap();
    assert!(events.try_recv().is_err());

    session.switch_mode("gdm").unwrap();
    assert_eq!(session.mode_stack(), &["gdm".to_string()]);
    assert!(session.parameters().is_greeter);
    assert_eq!(events.try_recv().unwrap(), SessionModeEvent::Updated { mode: "gdm".into() });

    assert!(session.switch_mode("kiosk").is_err());
    assert_eq!(session.mode_stack(), &["gdm".to_string()]);
}

#[tokio::test]
async fn test_init_events() {
    let mut session = SessionMode::new(no_modes(), CODING_KEY);
    let mut events = session.subscribe();
    session.init(None, &MemorySettingsStore::default()).await.unwrap();

    assert_eq!(events.try_recv().unwrap(), SessionModeEvent::Updated { mode: "user".into() });
    assert_eq!(events.try_recv().unwrap(), SessionModeEvent::SessionsLoaded { mode: "user".into() });
}

#[tokio::test]
async fn test_initial_mode_selection() {
    let coding_on = MemorySettingsStore::default();
    coding_on.set(CODING_KEY, json!(true)).unwrap();

    let mut session = SessionMode::new(no_modes(), CODING_KEY);
    session.init(None, &coding_on).await.unwrap();
    assert_eq!(session.current_mode(), Some("user-coding"));
    let components = &session.parameters().components;
    assert!(components.iter().any(|c| c == "codingGameService"));

    let mut session = SessionMode::new(no_modes(), CODING_KEY);
    session.init(Some("gdm"), &coding_on).await.unwrap();
    assert_eq!(session.current_mode(), Some("gdm"));

    // Not primary, so the host's choice is ignored.
    let session = started(Some("unlock-dialog")).await;
    assert_eq!(session.current_mode(), Some("user"));
    let session = started(Some("no-such-mode")).await;
    assert_eq!(session.current_mode(), Some("user"));
}

#[tokio::test]
async fn test_mode_files_add_and_override_modes() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("user.json"),
        r#"{"hasOverview": false, "unlockDialog": "Login", "isLocked": true}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("kiosk.json"),
        r#"{"parentMode": "user", "hasRunDialog": false, "components": ["networkAgent"]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("broken.json"), "{ nope").unwrap();

    let config = SessionConfig {
        mode_dirs: vec![dir.path().to_path_buf()],
        ..SessionConfig::default()
    };
    let mut session = SessionMode::from_config(&config);
    session.init(Some("kiosk"), &MemorySettingsStore::default()).await.unwrap();

    assert_eq!(session.current_mode(), Some("kiosk"));
    let params = session.parameters();
    assert!(!params.has_run_dialog);
    assert!(!params.has_overview);
    assert!(params.is_locked);
    assert!(params.has_workspaces);
    assert_eq!(params.components, vec!["networkAgent".to_string()]);
    assert_eq!(params.unlock_dialog, Some(UnlockDialogKind::Unlock));

    assert!(session.list_primary_modes().contains(&"kiosk".to_string()));
    assert!(session.mode_definition("broken").is_none());
}

/// Configuration reading modes and default layouts only from `dir`.
fn config_in(dir: &TempDir) -> CoreConfig {
    fs::write(dir.path().join("icon-grid-C.json"), r#"{"desktop": ["maps.desktop"]}"#).unwrap();
    let mut config = CoreConfig::default();
    config.session.mode_dirs = vec![dir.path().join("modes")];
    config.icon_grid.default_dirs = vec![dir.path().to_path_buf()];
    config.icon_grid.prepend_dirs = vec![dir.path().to_path_buf()];
    config.icon_grid.append_dirs = vec![dir.path().to_path_buf()];
    config.icon_grid.languages = vec!["C".to_string()];
    config.icon_grid.user_directories_dir = Some(dir.path().join("user"));
    config
}

#[tokio::test]
async fn test_shell_services_initialize() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettingsStore::default());
    let services = ShellServices::initialize(&config, settings, Arc::new(IdentityResolver), Some("initial-setup"))
        .await
        .unwrap();

    assert_eq!(services.session_mode.current_mode(), Some("initial-setup"));
    assert_eq!(services.app_store.list_applications(), vec!["maps.desktop"]);
    assert!(services.app_store.add_application("chess.desktop").unwrap());
    assert_eq!(
        services.settings.get("icon-grid-layout").unwrap(),
        json!({"desktop": ["maps.desktop", "chess.desktop"]})
    );
    services.shutdown();
}

#[tokio::test]
async fn test_shell_services_with_configured_keys() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.icon_grid.settings_key = "my-layout".to_string();
    config.session.coding_toggle_key = "my-coding-toggle".to_string();

    let store = Arc::new(MemorySettingsStore::new(SettingsSchema::for_config(&config)));
    store.set("my-coding-toggle", json!(true)).unwrap();
    let services = ShellServices::initialize(&config, store.clone(), Arc::new(IdentityResolver), None)
        .await
        .unwrap();

    assert_eq!(services.session_mode.current_mode(), Some("user-coding"));
    assert!(services.icon_grid.append_icon("a.desktop", "desktop").unwrap());
    assert!(services.icon_grid.remove_icon("maps.desktop", false).unwrap());
    assert_eq!(store.get("my-layout").unwrap(), json!({"desktop": ["a.desktop"]}));
    services.icon_grid.reset_desktop().unwrap();
    assert_eq!(services.icon_grid.get_icons("desktop"), vec!["maps.desktop"]);
}

#[tokio::test]
async fn test_shell_services_reject_store_without_configured_keys() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.icon_grid.settings_key = "my-layout".to_string();

    let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettingsStore::default());
    let result = ShellServices::initialize(&config, settings, Arc::new(IdentityResolver), None).await;
    assert!(matches!(
        result,
        Err(DomainError::SettingsStore(SettingsStoreError::UnknownKey { ref key })) if key == "my-layout"
    ));
}

#[tokio::test]
async fn test_dropping_services_stops_store_watcher() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = Arc::new(MemorySettingsStore::default());
    let services = ShellServices::initialize(&config, store.clone(), Arc::new(IdentityResolver), None)
        .await
        .unwrap();
    let layout = services.icon_grid.clone();
    let mut changes = layout.subscribe();

    drop(services);
    tokio::task::yield_now().await;

    store.set("icon-grid-layout", json!({"desktop": ["b.desktop"]})).unwrap();
    assert!(timeout(Duration::from_millis(200), changes.recv()).await.is_err());
    assert_eq!(layout.get_icons("desktop"), vec!["maps.desktop"]);
}
