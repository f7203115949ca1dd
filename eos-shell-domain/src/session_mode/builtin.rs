//! The modes compiled into the shell.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{ModeDefinition, ModeField, PanelLayout, UnlockDialogKind};

/// Mode every other mode ultimately falls back to.
pub const DEFAULT_MODE: &str = "restrictive";

/// Fallback when the host does not request a primary mode.
pub const FALLBACK_MODE: &str = "user";

/// Replaces [`FALLBACK_MODE`] when the coding toggle is on.
pub const CODING_MODE: &str = "user-coding";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn restrictive() -> ModeDefinition {
    ModeDefinition {
        parent_mode: None,
        stylesheet_name: "gnome-shell.css".to_string().into(),
        has_overview: false.into(),
        show_calendar_events: false.into(),
        allow_settings: false.into(),
        allow_extensions: false.into(),
        allow_screencast: false.into(),
        enabled_extensions: Vec::new().into(),
        has_run_dialog: false.into(),
        has_workspaces: false.into(),
        has_windows: false.into(),
        has_notifications: false.into(),
        is_locked: false.into(),
        is_greeter: false.into(),
        is_primary: false.into(),
        unlock_dialog: ModeField::Set(None),
        components: Vec::new().into(),
        panel: PanelLayout::default().into(),
        panel_style: ModeField::Set(None),
    }
}

fn gdm() -> ModeDefinition {
    ModeDefinition {
        has_notifications: true.into(),
        is_greeter: true.into(),
        is_primary: true.into(),
        unlock_dialog: Some(UnlockDialogKind::Login).into(),
        components: strings(&["polkitAgent"]).into(),
        panel: PanelLayout::new(
            &["logo"],
            &["a11yGreeter", "keyboard", "aggregateMenu", "panelSeparator2", "dateMenu"],
        )
        .into(),
        panel_style: Some("login-screen".to_string()).into(),
        ..ModeDefinition::default()
    }
}

// The user menu only holds the settings icon, so the lock screen and the
// unlock dialog leave it out.
fn unlock_dialog() -> ModeDefinition {
    ModeDefinition {
        is_locked: true.into(),
        unlock_dialog: ModeField::Retain,
        components: strings(&["polkitAgent"]).into(),
        panel: PanelLayout::new(&[], &["aggregateMenu", "panelSeparator2", "dateMenu"]).into(),
        panel_style: Some("unlock-screen".to_string()).into(),
        ..ModeDefinition::default()
    }
}

fn initial_setup() -> ModeDefinition {
    ModeDefinition {
        has_windows: true.into(),
        is_primary: true.into(),
        components: strings(&["networkAgent", "keyring"]).into(),
        panel: PanelLayout::new(&[], &["dateMenu", "a11yGreeter", "keyboard", "volume", "battery"]).into(),
        ..ModeDefinition::default()
    }
}

fn user_base(components: &[&str], panel: PanelLayout) -> ModeDefinition {
    ModeDefinition {
        has_overview: true.into(),
        show_calendar_events: true.into(),
        allow_settings: true.into(),
        allow_extensions: true.into(),
        allow_screencast: true.into(),
        has_run_dialog: true.into(),
        has_workspaces: true.into(),
        has_windows: true.into(),
        has_notifications: true.into(),
        is_locked: false.into(),
        is_primary: true.into(),
        unlock_dialog: Some(UnlockDialogKind::Unlock).into(),
        components: strings(components).into(),
        panel: panel.into(),
        ..ModeDefinition::default()
    }
}

const USER_COMPONENTS: &[&str] = &[
    "networkAgent",
    "polkitAgent",
    "keyring",
    "autorunManager",
    "automountManager",
    "updaterManager",
    "socialBar",
    "appStore",
];

fn user() -> ModeDefinition {
    user_base(
        USER_COMPONENTS,
        PanelLayout::new(
            &["showApps", "panelSeparator", "appIcons"],
            &["a11y", "keyboard", "aggregateMenu", "panelSeparator2", "dateMenu", "hotCornerIndicator"],
        ),
    )
}

fn user_coding() -> ModeDefinition {
    let mut components = USER_COMPONENTS.to_vec();
    components.extend(["codingManager", "codingGameService"]);
    user_base(
        &components,
        PanelLayout::new(
            &["userMenu", "panelSeparator", "appIcons"],
            &[
                "dateMenu",
                "a11y",
                "keyboard",
                "volume",
                "bluetooth",
                "network",
                "battery",
                "codingGame",
                "socialBar",
                "hotCornerIndicator",
            ],
        ),
    )
}

static BUILTIN_MODES: Lazy<HashMap<String, ModeDefinition>> = Lazy::new(|| {
    HashMap::from([
        (DEFAULT_MODE.to_string(), restrictive()),
        ("gdm".to_string(), gdm()),
        ("unlock-dialog".to_string(), unlock_dialog()),
        ("initial-setup".to_string(), initial_setup()),
        (FALLBACK_MODE.to_string(), user()),
        (CODING_MODE.to_string(), user_coding()),
    ])
});

/// A fresh copy of the built-in mode table.
pub fn builtin_modes() -> HashMap<String, ModeDefinition> {
    BUILTIN_MODES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_mode_defines_every_field() {
        let modes = builtin_modes();
        let restrictive = &modes[DEFAULT_MODE];
        assert_eq!(restrictive.layered_over(&ModeDefinition::default()), restrictive.clone());
        assert!(!restrictive.stylesheet_name.is_unset());
        assert!(!restrictive.panel_style.is_unset());
        assert!(!restrictive.unlock_dialog.is_unset());
    }

    #[test]
    fn test_gdm_clock_is_on_the_right() {
        let modes = builtin_modes();
        let panel = modes["gdm"].panel.value().unwrap();
        assert_eq!(panel.right.last().map(String::as_str), Some("dateMenu"));
        assert!(!panel.left.iter().any(|item| item == "dateMenu"));
    }

    #[test]
    fn test_unlock_dialog_retains_live_dialog() {
        assert_eq!(builtin_modes()["unlock-dialog"].unlock_dialog, ModeField::Retain);
    }

    #[test]
    fn test_user_coding_extends_user_components() {
        let modes = builtin_modes();
        let user = modes[FALLBACK_MODE].components.value().unwrap().clone();
        let coding = modes[CODING_MODE].components.value().unwrap().clone();
        assert_eq!(&coding[..user.len()], &user[..]);
        assert_eq!(&coding[user.len()..], &["codingManager".to_string(), "codingGameService".to_string()]);
    }
}
