//! Mode definitions and the effective session parameters.
//!
//! A [`ModeDefinition`] is sparse: every field is a [`ModeField`] that is
//! either unset (inherit), explicitly set, or marked to retain whatever the
//! live parameters already hold. Definitions are layered with
//! [`ModeDefinition::layered_over`] and the result is copied onto
//! [`SessionParameters`] with [`ModeDefinition::apply_to`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One field of a sparse mode definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModeField<T> {
    /// Not defined here; inherit from the layer below.
    #[default]
    Unset,
    /// Defined as "keep the previous live value".
    Retain,
    Set(T),
}

impl<T: Clone> ModeField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, ModeField::Unset)
    }

    /// First-defined wins: `self` unless it is unset.
    pub fn or(&self, fallback: &ModeField<T>) -> ModeField<T> {
        match self {
            ModeField::Unset => fallback.clone(),
            defined => defined.clone(),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ModeField::Set(value) => Some(value),
            _ => None,
        }
    }

    fn apply(&self, target: &mut T) {
        if let ModeField::Set(value) = self {
            *target = value.clone();
        }
    }
}

impl<T> From<T> for ModeField<T> {
    fn from(value: T) -> Self {
        ModeField::Set(value)
    }
}

/// Panel composition: indicator names for each side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PanelLayout {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

impl PanelLayout {
    pub fn new(left: &[&str], right: &[&str]) -> Self {
        Self {
            left: left.iter().map(|s| s.to_string()).collect(),
            right: right.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Which dialog unlocks the session. Only built-in modes choose one; mode
/// files cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnlockDialogKind {
    Login,
    Unlock,
}

/// Declares the fields a mode file may set, with their JSON names, and
/// generates the layering, application and parsing code for them.
macro_rules! mode_fields {
    ($($field:ident: $ty:ty => $json_name:literal,)*) => {
        /// A sparse mode record.
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct ModeDefinition {
            /// Mode whose definition sits between this one and the default mode.
            pub parent_mode: Option<String>,
            $(pub $field: ModeField<$ty>,)*
            pub unlock_dialog: ModeField<Option<UnlockDialogKind>>,
        }

        /// The fully resolved parameters of the current mode.
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct SessionParameters {
            $(pub $field: $ty,)*
            pub unlock_dialog: Option<UnlockDialogKind>,
        }

        /// JSON names of the fields accepted from mode files.
        pub const MODE_FILE_FIELDS: &[&str] = &["parentMode", $($json_name,)*];

        impl ModeDefinition {
            /// Layers `self` over `base`: fields defined here win.
            pub fn layered_over(&self, base: &ModeDefinition) -> ModeDefinition {
                ModeDefinition {
                    parent_mode: self.parent_mode.clone().or_else(|| base.parent_mode.clone()),
                    $($field: self.$field.or(&base.$field),)*
                    unlock_dialog: self.unlock_dialog.or(&base.unlock_dialog),
                }
            }

            /// Copies every set field onto `params`; unset and retained
            /// fields leave the live value alone.
            pub fn apply_to(&self, params: &mut SessionParameters) {
                $(self.$field.apply(&mut params.$field);)*
                self.unlock_dialog.apply(&mut params.unlock_dialog);
            }

            /// Reads the whitelisted fields of a mode file.
            ///
            /// Unknown fields are ignored and `unlockDialog` is never read.
            /// A whitelisted field with a value of the wrong type fails the
            /// whole document.
            pub fn from_json_object(object: &Map<String, JsonValue>) -> Result<ModeDefinition, serde_json::Error> {
                let mut definition = ModeDefinition::default();
                if let Some(value) = object.get("parentMode") {
                    definition.parent_mode = serde_json::from_value(value.clone())?;
                }
                $(
                    if let Some(value) = object.get($json_name) {
                        definition.$field = ModeField::Set(serde_json::from_value(value.clone())?);
                    }
                )*
                Ok(definition)
            }
        }
    };
}

mode_fields! {
    stylesheet_name: String => "stylesheetName",
    has_overview: bool => "hasOverview",
    show_calendar_events: bool => "showCalendarEvents",
    allow_settings: bool => "allowSettings",
    allow_extensions: bool => "allowExtensions",
    allow_screencast: bool => "allowScreencast",
    enabled_extensions: Vec<String> => "enabledExtensions",
    has_run_dialog: bool => "hasRunDialog",
    has_workspaces: bool => "hasWorkspaces",
    has_windows: bool => "hasWindows",
    has_notifications: bool => "hasNotifications",
    is_locked: bool => "isLocked",
    is_greeter: bool => "isGreeter",
    is_primary: bool => "isPrimary",
    components: Vec<String> => "components",
    panel: PanelLayout => "panel",
    panel_style: Option<String> => "panelStyle",
}
