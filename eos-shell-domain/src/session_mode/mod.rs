//! Session modes: named bundles of shell behaviour (greeter, lock screen,
//! regular user session, ...) kept on a stack.
//!
//! Built-in modes come from [`builtin`]; further modes are read from
//! `<mode>.json` files by a [`ModeDefinitionSource`]. Every mode resolves
//! against its parent and the `restrictive` default mode before its values
//! are copied onto the live [`SessionParameters`].

pub mod builtin;
pub mod errors;
pub mod events;
pub mod loader;
pub mod service;
pub mod types;

pub use self::builtin::{builtin_modes, CODING_MODE, DEFAULT_MODE, FALLBACK_MODE};
pub use self::errors::SessionModeError;
pub use self::events::SessionModeEvent;
pub use self::loader::{load_mode_file, FilesystemModeSource, ModeDefinitionSource, DEFAULT_MODES_SUBDIR};
pub use self::service::SessionMode;
pub use self::types::{ModeDefinition, ModeField, PanelLayout, SessionParameters, UnlockDialogKind, MODE_FILE_FIELDS};
