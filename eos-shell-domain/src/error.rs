//! Error type of the domain layer.

use thiserror::Error;

use eos_shell_core::CoreError;

use crate::icon_grid::IconGridError;
use crate::session_mode::SessionModeError;
use crate::settings_store::SettingsStoreError;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    SettingsStore(#[from] SettingsStoreError),

    #[error(transparent)]
    IconGrid(#[from] IconGridError),

    #[error(transparent)]
    SessionMode(#[from] SessionModeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let error: DomainError = SessionModeError::UnknownMode { name: "kiosk".into() }.into();
        assert_eq!(error.to_string(), "Unknown session mode 'kiosk'");

        let error: DomainError = SettingsStoreError::UnknownKey { key: "nope".into() }.into();
        assert!(matches!(error, DomainError::SettingsStore(_)));
    }
}
