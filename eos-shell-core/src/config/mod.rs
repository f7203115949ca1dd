//! Configuration Management for the shell core.
//!
//! ## Key Components:
//!
//! - [`types`]: the configuration schema ([`CoreConfig`], [`LoggingConfig`],
//!   [`IconGridConfig`], [`SessionConfig`]).
//! - [`defaults`]: default values used when a file or field is missing.
//! - [`loader`]: the [`ConfigLoader`], which reads a system and a user TOML file,
//!   merges them (user wins) and validates the result.
//!
//! ## Configuration Loading Process:
//!
//! 1. `ConfigLoader::load()` resolves the system file (`/etc/eos-shell/config.toml`,
//!    overridable through `EOS_SHELL_SYSTEM_CONFIG`) and the user file
//!    (`config.toml` in the application config directory).
//! 2. Missing files are skipped; present ones are parsed as TOML tables.
//! 3. The user table is merged over the system table recursively.
//! 4. The result is deserialized into [`CoreConfig`] (defaults fill gaps) and
//!    validated (log level/format normalisation, relative log paths resolved).
//!
//! # Examples
//!
//! ```rust,ignore
//! use eos_shell_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Loaded log level: {}", config.logging.level),
//!     Err(e) => {
//!         eos_shell_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, IconGridConfig, LoggingConfig, SessionConfig};
