//! # eos-shell core library (`eos-shell-core`)
//!
//! Foundational layer shared by the shell's domain crates:
//!
//! - **Error Handling**: [`CoreError`] with the narrower [`ConfigError`] and
//!   [`LoggingError`].
//! - **Configuration Management**: TOML loading and validation through
//!   [`ConfigLoader`] into [`CoreConfig`].
//! - **Logging**: `tracing` subscribers for console and rolling-file output.
//! - **Utilities**: filesystem helpers (`utils::fs`), XDG path and locale
//!   resolution (`utils::paths`), task spawning (`utils::async_utils`) and
//!   sorted-vector insertion (`utils::sorted`).
//!
//! ```rust,ignore
//! use eos_shell_core::config::ConfigLoader;
//! use eos_shell_core::logging::initialize_logging;
//! use eos_shell_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let core_config = ConfigLoader::load()?;
//!     initialize_logging(&core_config.logging, false)?;
//!     tracing::info!("eos-shell core initialised");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, IconGridConfig, LoggingConfig, SessionConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_minimal_logging, initialize_logging};
pub use utils::{insert_sorted, lower_bound, spawn_task};
