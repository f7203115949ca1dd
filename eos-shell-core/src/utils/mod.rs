//! General Utilities for the shell core.
//!
//! # Submodules
//!
//! - [`async_utils`]: task spawning and timeouts on the `tokio` runtime.
//! - [`fs`]: directory creation, text file reads, atomic writes and async
//!   directory listing.
//! - [`paths`]: XDG directory resolution and locale preference lists.
//! - [`sorted`]: binary-search insertion into sorted vectors.

pub mod async_utils;
pub mod fs;
pub mod paths;
pub mod sorted;

pub use async_utils::{spawn_task, timeout};
pub use fs::{ensure_dir_exists, read_to_string, write_string_to_file};
pub use sorted::{insert_sorted, lower_bound};
