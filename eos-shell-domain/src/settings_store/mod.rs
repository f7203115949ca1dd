// Persisted settings shared by the shell's domain services.

pub mod errors;
pub mod events;
pub mod providers;
pub mod schema;
pub mod service;

pub use self::errors::SettingsStoreError;
pub use self::events::SettingChangedEvent;
pub use self::providers::{JsonFileSettingsStore, MemorySettingsStore};
pub use self::schema::SettingsSchema;
pub use self::service::SettingsStore;

/// Default capacity of the change notification channels.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
