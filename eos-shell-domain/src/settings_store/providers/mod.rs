pub mod json_file;
pub mod memory;

pub use self::json_file::JsonFileSettingsStore;
pub use self::memory::MemorySettingsStore;
