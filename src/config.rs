//! Configuration for the durable storage environment.

use std::path::PathBuf;

/// Default LMDB map size, 64 MiB: years of personal logs.
///
/// Every save rewrites a whole collection, so once a log outgrows the map
/// each save fails with `MapFull`. Those failures are only logged; the
/// in-memory log keeps working but stops reaching disk. Raise
/// [`StoreConfig::map_size`] for heavier use.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

pub const DEFAULT_WORKOUTS_KEY: &str = "workouts";
pub const DEFAULT_NUTRITION_KEY: &str = "nutrition";

/// Where and how the two logs are persisted.
///
/// Both logs share one LMDB environment and live under separate keys, so
/// each can be rewritten without touching the other.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory of the LMDB environment. Created on open if missing.
    pub path: PathBuf,

    /// Maximum size of the memory map in bytes.
    pub map_size: usize,

    /// Slot holding the serialized workout collection.
    pub workouts_key: String,

    /// Slot holding the serialized daily nutrition buckets.
    pub nutrition_key: String,
}

impl StoreConfig {
    /// Configuration for a database called `name`, stored in `<name>.lmdb`.
    ///
    /// ```rust
    /// use fitness_log_core::config::StoreConfig;
    ///
    /// let config = StoreConfig::named("athlete");
    /// assert_eq!(config.path.to_str(), Some("athlete.lmdb"));
    /// ```
    pub fn named(name: &str) -> Self {
        Self {
            path: PathBuf::from(format!("{name}.lmdb")),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fitness_log.lmdb"),
            map_size: DEFAULT_MAP_SIZE,
            workouts_key: DEFAULT_WORKOUTS_KEY.to_string(),
            nutrition_key: DEFAULT_NUTRITION_KEY.to_string(),
        }
    }
}
